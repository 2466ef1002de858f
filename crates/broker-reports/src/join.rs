//! Inner joins between frames
//!
//! Chained joins (deals ⋈ invoices ⋈ agents) apply left to right, each
//! producing a new frame.

use std::collections::HashMap;

use crate::errors::EngineResult;
use crate::frame::{Frame, Value};

/// Inner-join `left` and `right` on `left_key == right_key`.
///
/// One output row is produced per matching key pair; duplicate keys on
/// either side multiply, as in a relational inner join. Rows with no match
/// on the other side are dropped silently, and Null keys never match.
///
/// Output columns are the left columns unchanged, followed by the right
/// columns; a right column whose name already exists on the left is
/// renamed to `{name}_{right_name}`. Downstream code references joined
/// fields by these resolved names.
pub fn inner_join(
    left: &Frame,
    right: &Frame,
    left_key: &str,
    right_key: &str,
    right_name: &str,
) -> EngineResult<Frame> {
    let left_idx = left.column_index(left_key)?;
    let right_idx = right.column_index(right_key)?;

    let mut columns: Vec<String> = left.columns().to_vec();
    for col in right.columns() {
        if left.columns().iter().any(|c| c == col) {
            columns.push(format!("{}_{}", col, right_name));
        } else {
            columns.push(col.clone());
        }
    }

    // Hash the right side by key value
    let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        let key = &row[right_idx];
        if key.is_null() {
            continue;
        }
        index.entry(key).or_default().push(i);
    }

    let mut out = Frame::with_columns(columns);
    for left_row in left.rows() {
        let key = &left_row[left_idx];
        if key.is_null() {
            continue;
        }
        let Some(matches) = index.get(key) else {
            continue;
        };
        for &right_i in matches {
            let mut combined = left_row.clone();
            combined.extend(right.rows()[right_i].iter().cloned());
            out.push_row(combined)?;
        }
    }

    Ok(out)
}
