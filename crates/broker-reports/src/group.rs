//! Group-by aggregation over frames
//!
//! One output row per distinct key combination observed in the input.
//! Empty groups are never emitted; the output keeps first-seen group
//! order, but no ordering is part of the contract (ranking is rank.rs's
//! job).

use std::collections::HashMap;

use crate::errors::{EngineError, EngineResult};
use crate::frame::{Frame, Value};

/// Reductions supported by `group_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    /// Row count, regardless of nulls in the source column.
    Count,
    /// Numeric sum; 0.0 when every contributing value is null.
    Sum,
    /// Arithmetic mean of the non-null values; Null when there are none.
    Mean,
}

impl Reduce {
    fn name(self) -> &'static str {
        match self {
            Reduce::Count => "count",
            Reduce::Sum => "sum",
            Reduce::Mean => "mean",
        }
    }
}

/// One output aggregate: `out` is the result column name, `source` the
/// input column it reduces.
#[derive(Debug, Clone)]
pub struct Agg {
    pub out: String,
    pub source: String,
    pub reduce: Reduce,
}

impl Agg {
    pub fn count(out: &str, source: &str) -> Self {
        Self {
            out: out.to_string(),
            source: source.to_string(),
            reduce: Reduce::Count,
        }
    }

    pub fn sum(out: &str, source: &str) -> Self {
        Self {
            out: out.to_string(),
            source: source.to_string(),
            reduce: Reduce::Sum,
        }
    }

    pub fn mean(out: &str, source: &str) -> Self {
        Self {
            out: out.to_string(),
            source: source.to_string(),
            reduce: Reduce::Mean,
        }
    }
}

#[derive(Default)]
struct AggState {
    count: u64,
    sum: f64,
    numeric_count: u64,
}

/// Partition `frame` by the `keys` columns and compute `aggs` per group.
///
/// Sum/mean over a non-numeric column fail with `TypeKind` and no partial
/// result is returned.
pub fn group_by(frame: &Frame, keys: &[&str], aggs: &[Agg]) -> EngineResult<Frame> {
    let key_idxs: Vec<usize> = keys
        .iter()
        .map(|k| frame.column_index(k))
        .collect::<EngineResult<_>>()?;
    let agg_idxs: Vec<usize> = aggs
        .iter()
        .map(|a| frame.column_index(&a.source))
        .collect::<EngineResult<_>>()?;

    // First-seen group order
    let mut order: Vec<Vec<Value>> = Vec::new();
    let mut states: HashMap<Vec<Value>, Vec<AggState>> = HashMap::new();

    for row in frame.rows() {
        let key: Vec<Value> = key_idxs.iter().map(|&i| row[i].clone()).collect();
        let state = states.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            aggs.iter().map(|_| AggState::default()).collect()
        });

        for ((agg, &src), slot) in aggs.iter().zip(&agg_idxs).zip(state.iter_mut()) {
            slot.count += 1;
            if agg.reduce == Reduce::Count {
                continue;
            }
            match &row[src] {
                Value::Null => {}
                v => {
                    let n = v.as_f64().ok_or_else(|| EngineError::TypeKind {
                        column: agg.source.clone(),
                        reduction: agg.reduce.name(),
                    })?;
                    slot.sum += n;
                    slot.numeric_count += 1;
                }
            }
        }
    }

    let mut columns: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    columns.extend(aggs.iter().map(|a| a.out.clone()));

    let mut out = Frame::with_columns(columns);
    for key in order {
        let state = &states[&key];
        let mut row = key.clone();
        for (agg, slot) in aggs.iter().zip(state) {
            row.push(match agg.reduce {
                Reduce::Count => Value::Int(slot.count as i64),
                Reduce::Sum => Value::Float(slot.sum),
                Reduce::Mean => {
                    if slot.numeric_count == 0 {
                        Value::Null
                    } else {
                        Value::Float(slot.sum / slot.numeric_count as f64)
                    }
                }
            });
        }
        out.push_row(row)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> Frame {
        let mut f = Frame::new(&["technician", "status", "revenue"]);
        let rows = [
            ("Alex", "Completed", Some(100.0)),
            ("Alex", "Completed", Some(250.0)),
            ("Jordan", "Completed", Some(400.0)),
            ("Alex", "Cancelled", None),
        ];
        for (tech, status, rev) in rows {
            f.push_row(vec![
                Value::str(tech),
                Value::str(status),
                rev.map(Value::Float).unwrap_or(Value::Null),
            ])
            .unwrap();
        }
        f
    }

    #[test]
    fn test_one_row_per_distinct_key_combo() {
        let grouped = group_by(
            &jobs(),
            &["technician", "status"],
            &[Agg::count("jobs", "revenue")],
        )
        .unwrap();
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn test_counts_partition_input() {
        let input = jobs();
        let grouped = group_by(&input, &["technician"], &[Agg::count("jobs", "status")]).unwrap();
        let total: f64 = grouped
            .iter()
            .map(|r| r.f64_val("jobs").unwrap())
            .sum();
        assert_eq!(total, input.len() as f64);
    }

    #[test]
    fn test_count_includes_null_values() {
        let grouped = group_by(&jobs(), &["technician"], &[Agg::count("jobs", "revenue")]).unwrap();
        let alex = grouped
            .iter()
            .find(|r| r.str_val("technician") == Some("Alex"))
            .unwrap();
        assert_eq!(alex.f64_val("jobs"), Some(3.0));
    }

    #[test]
    fn test_sum_and_mean_skip_nulls() {
        let grouped = group_by(
            &jobs(),
            &["technician"],
            &[Agg::sum("revenue", "revenue"), Agg::mean("avg", "revenue")],
        )
        .unwrap();
        let alex = grouped
            .iter()
            .find(|r| r.str_val("technician") == Some("Alex"))
            .unwrap();
        assert_eq!(alex.f64_val("revenue"), Some(350.0));
        assert_eq!(alex.f64_val("avg"), Some(175.0));
    }

    #[test]
    fn test_mean_of_all_null_group_is_null() {
        let mut f = Frame::new(&["k", "v"]);
        f.push_row(vec![Value::str("a"), Value::Null]).unwrap();
        let grouped = group_by(&f, &["k"], &[Agg::mean("avg", "v"), Agg::sum("sum", "v")]).unwrap();
        assert!(grouped.row(0).get("avg").unwrap().is_null());
        // sum over nothing is 0, in contrast to mean
        assert_eq!(grouped.row(0).f64_val("sum"), Some(0.0));
    }

    #[test]
    fn test_sum_over_non_numeric_fails() {
        let err = group_by(&jobs(), &["technician"], &[Agg::sum("x", "status")]).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::EngineError::TypeKind { reduction: "sum", .. }
        ));
    }

    #[test]
    fn test_empty_input_emits_no_groups() {
        let f = Frame::new(&["k", "v"]);
        let grouped = group_by(&f, &["k"], &[Agg::sum("v", "v")]).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let grouped = group_by(&jobs(), &["technician"], &[Agg::count("jobs", "status")]).unwrap();
        assert_eq!(grouped.row(0).str_val("technician"), Some("Alex"));
        assert_eq!(grouped.row(1).str_val("technician"), Some("Jordan"));
    }
}
