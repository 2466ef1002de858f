//! Ranking adapter: stable sort + truncate for leaderboard-style output
//!
//! Returns plain frames; how they are rendered (CSV, console table) is
//! the caller's concern.

use crate::errors::EngineResult;
use crate::frame::{Frame, cmp_values};

/// Sort `frame` by `sort_column` and keep the first `n` rows.
///
/// The sort is stable: ties keep their input order. `n` larger than the
/// row count returns every row fully sorted.
pub fn top_n(frame: &Frame, sort_column: &str, n: usize, descending: bool) -> EngineResult<Frame> {
    let idx = frame.column_index(sort_column)?;

    let mut indices: Vec<usize> = (0..frame.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = cmp_values(&frame.rows()[a][idx], &frame.rows()[b][idx]);
        if descending { ord.reverse() } else { ord }
    });

    let mut out = Frame::with_columns(frame.columns().to_vec());
    for &i in indices.iter().take(n) {
        out.push_row(frame.rows()[i].clone())?;
    }
    Ok(out)
}
