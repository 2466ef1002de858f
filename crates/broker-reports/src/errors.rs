//! Error taxonomy for the aggregation engine
//!
//! Structural problems (bad input, wrong types, unknown columns) are hard
//! errors and abort the operation that hit them. Business-level "no data"
//! conditions are not errors at all: derived metrics signal them as
//! `Option::None` and the affected row or column is simply omitted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required field failed to parse into its semantic type at load
    /// time. The whole table load aborts; no partial rows are admitted.
    #[error("{table}.{field} row {row}: malformed value {value:?}")]
    MalformedInput {
        table: &'static str,
        field: &'static str,
        row: usize,
        value: String,
    },

    /// A sum/mean reduction was requested over a non-numeric column.
    #[error("column `{column}` is not numeric (required by {reduction})")]
    TypeKind {
        column: String,
        reduction: &'static str,
    },

    /// A join key, group key, or sort column does not exist in the frame.
    #[error("unknown column `{column}`")]
    UnknownColumn { column: String },

    /// A row was pushed with the wrong number of values for its frame.
    #[error("row has {got} values, frame has {expected} columns")]
    RowArity { expected: usize, got: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
