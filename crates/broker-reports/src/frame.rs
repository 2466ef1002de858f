//! Dynamic tabular frame shared by the join/group/rank pipeline
//!
//! The typed record store (store.rs) converts each entity into a `Frame`,
//! and every downstream step (join, filter, group-by, top-n) is a pure
//! function producing a new `Frame`. Source rows are never mutated.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::{EngineError, EngineResult};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Int and Float are numeric; everything
    /// else is not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Rank used to order values of different kinds; Null sorts below
    /// everything so descending leaderboards push it to the bottom.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Date(_) => 2,
            Value::Str(_) => 3,
        }
    }
}

// Group keys and join keys are hashed. Float keys hash by bit pattern,
// which matches the PartialEq we derive (NaN never appears in key data).
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Null => {}
        }
    }
}

/// Total ordering across values: Null first, then numerics (Int and Float
/// compare as f64), dates, strings. Used by the ranking adapter.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.kind_rank().cmp(&b.kind_rank()),
        },
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format(crate::constants::DATE_FMT)),
            Value::Null => Ok(()),
        }
    }
}

/// An ordered set of named columns with row-major data.
#[derive(Debug, Clone)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> EngineResult<()> {
        if row.len() != self.columns.len() {
            return Err(EngineError::RowArity {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> EngineResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| EngineError::UnknownColumn {
                column: name.to_string(),
            })
    }

    pub fn row(&self, index: usize) -> RowRef<'_> {
        RowRef { frame: self, index }
    }

    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.rows.len()).map(|i| self.row(i))
    }

    /// Keep the rows for which `predicate` holds. The predicate must be a
    /// pure function of the row; the input frame is untouched.
    pub fn filter(&self, predicate: impl Fn(RowRef<'_>) -> bool) -> Frame {
        let rows = self
            .iter()
            .filter(|r| predicate(*r))
            .map(|r| self.rows[r.index].clone())
            .collect();
        Frame {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Collect the numeric values of a column, skipping nulls.
    /// Non-numeric, non-null values are a TypeKind error.
    pub fn numeric_column(&self, name: &str) -> EngineResult<Vec<f64>> {
        let idx = self.column_index(name)?;
        let mut out = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match &row[idx] {
                Value::Null => {}
                v => out.push(v.as_f64().ok_or_else(|| EngineError::TypeKind {
                    column: name.to_string(),
                    reduction: "numeric_column",
                })?),
            }
        }
        Ok(out)
    }
}

/// Read-only view of one row, addressed by column name.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    frame: &'a Frame,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.frame
            .columns
            .iter()
            .position(|c| c == name)
            .map(|i| &self.frame.rows[self.index][i])
    }

    pub fn str_val(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn f64_val(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn date_val(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(Value::as_date)
    }

    pub fn values(&self) -> &'a [Value] {
        &self.frame.rows[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let mut f = Frame::new(&["name", "amount"]);
        f.push_row(vec![Value::str("a"), Value::Float(1.5)]).unwrap();
        f.push_row(vec![Value::str("b"), Value::Int(2)]).unwrap();
        f.push_row(vec![Value::str("c"), Value::Null]).unwrap();
        f
    }

    #[test]
    fn test_filter_is_pure() {
        let f = sample();
        let kept = f.filter(|r| r.f64_val("amount").is_some_and(|v| v >= 2.0));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.row(0).str_val("name"), Some("b"));
        // source frame unchanged
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn test_row_arity_checked() {
        let mut f = Frame::new(&["a", "b"]);
        let err = f.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RowArity {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_unknown_column() {
        let f = sample();
        assert!(matches!(
            f.column_index("nope"),
            Err(EngineError::UnknownColumn { .. })
        ));
        assert!(f.row(0).get("nope").is_none());
    }

    #[test]
    fn test_numeric_column_skips_nulls_rejects_strings() {
        let f = sample();
        assert_eq!(f.numeric_column("amount").unwrap(), vec![1.5, 2.0]);
        assert!(matches!(
            f.numeric_column("name"),
            Err(EngineError::TypeKind { .. })
        ));
    }

    #[test]
    fn test_value_ordering() {
        assert_eq!(
            cmp_values(&Value::Int(2), &Value::Float(2.0)),
            Ordering::Equal
        );
        assert_eq!(
            cmp_values(&Value::Null, &Value::Float(-10.0)),
            Ordering::Less
        );
        assert_eq!(
            cmp_values(&Value::str("a"), &Value::str("b")),
            Ordering::Less
        );
    }

    #[test]
    fn test_display_null_is_blank() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(7).to_string(), "7");
    }
}
