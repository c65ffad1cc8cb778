//! Column-addressable tables handed to the plot composer.

use crate::config::FloatFormat;
use crate::{PlotError, Result};
use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell: numeric or text. A NaN number marks a missing value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Number(v) if v.is_nan())
    }

    /// Total order used for contour levels: numbers ascending, then text.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric view of the column; text cells are an error.
    pub fn numeric(&self) -> Result<Vec<f64>> {
        self.values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_f64().ok_or_else(|| {
                    Report::new(PlotError::InvalidInput(format!(
                        "column `{}` is not numeric",
                        self.name
                    )))
                    .attach(format!("row {row} holds {v:?}"))
                })
            })
            .collect()
    }
}

/// Named columns of equal length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. Names must be unique and lengths must match existing columns.
    pub fn with_column<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    pub fn push_column<V: Into<Value>>(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        if self.columns.iter().any(|c| c.name == name) {
            return Err(Report::new(PlotError::InvalidInput(format!(
                "duplicate column `{name}`"
            ))));
        }
        if let Some(first) = self.columns.first()
            && first.len() != values.len()
        {
            return Err(Report::new(PlotError::InvalidInput(format!(
                "column `{name}` has {} rows, dataset has {}",
                values.len(),
                first.len()
            ))));
        }

        self.columns.push(Column { name, values });
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.iter().find(|c| c.name == name).ok_or_else(|| {
            Report::new(PlotError::ColumnNotFound(name.to_owned()))
                .attach(format!("available columns: {:?}", self.column_names()))
        })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text table with a header row; numbers go through `format`.
    pub fn format_table(&self, format: &FloatFormat) -> String {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| {
                std::iter::once(c.name.clone())
                    .chain(c.values.iter().map(|v| match v {
                        Value::Number(n) => format.format(*n),
                        Value::Text(s) => s.clone(),
                    }))
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = cells
            .iter()
            .map(|col| col.iter().map(|s| s.chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in 0..=self.len() {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(col, &w)| format!("{:>w$}", col[row]))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Dataset {
        Dataset::new()
            .with_column("a", [1.0, 2.0])
            .unwrap()
            .with_column("b", [3, 4])
            .unwrap()
            .with_column("c", ["x", "y"])
            .unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let ds = abc();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), vec!["a", "b", "c"]);
        assert_eq!(ds.column("b").unwrap().numeric().unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn missing_column_reports_its_name() {
        let err = abc().column("z").unwrap_err();
        match err.current_context() {
            PlotError::ColumnNotFound(name) => assert_eq!(name, "z"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn text_column_is_not_numeric() {
        let err = abc().column("c").unwrap().numeric().unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(_)));
    }

    #[test]
    fn ragged_and_duplicate_columns_are_rejected() {
        let ragged = abc().with_column("d", [1.0]).unwrap_err();
        assert!(matches!(ragged.current_context(), PlotError::InvalidInput(_)));

        let dup = abc().with_column("a", [0.0, 0.0]).unwrap_err();
        assert!(matches!(dup.current_context(), PlotError::InvalidInput(_)));
    }

    #[test]
    fn table_uses_the_float_format() {
        let ds = Dataset::new()
            .with_column("area", [1234.5, 2.0])
            .unwrap()
            .with_column("kind", ["big", "small"])
            .unwrap();
        assert_eq!(
            ds.format_table(&FloatFormat::default()),
            "    area   kind\n1,234.50    big\n    2.00  small\n"
        );
    }

    #[test]
    fn missing_values_are_nan_numbers() {
        assert!(Value::Number(f64::NAN).is_missing());
        assert!(!Value::Number(0.0).is_missing());
        assert!(!Value::from("").is_missing());
    }

    #[test]
    fn numbers_order_before_text() {
        let mut vals: Vec<Value> = vec!["b".into(), 2.0.into(), "a".into(), (-1).into()];
        vals.sort_by(Value::total_cmp);
        assert_eq!(
            vals,
            vec![Value::from(-1), Value::from(2.0), "a".into(), "b".into()]
        );
    }

    #[test]
    fn untagged_json_cells() {
        let vals: Vec<Value> = serde_json::from_str(r#"[1.5, "setosa"]"#).unwrap();
        assert_eq!(vals, vec![Value::Number(1.5), Value::Text("setosa".into())]);
    }
}
