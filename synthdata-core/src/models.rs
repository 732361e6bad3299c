//! Core tabular data model.
//!
//! A [`Table`] is an ordered collection of named, equal-length columns. Each
//! [`Column`] infers its [`ColumnKind`] once, at construction, from the
//! dominant type of its non-null cells. Columns are held behind [`Arc`] so a
//! derived table (for example the output of noise injection) can share the
//! columns it did not touch with its source.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::stats::NumericSummary;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
    /// Timestamp, normalized to UTC
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric value of an `Int` or `Float` cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text of a `Text` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp of a `DateTime` cell.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns true if the cell holds an integral number.
    ///
    /// Float cells count when they have no fractional part.
    pub fn is_exact_integer(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        }
    }

    /// Converts a parsed JSON value into a cell.
    ///
    /// Strings shaped like ISO-8601 dates or timestamps become `DateTime`
    /// cells. Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => {
                parse_datetime(s).map_or_else(|| Value::Text(s.clone()), Value::DateTime)
            }
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Text(value.to_string())
            }
        }
    }

    /// Converts the cell back into JSON.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
        }
    }

    fn family(&self) -> Option<KindFamily> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(KindFamily::Boolean),
            Value::Int(_) | Value::Float(_) => Some(KindFamily::Numeric),
            Value::Text(_) => Some(KindFamily::Text),
            Value::DateTime(_) => Some(KindFamily::DateTime),
        }
    }

    fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(ValueKey::Bool(*b)),
            Value::Int(i) => Some(ValueKey::Int(*i)),
            Value::Float(f) => {
                // Integral floats compare equal to the matching integer cell
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(ValueKey::Int(*f as i64))
                } else {
                    Some(ValueKey::Float(f.to_bits()))
                }
            }
            Value::Text(s) => Some(ValueKey::Text(s)),
            Value::DateTime(dt) => Some(ValueKey::DateTime(dt.timestamp(), dt.timestamp_subsec_nanos())),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Hashable identity of a non-null cell, used for distinct and mode counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
    DateTime(i64, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KindFamily {
    Numeric,
    DateTime,
    Boolean,
    Text,
}

/// Parses ISO-8601 / RFC 3339 shaped strings into UTC timestamps.
///
/// A cheap shape check runs first so ordinary text never reaches chrono.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let bytes = s.as_bytes();
    if bytes.len() < 10 || bytes.get(4) != Some(&b'-') || bytes.get(7) != Some(&b'-') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Inferred kind of a column.
///
/// `Integer` and `Float` together form the numeric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Numeric column whose numeric cells are all integers
    Integer,
    /// Numeric column with at least one float cell
    Float,
    /// Text column (also used for all-null columns)
    Text,
    /// Timestamp column
    DateTime,
    /// Boolean column
    Boolean,
}

impl ColumnKind {
    /// Returns true for `Integer` and `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Infers the kind from the dominant type of the non-null cells.
    ///
    /// Ties between families resolve in the order numeric, datetime,
    /// boolean, text. A numeric column is `Integer` only when none of its
    /// numeric cells is stored as a float.
    pub fn infer(values: &[Value]) -> Self {
        let mut counts: HashMap<KindFamily, usize> = HashMap::new();
        let mut saw_float = false;

        for value in values {
            if let Some(family) = value.family() {
                *counts.entry(family).or_insert(0) += 1;
            }
            if matches!(value, Value::Float(_)) {
                saw_float = true;
            }
        }

        let mut dominant: Option<(KindFamily, usize)> = None;
        for family in [
            KindFamily::Numeric,
            KindFamily::DateTime,
            KindFamily::Boolean,
            KindFamily::Text,
        ] {
            let count = counts.get(&family).copied().unwrap_or(0);
            if count > 0 && dominant.is_none_or(|(_, best)| count > best) {
                dominant = Some((family, count));
            }
        }

        match dominant.map(|(family, _)| family) {
            Some(KindFamily::Numeric) if saw_float => ColumnKind::Float,
            Some(KindFamily::Numeric) => ColumnKind::Integer,
            Some(KindFamily::DateTime) => ColumnKind::DateTime,
            Some(KindFamily::Boolean) => ColumnKind::Boolean,
            Some(KindFamily::Text) | None => ColumnKind::Text,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::DateTime => write!(f, "datetime"),
            ColumnKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// A named column of cells with its inferred kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column, inferring its kind from the values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = ColumnKind::infer(&values);
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Creates a column from anything convertible into cells.
    pub fn from_values<T: Into<Value>>(name: impl Into<String>, values: Vec<T>) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind inferred at construction.
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// All cells, nulls included.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of cells (the table's row count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the non-null cells.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Number of non-null cells.
    pub fn non_null_count(&self) -> usize {
        self.len() - self.null_count()
    }

    /// Number of distinct non-null values.
    pub fn unique_count(&self) -> usize {
        self.values
            .iter()
            .filter_map(Value::key)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Occurrence count of the most frequent non-null value.
    pub fn most_frequent_count(&self) -> usize {
        let mut counts: HashMap<ValueKey<'_>, usize> = HashMap::new();
        for key in self.values.iter().filter_map(Value::key) {
            *counts.entry(key).or_insert(0) += 1;
        }
        counts.values().copied().max().unwrap_or(0)
    }

    /// Numeric cells as `f64`, in row order, non-finite values included.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Summary statistics over the numeric cells.
    ///
    /// Returns `None` when the column has no numeric cells.
    pub fn numeric_summary(&self) -> Option<NumericSummary> {
        NumericSummary::from_values(&self.numeric_values())
    }

    /// Returns a column with the same name and kind but new cells.
    ///
    /// Used by transformations that must not change the schema.
    pub(crate) fn with_values(&self, values: Vec<Value>) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            values,
        }
    }
}

/// An ordered collection of named, equal-length columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Arc<Column>>,
    row_count: usize,
}

impl Table {
    /// Creates a table, validating unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        Self::from_shared(columns.into_iter().map(Arc::new).collect())
    }

    /// Creates a table from shared columns.
    pub fn from_shared(columns: Vec<Arc<Column>>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |c| c.len());
        let mut seen: HashSet<&str> = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(SynthError::invalid_table(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
            if column.len() != row_count {
                return Err(SynthError::invalid_table(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Builds a table from row-oriented JSON objects.
    ///
    /// Column names come from the first row, in the order its keys were
    /// written. Keys missing from a later row are treated as nulls; keys
    /// that only appear in later rows are ignored.
    pub fn from_records(rows: &[serde_json::Value]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let names: Vec<&String> = first
            .as_object()
            .ok_or_else(|| SynthError::invalid_table("row 0 is not a JSON object"))?
            .keys()
            .collect();

        let mut cells: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (index, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| {
                SynthError::invalid_table(format!("row {index} is not a JSON object"))
            })?;
            for (name, column) in names.iter().zip(cells.iter_mut()) {
                column.push(object.get(*name).map_or(Value::Null, Value::from_json));
            }
        }

        Self::new(
            names
                .into_iter()
                .zip(cells)
                .map(|(name, values)| Column::new(name.clone(), values))
                .collect(),
        )
    }

    /// Builds a table from column-oriented JSON (`{"name": [..], ..}`).
    pub fn from_columns(columns: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut built = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            let array = values.as_array().ok_or_else(|| {
                SynthError::invalid_table(format!("column '{name}' is not a JSON array"))
            })?;
            built.push(Column::new(
                name.clone(),
                array.iter().map(Value::from_json).collect(),
            ));
        }
        Self::new(built)
    }

    /// Builds a table from either JSON layout.
    ///
    /// An array is read as records, an object as columns.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(rows) => Self::from_records(rows),
            serde_json::Value::Object(columns) => Self::from_columns(columns),
            _ => Err(SynthError::invalid_table(
                "expected an array of records or an object of columns",
            )),
        }
    }

    /// Parses a table from JSON text in either layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| SynthError::serialization("parsing table JSON", e))?;
        Self::from_json(&value)
    }

    /// Converts the table into row-oriented JSON objects.
    pub fn to_records(&self) -> Vec<serde_json::Value> {
        (0..self.row_count)
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .map(|c| (c.name().to_string(), c.values()[row].to_json()))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns a table over replacement columns with the same names, order
    /// and lengths as this one.
    pub(crate) fn with_columns(&self, columns: Vec<Arc<Column>>) -> Self {
        debug_assert_eq!(columns.len(), self.columns.len());
        Self {
            columns,
            row_count: self.row_count,
        }
    }
}
