//! Core data models for parsed tables
//!
//! This module defines the values produced by converters and the records a
//! parse returns. A record is either named (column name to value, in column
//! order) or a plain tuple when the table has no column names.

use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single field value after optional type conversion
#[derive(Debug, Clone)]
pub enum Value {
    /// No value (e.g. a date that matched no layout)
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Raw or trimmed text
    Str(String),
    Date(NaiveDate),
}

impl Value {
    /// Borrow the text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// Floats compare by bit pattern so that Eq and Hash agree, which the
// duplicate filter relies on.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// A record keyed by column name
///
/// The column list is shared by every record of one parse. Iteration follows
/// column order. A row shorter than the column set yields a record with
/// fewer entries; values beyond the column count are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRecord {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl NamedRecord {
    pub fn new(columns: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.truncate(columns.len());
        Self { columns, values }
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|index| self.values.get(index))
    }

    /// Column names present in this record, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns[..self.values.len()].iter().map(String::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// (column, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for NamedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// One parsed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Column name to value mapping
    Named(NamedRecord),
    /// Ordered values of a table without column names
    Tuple(Vec<Value>),
}

impl Record {
    /// Look up a value by name (named records) or position (either shape)
    pub fn get_field(&self, field: &Field) -> Option<&Value> {
        match (self, field) {
            (Record::Named(named), Field::Name(name)) => named.get(name),
            (Record::Named(named), Field::Position(index)) => named.values().get(*index),
            (Record::Tuple(values), Field::Position(index)) => values.get(*index),
            (Record::Tuple(_), Field::Name(_)) => None,
        }
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            Record::Named(named) => named.get(column),
            Record::Tuple(_) => None,
        }
    }

    pub fn values(&self) -> &[Value] {
        match self {
            Record::Named(named) => named.values(),
            Record::Tuple(values) => values,
        }
    }

    pub fn as_named(&self) -> Option<&NamedRecord> {
        match self {
            Record::Named(named) => Some(named),
            Record::Tuple(_) => None,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Record::Named(_))
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Record::Named(named) => named.serialize(serializer),
            Record::Tuple(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

/// Identifies a field within a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Name(String),
    Position(usize),
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::Name(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Name(name)
    }
}

impl From<usize> for Field {
    fn from(index: usize) -> Self {
        Field::Position(index)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name(name) => f.write_str(name),
            Field::Position(index) => write!(f, "#{}", index),
        }
    }
}
