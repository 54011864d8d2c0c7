// Opaque cell values stored at each record position.
use crate::core::record::Record;

/// A single cell.
///
/// `Empty` is the default sentinel for positions never written. Nested
/// records keep their handle identity until the cell is reassigned.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Empty,
    Json(serde_json::Value),
    Record(Record),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty | Value::Json(serde_json::Value::Null))
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(serde_json::Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(serde_json::Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(serde_json::Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(serde_json::Value::as_bool)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.values_eq(b),
            (a, b) => a.is_empty() && b.is_empty(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Empty,
            other => Value::Json(other),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<&Record> for Value {
    fn from(record: &Record) -> Self {
        Value::Record(record.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Json(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Json(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Json(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Json(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Json(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Json(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Value::from(value).into()
    }
}
