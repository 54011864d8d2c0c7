// Record construction from key/value pairs and empty shapes.
use crate::core::error::{self, Error, ErrorKind};
use crate::core::record::Record;
use crate::core::shape::Shape;
use crate::core::storage::Core;
use crate::core::value::Value;

/// Value side of a `(name, entry)` pair passed to [`Record::from_pairs`].
#[derive(Clone, Debug)]
pub enum Entry {
    /// Broadcast to every position of the result.
    Scalar(Value),
    /// One value per position of a `1xN` result.
    List(Vec<Value>),
    /// One value per position of a result with the given shape.
    Array(Shape, Vec<Value>),
}

impl Entry {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Entry::Scalar(value.into())
    }

    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Entry::List(values.into_iter().map(Into::into).collect())
    }

    pub fn array<I>(shape: impl Into<Shape>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Entry::Array(shape.into(), values.into_iter().map(Into::into).collect())
    }

    fn multi_shape(&self) -> Option<Shape> {
        match self {
            Entry::Scalar(_) => None,
            Entry::List(values) => Some(Shape::row(values.len())),
            Entry::Array(shape, _) => Some(shape.clone()),
        }
    }
}

impl Record {
    /// Build a record array from `(name, entry)` pairs.
    ///
    /// Multi-value entries fix the shape and must all agree on it; scalar
    /// entries are repeated at every position. Without any multi-value entry
    /// the result is a single `1x1` record.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Record, Error>
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(name, entry)| (name.into(), entry))
            .collect::<Vec<(String, Entry)>>();

        let mut common: Option<Shape> = None;
        for (name, entry) in &pairs {
            if let Entry::Array(shape, values) = entry {
                if values.len() != shape.numel() {
                    return Err(Error::new(ErrorKind::ShapeMismatch)
                        .with_message(format!(
                            "{} values cannot fill shape {shape}",
                            values.len()
                        ))
                        .with_field(name));
                }
            }
            let Some(shape) = entry.multi_shape() else {
                continue;
            };
            match &common {
                None => common = Some(shape),
                Some(expected) if *expected != shape => {
                    return Err(Error::new(ErrorKind::ShapeMismatch)
                        .with_message(format!(
                            "entry has shape {shape}, earlier entries have {expected}"
                        ))
                        .with_field(name));
                }
                Some(_) => {}
            }
        }

        let shape = common.unwrap_or_else(Shape::scalar);
        let numel = shape.numel();
        let mut fields = Vec::with_capacity(pairs.len());
        let mut columns = Vec::with_capacity(pairs.len());
        for (name, entry) in pairs {
            if fields.contains(&name) {
                return Err(error::duplicate_field(&name));
            }
            let column = match entry {
                Entry::Scalar(value) => vec![value; numel],
                Entry::List(values) | Entry::Array(_, values) => values,
            };
            fields.push(name);
            columns.push(column);
        }
        Ok(Record::from_core(Core::from_columns(shape, fields, columns)?))
    }

    /// A zero-position record array with no fields; `None` means `0x0`.
    pub fn empty(shape: Option<Shape>) -> Result<Record, Error> {
        Record::empty_with_fields(shape, Vec::<String>::new())
    }

    /// A zero-position record array carrying `fields`, so it concatenates
    /// with non-empty arrays of the same schema.
    pub fn empty_with_fields<I, S>(shape: Option<Shape>, fields: I) -> Result<Record, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let shape = shape.unwrap_or_else(Shape::zeros);
        if !shape.is_empty() {
            return Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!("shape {shape} is not empty")));
        }
        Record::new(shape, fields)
    }
}
