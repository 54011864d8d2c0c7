//! Purpose: Own the shared backing store behind every record handle.
//! Exports: `Core` (crate-internal).
//! Role: Column-per-field storage stamped with one shape for all columns.
//! Invariants: Every column holds exactly `shape.numel()` cells.
//! Invariants: Field names are unique and kept in insertion order.
//! Notes: Schema edits live in `core::schema`; handles live in `core::record`.

use crate::core::error::{self, Error, ErrorKind};
use crate::core::shape::Shape;
use crate::core::value::Value;

#[derive(Clone, Debug)]
pub(crate) struct Core {
    pub(crate) shape: Shape,
    pub(crate) fields: Vec<String>,
    pub(crate) columns: Vec<Vec<Value>>,
}

impl Core {
    /// Allocate a core whose fields are all default-filled.
    pub(crate) fn new(shape: Shape, fields: Vec<String>) -> Result<Self, Error> {
        check_unique(&fields)?;
        let numel = shape.numel();
        let columns = fields.iter().map(|_| vec![Value::Empty; numel]).collect();
        Ok(Self {
            shape,
            fields,
            columns,
        })
    }

    /// Assemble a core from prepared columns.
    pub(crate) fn from_columns(
        shape: Shape,
        fields: Vec<String>,
        columns: Vec<Vec<Value>>,
    ) -> Result<Self, Error> {
        check_unique(&fields)?;
        let numel = shape.numel();
        if fields.len() != columns.len() {
            return Err(Error::new(ErrorKind::SchemaMismatch)
                .with_message("field count does not match column count"));
        }
        for (name, column) in fields.iter().zip(&columns) {
            if column.len() != numel {
                return Err(Error::new(ErrorKind::ShapeMismatch)
                    .with_message(format!(
                        "column has {} values but shape {shape} holds {numel}",
                        column.len()
                    ))
                    .with_field(name));
            }
        }
        Ok(Self {
            shape,
            fields,
            columns,
        })
    }

    pub(crate) fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub(crate) fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| name == field)
    }

    pub(crate) fn column(&self, field: &str) -> Result<&[Value], Error> {
        let col = self
            .position(field)
            .ok_or_else(|| error::no_such_field(field))?;
        Ok(&self.columns[col])
    }

    /// Column index for `field`, materializing it at every position if absent.
    pub(crate) fn ensure_field(&mut self, field: &str) -> usize {
        if let Some(col) = self.position(field) {
            return col;
        }
        self.push_field(field.to_string());
        self.fields.len() - 1
    }

    pub(crate) fn push_field(&mut self, field: String) {
        tracing::debug!(field = %field, shape = %self.shape, "field added");
        self.columns.push(vec![Value::Empty; self.numel()]);
        self.fields.push(field);
    }

    pub(crate) fn set_cell(&mut self, col: usize, pos: usize, value: Value) {
        self.columns[col][pos] = value;
    }

    /// Copy out the cells at `positions` as a standalone core.
    pub(crate) fn extract(&self, positions: &[usize], shape: Shape) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| positions.iter().map(|&pos| column[pos].clone()).collect())
            .collect();
        Self {
            shape,
            fields: self.fields.clone(),
            columns,
        }
    }
}

fn check_unique(fields: &[String]) -> Result<(), Error> {
    for (idx, name) in fields.iter().enumerate() {
        if fields[..idx].contains(name) {
            return Err(error::duplicate_field(name));
        }
    }
    Ok(())
}
