//! Purpose: Convert record arrays to and from plain, serializable tables.
//! Exports: `Table`, `Column`, `Cell`; `Record::to_table` / `Record::from_table`.
//! Role: Persistence boundary; collaborators embed `Table` in their own files.
//! Invariants: `to_table(from_table(t)) == t` for every valid table.
//! Invariants: Nested records become nested tables; aliasing is not preserved.
//! Invariants: Empty cells map to JSON null and back.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::core::error::{self, Error, ErrorKind};
use crate::core::record::Record;
use crate::core::shape::Shape;
use crate::core::storage::Core;
use crate::core::value::Value;

/// Plain field/value table with a shape; one column per field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub shape: Shape,
    pub columns: Vec<Column>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Value(serde_json::Value),
    Table(Table),
}

impl Table {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            columns: Vec::new(),
        }
    }

    /// A `1x1` table holding one cell per field.
    pub fn single<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Cell)>,
        K: Into<String>,
    {
        let columns = fields
            .into_iter()
            .map(|(name, cell)| Column {
                name: name.into(),
                cells: vec![cell],
            })
            .collect();
        Self {
            shape: Shape::scalar(),
            columns,
        }
    }

    pub fn with_column<I>(mut self, name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        self.columns.push(Column {
            name: name.into(),
            cells: cells.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Check column lengths against the shape and field-name uniqueness,
    /// recursing into nested tables.
    pub fn validate(&self) -> Result<(), Error> {
        let Some(numel) = self.shape.checked_numel() else {
            return Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!("shape {} holds too many elements", self.shape)));
        };
        for (idx, column) in self.columns.iter().enumerate() {
            if self.columns[..idx].iter().any(|seen| seen.name == column.name) {
                return Err(error::duplicate_field(&column.name));
            }
            if column.cells.len() != numel {
                return Err(Error::new(ErrorKind::ShapeMismatch)
                    .with_message(format!(
                        "column has {} cells but shape {} holds {numel}",
                        column.cells.len(),
                        self.shape
                    ))
                    .with_field(&column.name));
            }
            for cell in &column.cells {
                if let Cell::Table(nested) = cell {
                    nested.validate()?;
                }
            }
        }
        Ok(())
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        Cell::Value(value)
    }
}

impl From<Table> for Cell {
    fn from(table: Table) -> Self {
        Cell::Table(table)
    }
}

impl Record {
    /// Build an independent record array from `table`.
    pub fn from_table(table: &Table) -> Result<Record, Error> {
        table.validate()?;
        Ok(Record::from_core(core_from_table(table)))
    }

    /// Plain table with this view's shape, fields, and values.
    ///
    /// Fails with `Cyclic` when a record is nested inside itself, since such
    /// a structure has no finite table form.
    pub fn to_table(&self) -> Result<Table, Error> {
        let mut active = Vec::new();
        table_from_record(self, &mut active)
    }
}

fn core_from_table(table: &Table) -> Core {
    let fields = table.columns.iter().map(|column| column.name.clone()).collect();
    let columns = table
        .columns
        .iter()
        .map(|column| column.cells.iter().map(value_from_cell).collect())
        .collect();
    Core {
        shape: table.shape.clone(),
        fields,
        columns,
    }
}

pub(crate) fn value_from_cell(cell: &Cell) -> Value {
    match cell {
        Cell::Value(value) => Value::from(value.clone()),
        Cell::Table(nested) => Value::Record(Record::from_core(core_from_table(nested))),
    }
}

fn table_from_record(
    record: &Record,
    active: &mut Vec<*const RefCell<Core>>,
) -> Result<Table, Error> {
    let key = std::rc::Rc::as_ptr(&record.core);
    if active.contains(&key) {
        return Err(Error::new(ErrorKind::Cyclic)
            .with_message("record contains itself and cannot be tabulated"));
    }
    active.push(key);

    let positions = record.positions();
    let (fields, columns) = {
        let core = record.core.borrow();
        let columns = core
            .columns
            .iter()
            .map(|column| {
                positions
                    .iter()
                    .map(|&pos| column[pos].clone())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        (core.fields.clone(), columns)
    };

    let mut out = Vec::with_capacity(fields.len());
    for (name, values) in fields.into_iter().zip(columns) {
        let cells = values
            .iter()
            .map(|value| cell_from_value(value, active))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(Column { name, cells });
    }

    active.pop();
    Ok(Table {
        shape: record.shape(),
        columns: out,
    })
}

fn cell_from_value(value: &Value, active: &mut Vec<*const RefCell<Core>>) -> Result<Cell, Error> {
    Ok(match value {
        Value::Empty => Cell::Value(serde_json::Value::Null),
        Value::Json(json) => Cell::Value(json.clone()),
        Value::Record(nested) => Cell::Table(table_from_record(nested, active)?),
    })
}
