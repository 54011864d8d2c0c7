//! Purpose: Provide `Record`, the handle through which callers use a core.
//! Exports: `Record`.
//! Role: Lightweight view (whole array or explicit positions) over a shared core.
//! Invariants: Handles obtained by indexing alias the same core as their parent.
//! Invariants: Writing an unknown field materializes it at every core position.
//! Invariants: `copy` never shares storage with its source, nested cores included.
//! Notes: Single-threaded by construction (`Rc<RefCell<_>>`), so `Record` is !Send.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::error::{self, Error, ErrorKind};
use crate::core::index::{self, Index};
use crate::core::shape::Shape;
use crate::core::storage::Core;
use crate::core::value::Value;

pub(crate) type SharedCore = Rc<RefCell<Core>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum View {
    Whole,
    Slice { positions: Vec<usize>, shape: Shape },
}

/// Handle to a record array, or to a selection of its positions.
///
/// Cloning a `Record` clones the handle, not the data: both clones address
/// the same storage. Use [`Record::copy`] for an independent array.
#[derive(Clone)]
pub struct Record {
    pub(crate) core: SharedCore,
    pub(crate) view: View,
}

impl Record {
    /// Allocate a record array of `shape` with every field empty.
    pub fn new<I, S>(shape: impl Into<Shape>, fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        Ok(Self::from_core(Core::new(shape.into(), fields)?))
    }

    pub(crate) fn from_core(core: Core) -> Self {
        Self {
            core: Rc::new(RefCell::new(core)),
            view: View::Whole,
        }
    }

    /// Shape of the addressed positions.
    pub fn shape(&self) -> Shape {
        match &self.view {
            View::Whole => self.core.borrow().shape.clone(),
            View::Slice { shape, .. } => shape.clone(),
        }
    }

    /// Number of addressed positions.
    pub fn len(&self) -> usize {
        match &self.view {
            View::Whole => self.core.borrow().numel(),
            View::Slice { positions, .. } => positions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the handle addresses exactly one position.
    pub fn is_single(&self) -> bool {
        self.len() == 1
    }

    /// Core positions addressed by this handle, in view order.
    pub(crate) fn positions(&self) -> Vec<usize> {
        match &self.view {
            View::Whole => (0..self.core.borrow().numel()).collect(),
            View::Slice { positions, .. } => positions.clone(),
        }
    }

    /// Select positions of this view; the result aliases the same storage.
    pub fn at(&self, indices: &[Index]) -> Result<Record, Error> {
        let selection = index::resolve(&self.shape(), indices)?;
        let positions = match &self.view {
            View::Whole => selection.positions,
            View::Slice { positions, .. } => selection
                .positions
                .into_iter()
                .map(|local| positions[local])
                .collect(),
        };
        Ok(Record {
            core: Rc::clone(&self.core),
            view: View::Slice {
                positions,
                shape: selection.shape,
            },
        })
    }

    pub fn at_linear(&self, position: usize) -> Result<Record, Error> {
        self.at(&[Index::At(position)])
    }

    /// Single-position handles for every addressed position, in view order.
    pub fn iter(&self) -> impl Iterator<Item = Record> {
        let core = Rc::clone(&self.core);
        self.positions().into_iter().map(move |position| Record {
            core: Rc::clone(&core),
            view: View::Slice {
                positions: vec![position],
                shape: Shape::scalar(),
            },
        })
    }

    /// Value of `field` at the single addressed position.
    pub fn get(&self, field: &str) -> Result<Value, Error> {
        let positions = self.positions();
        let core = self.core.borrow();
        let column = core.column(field)?;
        match positions.as_slice() {
            [position] => Ok(column[*position].clone()),
            _ => Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "get needs a single position, handle addresses {}",
                    positions.len()
                ))
                .with_field(field)
                .with_hint("use read to collect one value per position")),
        }
    }

    /// Values of `field` at every addressed position, in view order.
    pub fn read(&self, field: &str) -> Result<Vec<Value>, Error> {
        let positions = self.positions();
        let core = self.core.borrow();
        let column = core.column(field)?;
        Ok(positions.iter().map(|&pos| column[pos].clone()).collect())
    }

    /// Like [`Record::get`], falling back to `default` when `field` is unknown.
    pub fn get_field(&self, field: &str, default: Option<Value>) -> Result<Value, Error> {
        if self.has_field(field) {
            return self.get(field);
        }
        default.ok_or_else(|| error::no_such_field(field))
    }

    /// Broadcast `value` to every addressed position.
    ///
    /// An unknown field is created across the whole core first, so positions
    /// outside this handle see it as empty.
    pub fn set(&self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        let positions = self.positions();
        let mut core = self.core.borrow_mut();
        let col = core.ensure_field(field);
        for position in positions {
            core.set_cell(col, position, value.clone());
        }
    }

    /// Assign one value per addressed position, in view order.
    pub fn set_each<I>(&self, field: &str, values: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<Value>>();
        let positions = self.positions();
        if values.len() != positions.len() {
            return Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "{} values for {} addressed positions",
                    values.len(),
                    positions.len()
                ))
                .with_field(field));
        }
        let mut core = self.core.borrow_mut();
        let col = core.ensure_field(field);
        for (position, value) in positions.into_iter().zip(values) {
            core.set_cell(col, position, value);
        }
        Ok(())
    }

    /// Deep copy into a new, independent core shaped like this view.
    pub fn copy(&self) -> Record {
        let mut memo = Memo::new();
        let core = match &self.view {
            View::Whole => clone_shared(&self.core, &mut memo),
            View::Slice { positions, shape } => {
                let detached = self.core.borrow().extract(positions, shape.clone());
                Rc::new(RefCell::new(clone_detached(detached, &mut memo)))
            }
        };
        tracing::debug!(shape = %core.borrow().shape, nested = memo.len(), "record copied");
        Record {
            core,
            view: View::Whole,
        }
    }

    /// True when both handles address the same positions of the same core.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.core, &other.core) && self.view == other.view
    }

    /// True when both handles are backed by the same core.
    pub fn shares_storage(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Structural equality of shape, field order, and values.
    pub fn values_eq(&self, other: &Record) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.to_table(), other.to_table()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Record");
        match self.core.try_borrow() {
            Ok(core) => {
                out.field("core_shape", &core.shape.to_string());
                out.field("fields", &core.fields);
            }
            Err(_) => {
                out.field("core", &"<borrowed>");
            }
        }
        match &self.view {
            View::Whole => out.field("view", &"whole"),
            View::Slice { positions, shape } => out
                .field("view_shape", &shape.to_string())
                .field("positions", positions),
        };
        out.finish()
    }
}

type Memo = HashMap<*const RefCell<Core>, SharedCore>;

fn clone_shared(source: &SharedCore, memo: &mut Memo) -> SharedCore {
    let key = Rc::as_ptr(source);
    if let Some(done) = memo.get(&key) {
        return Rc::clone(done);
    }
    let snapshot = source.borrow().clone();
    // Registered before recursing so self-references resolve to the new core.
    let fresh = Rc::new(RefCell::new(Core {
        shape: snapshot.shape.clone(),
        fields: snapshot.fields.clone(),
        columns: Vec::new(),
    }));
    memo.insert(key, Rc::clone(&fresh));
    let columns = clone_columns(snapshot.columns, memo);
    fresh.borrow_mut().columns = columns;
    fresh
}

fn clone_detached(core: Core, memo: &mut Memo) -> Core {
    let columns = clone_columns(core.columns, memo);
    Core {
        shape: core.shape,
        fields: core.fields,
        columns,
    }
}

fn clone_columns(columns: Vec<Vec<Value>>, memo: &mut Memo) -> Vec<Vec<Value>> {
    columns
        .into_iter()
        .map(|column| {
            column
                .into_iter()
                .map(|value| match value {
                    Value::Record(nested) => Value::Record(Record {
                        core: clone_shared(&nested.core, memo),
                        view: nested.view,
                    }),
                    other => other,
                })
                .collect()
        })
        .collect()
}
