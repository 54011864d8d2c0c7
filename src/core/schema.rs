//! Purpose: Manage the ordered field set shared by every position of a core.
//! Exports: `FieldOrder` and the schema methods on `Record`.
//! Role: Single place where fields are added, dropped, renamed, or reordered.
//! Invariants: Schema edits apply to the whole core, never to a sub-selection.
//! Invariants: Every operation validates fully before touching storage.

use crate::core::error::{self, Error, ErrorKind};
use crate::core::record::Record;
use crate::core::storage::Core;

/// Target ordering for `Record::order_fields`.
#[derive(Clone, Debug)]
pub enum FieldOrder {
    /// Lexicographic (byte-wise) order of the field names.
    Sorted,
    /// Explicit names; must be a permutation of the current fields.
    Names(Vec<String>),
    /// Explicit positions; `new[i] = old[p[i]]`.
    Permutation(Vec<usize>),
    /// The field order of another record with the same field set.
    Like(Record),
}

impl Core {
    pub(crate) fn add_field(&mut self, name: &str) -> Result<(), Error> {
        if self.position(name).is_some() {
            return Err(error::duplicate_field(name));
        }
        self.push_field(name.to_string());
        Ok(())
    }

    pub(crate) fn remove_field(&mut self, name: &str) -> Result<(), Error> {
        let col = self
            .position(name)
            .ok_or_else(|| error::no_such_field(name))?;
        self.fields.remove(col);
        self.columns.remove(col);
        tracing::debug!(field = %name, "field removed");
        Ok(())
    }

    pub(crate) fn rename_field(&mut self, from: &str, to: &str) -> Result<(), Error> {
        let col = self
            .position(from)
            .ok_or_else(|| error::no_such_field(from))?;
        if from == to {
            return Ok(());
        }
        if self.position(to).is_some() {
            return Err(error::duplicate_field(to));
        }
        self.fields[col] = to.to_string();
        tracing::debug!(from = %from, to = %to, "field renamed");
        Ok(())
    }

    pub(crate) fn order_fields(&mut self, order: &FieldOrder) -> Result<Vec<usize>, Error> {
        let permutation = self.permutation_for(order)?;
        let mut fields = std::mem::take(&mut self.fields);
        let mut columns = std::mem::take(&mut self.columns);
        let mut reordered_fields = Vec::with_capacity(fields.len());
        let mut reordered_columns = Vec::with_capacity(columns.len());
        for &old in &permutation {
            reordered_fields.push(std::mem::take(&mut fields[old]));
            reordered_columns.push(std::mem::take(&mut columns[old]));
        }
        self.fields = reordered_fields;
        self.columns = reordered_columns;
        tracing::debug!(fields = ?self.fields, "fields reordered");
        Ok(permutation)
    }

    fn permutation_for(&self, order: &FieldOrder) -> Result<Vec<usize>, Error> {
        match order {
            FieldOrder::Sorted => {
                let mut permutation = (0..self.fields.len()).collect::<Vec<_>>();
                permutation.sort_by(|&a, &b| self.fields[a].cmp(&self.fields[b]));
                Ok(permutation)
            }
            FieldOrder::Names(names) => self.permutation_for_names(names),
            FieldOrder::Like(other) => self.permutation_for_names(&other.fieldnames()),
            FieldOrder::Permutation(permutation) => {
                check_permutation(permutation, self.fields.len())?;
                Ok(permutation.clone())
            }
        }
    }

    fn permutation_for_names(&self, names: &[String]) -> Result<Vec<usize>, Error> {
        if names.len() != self.fields.len() {
            return Err(schema_mismatch(format!(
                "order names {} fields but the record has {}",
                names.len(),
                self.fields.len()
            )));
        }
        let permutation = names
            .iter()
            .map(|name| {
                self.position(name).ok_or_else(|| {
                    schema_mismatch("order names an unknown field".to_string()).with_field(name)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        check_permutation(&permutation, self.fields.len())?;
        Ok(permutation)
    }
}

fn check_permutation(permutation: &[usize], len: usize) -> Result<(), Error> {
    if permutation.len() != len {
        return Err(schema_mismatch(format!(
            "permutation has {} entries for {len} fields",
            permutation.len()
        )));
    }
    let mut seen = vec![false; len];
    for &idx in permutation {
        if idx >= len || seen[idx] {
            return Err(schema_mismatch(format!(
                "entry {idx} is out of range or repeated"
            )));
        }
        seen[idx] = true;
    }
    Ok(())
}

fn schema_mismatch(message: String) -> Error {
    Error::new(ErrorKind::SchemaMismatch).with_message(message)
}

impl Record {
    /// Field names in storage order.
    pub fn fieldnames(&self) -> Vec<String> {
        self.core.borrow().fields.clone()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.core.borrow().position(name).is_some()
    }

    /// Append `name` to the schema, empty at every position of the core.
    pub fn add_field(&self, name: &str) -> Result<(), Error> {
        self.core.borrow_mut().add_field(name)
    }

    pub fn remove_field(&self, name: &str) -> Result<(), Error> {
        self.core.borrow_mut().remove_field(name)
    }

    pub fn rename_field(&self, from: &str, to: &str) -> Result<(), Error> {
        self.core.borrow_mut().rename_field(from, to)
    }

    /// Reorder the schema and return `p` such that `new[i] == old[p[i]]`.
    pub fn order_fields(&self, order: FieldOrder) -> Result<Vec<usize>, Error> {
        // The template may alias this core; read it before borrowing mutably.
        let order = match order {
            FieldOrder::Like(other) => FieldOrder::Names(other.fieldnames()),
            order => order,
        };
        self.core.borrow_mut().order_fields(&order)
    }
}
