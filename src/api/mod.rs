//! Purpose: Define the stable public Rust API boundary for structobj.
//! Exports: Record handles, values, shapes, tables, and persistence helpers.
//! Role: Public, additive-only surface; hides crate-internal storage.
//! Invariants: Everything a collaborator needs is reachable from this module.

pub use crate::core::concat::concat;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::expand::Entry;
pub use crate::core::format::TABLE_FORMAT_VERSION;
pub use crate::core::index::Index;
pub use crate::core::merge::Source;
pub use crate::core::persist::{Durability, SaveOptions, load, save};
pub use crate::core::record::Record;
pub use crate::core::schema::FieldOrder;
pub use crate::core::shape::Shape;
pub use crate::core::table::{Cell, Column, Table};
pub use crate::core::value::Value;
