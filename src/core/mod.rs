// Core modules implementing storage, indexing, schema, and table conversion.
pub mod concat;
pub mod error;
pub mod expand;
pub mod format;
pub mod index;
pub mod merge;
pub mod persist;
pub mod record;
pub mod schema;
pub mod shape;
pub mod table;
pub mod value;

mod storage;
