//! Purpose: Dynamic record arrays for configuration storage and data interchange.
//! Exports: `api` (stable surface) and `core` (storage, indexing, schema, tables).
//! Role: Library backing plugin hosts and configuration loaders; no CLI or network.
//! Invariants: Handles from indexing alias their parent; `copy` never shares storage.
//! Invariants: Single-threaded; records are `!Send` and callers own any locking.
pub mod api;
pub mod core;
mod json;
