//! Purpose: Internal JSON parsing boundary shared by persistence callsites.
//! Exports: `parse` module with decode helpers.
//! Role: Single seam for decoding so callsites avoid ad hoc parse logic.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
