//! Purpose: Centralize table file format versioning.
//! Exports: `TABLE_FORMAT_VERSION`, `SUPPORTED_TABLE_FORMAT_VERSIONS`, `format_version_error`.
//! Role: Shared policy for gating file compatibility on load.
//! Invariants: Version list is additive; bump only for incompatible layout changes.

use crate::core::error::{Error, ErrorKind};

pub const TABLE_FORMAT_VERSION: u32 = 1;
pub const SUPPORTED_TABLE_FORMAT_VERSIONS: &[u32] = &[TABLE_FORMAT_VERSION];

pub fn is_supported(version: u32) -> bool {
    SUPPORTED_TABLE_FORMAT_VERSIONS.contains(&version)
}

pub fn format_version_error(detected: u32) -> Error {
    let supported = SUPPORTED_TABLE_FORMAT_VERSIONS
        .iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Error::new(ErrorKind::Corrupt)
        .with_message(format!(
            "unsupported table format version {detected} (supported: {supported})"
        ))
        .with_hint("Upgrade structobj or re-save the file with a supported version.")
}
