// Table file save/load with a versioned JSON envelope and advisory locking.
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use fs2::FileExt;
use libc::{EACCES, EPERM};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};
use crate::core::format::{self, TABLE_FORMAT_VERSION};
use crate::core::record::Record;
use crate::core::table::Table;
use crate::json::parse;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Durability {
    Fast,
    Flush,
}

#[derive(Clone, Copy, Debug)]
pub struct SaveOptions {
    pub durability: Durability,
    pub pretty: bool,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self {
            durability: Durability::Fast,
            pretty: false,
        }
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: u32,
    table: &'a Table,
}

#[derive(Deserialize)]
struct RawEnvelope {
    format: u32,
    table: serde_json::Value,
}

/// Write `record` to `path` as a table file, replacing any previous content.
///
/// The file is one convenience layout for [`Table`]. Callers with their own
/// storage can embed the table from [`Record::to_table`] directly and never
/// touch `save`/`load`.
pub fn save(path: impl AsRef<Path>, record: &Record, options: SaveOptions) -> Result<(), Error> {
    let path = path.as_ref();
    let table = record.to_table()?;
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|err| Error::new(ErrorKind::Io).with_path(path).with_source(err))?;

    let _lock = FileLock::exclusive(&file, path)?;
    file.set_len(0)
        .map_err(|err| Error::new(ErrorKind::Io).with_path(path).with_source(err))?;

    let envelope = EnvelopeRef {
        format: TABLE_FORMAT_VERSION,
        table: &table,
    };
    let mut writer = BufWriter::new(&file);
    let encoded = if options.pretty {
        serde_json::to_writer_pretty(&mut writer, &envelope)
    } else {
        serde_json::to_writer(&mut writer, &envelope)
    };
    encoded.map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to encode table")
            .with_path(path)
            .with_source(err)
    })?;
    writer
        .flush()
        .map_err(|err| Error::new(ErrorKind::Io).with_path(path).with_source(err))?;
    drop(writer);

    if options.durability == Durability::Flush {
        file.sync_all()
            .map_err(|err| Error::new(ErrorKind::Io).with_path(path).with_source(err))?;
    }
    tracing::debug!(path = %path.display(), shape = %table.shape, "table saved");
    Ok(())
}

/// Read a table file written by [`save`] into a fresh record array.
pub fn load(path: impl AsRef<Path>) -> Result<Record, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => ErrorKind::Permission,
            _ => ErrorKind::Io,
        };
        Error::new(kind).with_path(path).with_source(err)
    })?;

    let mut text = String::new();
    {
        let _lock = FileLock::shared(&file, path)?;
        (&file)
            .read_to_string(&mut text)
            .map_err(|err| Error::new(ErrorKind::Io).with_path(path).with_source(err))?;
    }

    let context = path.display().to_string();
    let raw: RawEnvelope = parse::from_str(&text).map_err(|err| corrupt(path, &err, &context))?;
    if !format::is_supported(raw.format) {
        tracing::warn!(path = %context, format = raw.format, "unsupported table format");
        return Err(format::format_version_error(raw.format).with_path(path));
    }
    let table: Table =
        serde_json::from_value(raw.table).map_err(|err| corrupt(path, &err, &context))?;
    table.validate().map_err(|err| {
        Error::new(ErrorKind::Corrupt)
            .with_message(format!("invalid table: {err}"))
            .with_path(path)
            .with_source(err)
    })?;

    let record = Record::from_table(&table)?;
    tracing::debug!(path = %context, shape = %table.shape, "table loaded");
    Ok(record)
}

fn corrupt(path: &Path, err: &serde_json::Error, context: &str) -> Error {
    Error::new(ErrorKind::Corrupt)
        .with_message(format!("malformed table file: {err}"))
        .with_hint(parse::hint_for_error(err, context))
        .with_path(path)
}

struct FileLock<'a> {
    file: &'a File,
}

impl<'a> FileLock<'a> {
    fn exclusive(file: &'a File, path: &Path) -> Result<Self, Error> {
        FileExt::lock_exclusive(file)
            .map_err(|err| Error::new(lock_error_kind(&err)).with_path(path).with_source(err))?;
        Ok(Self { file })
    }

    fn shared(file: &'a File, path: &Path) -> Result<Self, Error> {
        FileExt::lock_shared(file)
            .map_err(|err| Error::new(lock_error_kind(&err)).with_path(path).with_source(err))?;
        Ok(Self { file })
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.file);
    }
}

fn lock_error_kind(err: &io::Error) -> ErrorKind {
    let errno = err.raw_os_error().unwrap_or_default();
    if errno == EACCES || errno == EPERM {
        return ErrorKind::Permission;
    }
    match err.kind() {
        io::ErrorKind::WouldBlock => ErrorKind::Busy,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}
