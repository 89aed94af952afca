//! JSON output layouts and atomic JSON file writes.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use thiserror::Error;

use leaderboard_fs::PersistError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize `{path}`: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How a JSON document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Two-space indentation and `"key":value` members: the layout the leaderboard's
    /// data files have always used.
    Records,
    /// Two-space indentation and `"key": value` members.
    Pretty,
}

/// Pretty printer that emits `"key":value` instead of `"key": value`.
pub struct RecordFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl Default for RecordFormatter<'_> {
    fn default() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for RecordFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

pub fn to_writer<W, T>(writer: W, value: &T, layout: Layout) -> serde_json::Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    match layout {
        Layout::Records => {
            let mut ser = serde_json::Serializer::with_formatter(writer, RecordFormatter::default());
            value.serialize(&mut ser)
        }
        Layout::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"  ");
            let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
            value.serialize(&mut ser)
        }
    }
}

pub fn to_string<T: ?Sized + Serialize>(value: &T, layout: Layout) -> serde_json::Result<String> {
    let mut out = Vec::new();
    to_writer(&mut out, value, layout)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Serialize `value` into `path`, atomically replacing any existing file.
pub fn write_file<T: ?Sized + Serialize>(
    path: &Path,
    value: &T,
    layout: Layout,
) -> Result<(), ExportError> {
    leaderboard_fs::replace_with(path, |writer| to_writer(writer, value, layout)).map_err(
        |err| match err {
            PersistError::Io { path, source } => ExportError::Write { path, source },
            PersistError::Writer(source) => ExportError::Serialize {
                path: path.to_path_buf(),
                source,
            },
        },
    )
}
