//! Sink variants and the dispatch fault wall.
//!
//! A sink is either a user callback or an append-only log file. Both are
//! invoked from worker threads behind a catch-all boundary: a panicking
//! callback or a failed write is reported on the `tracing` facade and
//! otherwise swallowed, so one misbehaving sink can never poison its
//! siblings or the pipeline. Diagnostics are never routed back through the
//! logger that owns the sink.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::backend::registry::SinkHandle;
use crate::filter::Filter;
use crate::record::{ComponentId, ComponentNamer, Record};
use crate::utils::error::{Error, Result};

/// User-supplied callback invoked with each matching record.
///
/// May be called concurrently from multiple workers (with different
/// records); internal thread safety is the callback's own business.
pub type CallbackFn = Box<dyn Fn(&Record) + Send + Sync>;

pub enum SinkKind {
    Callback(CallbackFn),
    File(FileSink),
}

/// One registered sink: its handle, its filter, and its destination.
pub struct SinkEntry {
    handle: SinkHandle,
    filter: Filter,
    kind: SinkKind,
}

impl SinkEntry {
    pub fn new(handle: SinkHandle, filter: Filter, kind: SinkKind) -> Self {
        SinkEntry {
            handle,
            filter,
            kind,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Deliver one record, absorbing any fault.
    pub fn dispatch(&self, record: &Record) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match &self.kind {
            SinkKind::Callback(callback) => {
                callback(record);
                Ok(())
            }
            SinkKind::File(file) => file.append(record),
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(sink = %self.handle, error = %err, "log file write failed");
            }
            Err(_) => {
                warn!(sink = %self.handle, "sink panicked while handling a record");
            }
        }
    }

    /// Flush buffered output. No-op for callback sinks.
    pub fn flush(&self) {
        if let SinkKind::File(file) = &self.kind {
            file.flush();
        }
    }
}

/// Append-only file destination.
///
/// The handle is opened at registration and lives until the logger shuts
/// down. A mutex around the writer keeps lines atomic when several workers
/// dispatch to the same sink.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    namer: Option<ComponentNamer>,
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("namer", &self.namer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl FileSink {
    /// Open `path` for append, creating it if absent. Existing contents
    /// are preserved; no header is written.
    pub fn open(path: &Path, namer: Option<ComponentNamer>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(FileSink {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
            namer,
        })
    }

    fn component_repr(&self, component: ComponentId) -> String {
        self.namer
            .as_ref()
            .and_then(|namer| namer(component))
            .unwrap_or_else(|| component.to_string())
    }

    /// Canonical one-line form:
    /// `[<timestamp>] [<SEVERITY>] <component>: <message> (<file>:<line>)`
    pub fn format_line(&self, record: &Record) -> String {
        format!(
            "[{}] [{}] {}: {} ({}:{})\n",
            record.timestamp.to_rfc3339(),
            record.severity.as_str(),
            self.component_repr(record.component),
            record.message,
            record.file,
            record.line,
        )
    }

    fn append(&self, record: &Record) -> io::Result<()> {
        let line = self.format_line(record);
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }

    fn flush(&self) {
        if let Err(err) = self.writer.lock().flush() {
            warn!(path = %self.path.display(), error = %err, "log file flush failed");
        }
    }
}
