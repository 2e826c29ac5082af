//! The public logger facade.
//!
//! A [`Logger`] owns the whole pipeline: clock, queue, sink registry, and
//! worker pool. Producers call [`Logger::log`] from any thread and return
//! as soon as the record is enqueued; workers deliver it to matching sinks
//! in the background. Dropping the logger runs the orderly shutdown:
//! reject new records, close the queue, join the workers (which drain
//! everything already accepted), then flush and release the sinks.

use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::backend::queue::RecordQueue;
use crate::backend::registry::{SinkHandle, SinkRegistry};
use crate::backend::sink::{FileSink, SinkEntry, SinkKind};
use crate::backend::worker::spawn_workers;
use crate::clock::{Clock, SystemClock};
use crate::filter::Filter;
use crate::levels::Severity;
use crate::record::{ComponentId, ComponentNamer, Record};
use crate::utils::error::{Error, Result};
use crate::utils::validation::validate_message;

/// Builder for a [`Logger`].
///
/// The defaults (one worker, unbounded queue, system clock) give total
/// FIFO dispatch matching production order. Raising `worker_count` trades
/// that ordering for parallel dispatch.
pub struct LoggerBuilder {
    worker_count: usize,
    queue_capacity: Option<usize>,
    clock: Arc<dyn Clock>,
    component_namer: Option<ComponentNamer>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        LoggerBuilder {
            worker_count: 1,
            queue_capacity: None,
            clock: Arc::new(SystemClock),
            component_namer: None,
        }
    }

    /// Number of worker threads. Clamped to at least 1.
    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Bound the queue. Producers then block in `log` while it is full;
    /// without a bound `log` never blocks.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Timestamp source for records. Tests supply a deterministic clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolver from component ids to display names for file-sink lines.
    pub fn component_namer<F>(mut self, namer: F) -> Self
    where
        F: Fn(ComponentId) -> Option<String> + Send + Sync + 'static,
    {
        self.component_namer = Some(Arc::new(namer));
        self
    }

    /// Start the workers and return the running logger.
    pub fn build(self) -> Logger {
        let queue = RecordQueue::new(self.queue_capacity);
        let registry = Arc::new(SinkRegistry::new());
        let workers = spawn_workers(self.worker_count, &queue, &registry);
        Logger {
            clock: self.clock,
            component_namer: self.component_namer,
            queue,
            registry,
            workers: Mutex::new(workers),
            shutting_down: AtomicBool::new(false),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Asynchronous multi-sink logger.
pub struct Logger {
    clock: Arc<dyn Clock>,
    component_namer: Option<ComponentNamer>,
    queue: RecordQueue,
    registry: Arc<SinkRegistry>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutting_down: AtomicBool,
}

impl Logger {
    /// A logger with default settings: one worker, unbounded queue,
    /// system clock.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Submit one record.
    ///
    /// The timestamp is taken here, on the producer thread, so timestamps
    /// reflect production order even when dispatch is concurrent. Returns
    /// once the record is enqueued; delivery happens on worker threads.
    pub fn log(
        &self,
        severity: Severity,
        component: ComponentId,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Result<()> {
        let message = message.into();
        validate_message(&message)?;
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(Error::ShuttingDown);
        }
        self.queue.push(Record {
            timestamp: self.clock.now(),
            severity,
            component,
            message,
            file: file.into(),
            line,
        })
    }

    /// Register a function sink. Every matching record is delivered to
    /// `callback` by reference, from a worker thread.
    ///
    /// `filter` accepts any of the filter-spec shapes; pass
    /// [`Filter::AcceptAll`] (or `None::<Severity>`) for no filtering.
    pub fn register_function_sink<F>(
        &self,
        callback: F,
        filter: impl Into<Filter>,
    ) -> Result<SinkHandle>
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.ensure_accepting()?;
        let filter = filter.into();
        Ok(self
            .registry
            .insert(|handle| SinkEntry::new(handle, filter, SinkKind::Callback(Box::new(callback)))))
    }

    /// Register a file sink on `path`, opened for append immediately.
    /// Existing contents are preserved. Fails with [`Error::FileOpen`] if
    /// the path cannot be opened.
    pub fn register_file_sink(
        &self,
        path: impl AsRef<Path>,
        filter: impl Into<Filter>,
    ) -> Result<SinkHandle> {
        self.ensure_accepting()?;
        let sink = FileSink::open(path.as_ref(), self.component_namer.clone())?;
        let filter = filter.into();
        Ok(self
            .registry
            .insert(|handle| SinkEntry::new(handle, filter, SinkKind::File(sink))))
    }

    /// Remove a sink. After this returns, no record produced later than
    /// this call reaches the sink; a record already mid-dispatch
    /// completes. Fails with [`Error::HandleNotFound`] for an unknown or
    /// already-unregistered handle.
    pub fn unregister_sink(&self, handle: SinkHandle) -> Result<()> {
        self.registry.remove(handle)
    }

    /// Orderly shutdown: reject new records, close the queue, join the
    /// workers (draining every record already accepted), then flush and
    /// drop the sinks. Idempotent; also runs on drop.
    ///
    /// Must not be called from inside a sink callback: a worker cannot
    /// join itself.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
        self.queue.close();
        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            let _ = worker.join();
        }
        for entry in self.registry.drain() {
            entry.flush();
        }
    }

    fn ensure_accepting(&self) -> Result<()> {
        if self.shutting_down.load(Ordering::Acquire) {
            Err(Error::ShuttingDown)
        } else {
            Ok(())
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}
