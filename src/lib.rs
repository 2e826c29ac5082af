//! # Fanlog - Asynchronous Multi-Sink Logging Core
//!
//! Fanlog is an embeddable logging core that decouples log production from
//! delivery. Producers tag each record with a severity and a caller-defined
//! component id and return as soon as the record is enqueued; a worker pool
//! drains the queue and fans records out to a dynamic set of sinks (user
//! callbacks and append-only log files), applying a per-sink filter on
//! severity and component.
//!
//! ## Architecture
//!
//! The crate is organized into focused modules:
//! - `logger`: the public facade, worker lifecycle, and shutdown protocol
//! - `backend`: queue, sink registry, sink variants, and the worker loop
//! - `filter`: per-sink filter variants and their construction ladder
//! - `levels`, `record`, `clock`: the data model and timestamp seam
//! - `utils`: error type and argument validation
//!
//! ## Guarantees
//!
//! - `log` is non-blocking unless the queue was built with a bound
//! - with the default single worker, sinks observe records in production order
//! - a panicking callback or failing file write never affects other sinks,
//!   later records, or producers
//! - graceful shutdown drains every record accepted before it began
//!
//! ## Example
//!
//! ```no_run
//! use fanlog::{Logger, Severity};
//!
//! const NETWORK: u32 = 1;
//!
//! let logger = Logger::new();
//! logger.register_function_sink(
//!     |record| eprintln!("{}: {}", record.severity, record.message),
//!     Severity::Warning,
//! )?;
//! logger.register_file_sink("app.log", fanlog::Filter::AcceptAll)?;
//! logger.log(Severity::Error, NETWORK, "connection lost", file!(), line!())?;
//! # Ok::<(), fanlog::Error>(())
//! ```

mod backend;
mod clock;
mod filter;
mod levels;
mod logger;
mod record;
mod utils;

#[cfg(test)]
mod tests;

pub use backend::registry::SinkHandle;
pub use clock::{Clock, ManualClock, SystemClock};
pub use filter::Filter;
pub use levels::Severity;
pub use logger::{Logger, LoggerBuilder};
pub use record::{ComponentId, ComponentNamer, Record};
pub use utils::error::{Error, Result};
