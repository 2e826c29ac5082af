//! The producer/consumer record queue.
//!
//! A thin close-aware wrapper over a crossbeam channel. Producers push from
//! any thread; workers each hold a cloned receiver and block on `recv`.
//! Closing the queue drops the sole sender, which is the drain signal: the
//! channel keeps yielding buffered records to receivers and only then
//! reports disconnection, so every record accepted before the close is
//! still delivered.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use parking_lot::RwLock;

use crate::record::Record;
use crate::utils::error::{Error, Result};

pub struct RecordQueue {
    sender: RwLock<Option<Sender<Record>>>,
    receiver: Receiver<Record>,
}

impl RecordQueue {
    /// Open a new queue. `capacity` of `None` means unbounded; with a
    /// bound, `push` blocks while the channel is full.
    pub fn new(capacity: Option<usize>) -> Self {
        let (tx, rx) = match capacity {
            Some(n) => bounded(n),
            None => unbounded(),
        };
        RecordQueue {
            sender: RwLock::new(Some(tx)),
            receiver: rx,
        }
    }

    /// Enqueue one record, rejecting it once the queue has been closed.
    pub fn push(&self, record: Record) -> Result<()> {
        match self.sender.read().as_ref() {
            Some(tx) => tx.send(record).map_err(|_| Error::ShuttingDown),
            None => Err(Error::ShuttingDown),
        }
    }

    /// A receiver for one worker. Receivers share the channel FIFO; each
    /// buffered record is delivered to exactly one of them.
    pub fn subscribe(&self) -> Receiver<Record> {
        self.receiver.clone()
    }

    /// Close the queue. Idempotent. Blocked receivers wake once the
    /// buffer is drained.
    pub fn close(&self) {
        self.sender.write().take();
    }
}
