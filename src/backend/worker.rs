//! The worker pool draining the record queue.
//!
//! Each worker blocks on the shared channel, takes a registry snapshot per
//! record, and dispatches to every matching sink. The snapshot is cloned
//! and the registry lock released before any sink runs, so a callback that
//! re-enters the logger (to log, register, or unregister) cannot deadlock.
//! Workers exit when the channel disconnects, after the buffer has
//! drained.

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::backend::registry::{SinkRegistry, Snapshot};
use crate::record::Record;

pub fn spawn_workers(
    count: usize,
    queue: &crate::backend::queue::RecordQueue,
    registry: &Arc<SinkRegistry>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|index| {
            let receiver = queue.subscribe();
            let registry = Arc::clone(registry);
            thread::Builder::new()
                .name(format!("fanlog-worker-{index}"))
                .spawn(move || run_worker(receiver, registry))
                .expect("failed to spawn log worker thread")
        })
        .collect()
}

fn run_worker(receiver: Receiver<Record>, registry: Arc<SinkRegistry>) {
    let mut snapshot = Snapshot::new();
    while let Ok(record) = receiver.recv() {
        registry.snapshot(&mut snapshot);
        for entry in &snapshot {
            if entry.filter().matches(&record) {
                entry.dispatch(&record);
            }
        }
        // Drop sink references before blocking on the next record, so an
        // unregistered sink is not kept alive by an idle worker.
        snapshot.clear();
    }
}
