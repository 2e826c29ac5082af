// End-to-end tests for the logging pipeline. Leaf modules carry their own
// unit tests; these exercise the public surface the way an embedder would.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::record::Record;


/// Shared list a collector callback appends every received record to.
pub(crate) type Collected = Arc<Mutex<Vec<Record>>>;

pub(crate) fn collector() -> Collected {
    Arc::new(Mutex::new(Vec::new()))
}

/// A callback that clones each record into `list`.
pub(crate) fn push_to(list: &Collected) -> impl Fn(&Record) + Send + Sync + 'static {
    let list = Arc::clone(list);
    move |record| list.lock().push(record.clone())
}

pub(crate) fn messages(list: &Collected) -> Vec<String> {
    list.lock().iter().map(|r| r.message.clone()).collect()
}

/// Poll `cond` until it holds, panicking after five seconds. For asserting
/// on dispatch that happens on worker threads without shutting down first.
pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(
            Instant::now() < deadline,
            "condition not reached within 5s"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}
