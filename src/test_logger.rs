//! Log capture for tests asserting on emitted messages

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

struct CapturedRecord {
    thread: ThreadId,
    level: Level,
    target: String,
    message: String,
}

static RECORDS: Mutex<Vec<CapturedRecord>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();
static LOGGER: CaptureLogger = CaptureLogger;

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push(CapturedRecord {
                thread: thread::current().id(),
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

/// Install the capturing logger; safe to call from every test
pub(crate) fn init() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Messages this crate logged on the calling thread.
///
/// Each test runs on its own thread, and `#[tokio::test]` polls the test body
/// on that thread, so this excludes output from concurrently running tests.
pub(crate) fn messages() -> Vec<(Level, String)> {
    let current = thread::current().id();
    RECORDS
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|r| r.thread == current && r.target.starts_with(env!("CARGO_CRATE_NAME")))
                .map(|r| (r.level, r.message.clone()))
                .collect()
        })
        .unwrap_or_default()
}
