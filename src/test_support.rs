//! Logger for tests that count emitted records.

use log::{Log, Metadata, Record};
use std::cell::Cell;
use std::sync::Once;

thread_local! {
    // Per thread so parallel tests do not see each other's records
    static RECORDS: Cell<usize> = const { Cell::new(0) };
}

struct CountingLogger;

impl Log for CountingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, _: &Record) {
        RECORDS.with(|n| n.set(n.get() + 1));
    }

    fn flush(&self) {}
}

static LOGGER: CountingLogger = CountingLogger;
static INIT: Once = Once::new();

/// Install the counting logger (once per test binary) and reset this thread's count
pub fn start_counting() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|n| n.set(0));
}

/// Records logged on this thread since [`start_counting`]
pub fn records() -> usize {
    RECORDS.with(Cell::get)
}
