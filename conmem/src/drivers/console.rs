//! Global boot console and logging.
//!
//! The report itself writes through a sink handed to the driver; the global
//! console exists for boot messages, the panic handler, and the `log` facade,
//! which all need output without threading a writer through every call site.

use crate::bios::video::TeletypeConsole;
use core::fmt::{self, Write};
use log::{LevelFilter, Metadata, Record};
use spin::Mutex;

static CONSOLE: Mutex<Option<TeletypeConsole<'static>>> = Mutex::new(None);

/// Route `print!`/`println!` and the logger to `console`.
pub fn install(console: TeletypeConsole<'static>) {
    *CONSOLE.lock() = Some(console);
}

/// Write formatted text to the installed console; a no-op before install.
///
/// Re-entrant prints are dropped, not blocked on: the executor logs its own
/// dispatches, so a verbose logger can arrive here while the console is
/// already mid-write.
pub fn write_fmt(args: fmt::Arguments<'_>) {
    if let Some(mut guard) = CONSOLE.try_lock() {
        if let Some(console) = guard.as_mut() {
            let _ = console.write_fmt(args);
        }
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::drivers::console::write_fmt(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {{
        $crate::drivers::console::write_fmt(format_args!($($arg)*));
        $crate::print!("\n");
    }};
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Register the console-backed logger. The first registration in the process
/// wins; later calls leave it untouched.
pub fn init_logging(max_level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level);
    }
}
