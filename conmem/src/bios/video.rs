//! Character output through BIOS video services.
//!
//! INT 0x10/AH=0Eh writes one character at the cursor and advances it, which
//! is all a boot-time report needs. The console wraps that service behind the
//! driver's sink seam and `core::fmt::Write`.

use crate::bios::realmode::{RealModeContext, RealModeExecutor, Result};
use crate::report::OutputSink;
use core::fmt;

/// INT 0x10 - Video Services
pub mod int10 {
    use super::*;

    const INT10_VIDEO: u8 = 0x10;
    const TELETYPE_OUTPUT: u8 = 0x0E;

    /// Foreground color used when the screen is in a graphics mode; text
    /// modes ignore it.
    const GRAPHICS_COLOR: u8 = 0x07;

    /// Write one character at the cursor of `page` and advance it.
    pub fn write_teletype(executor: &RealModeExecutor, ch: u8, page: u8) -> Result<()> {
        let mut ctx = RealModeContext::new();
        ctx.set_ah(TELETYPE_OUTPUT);
        ctx.set_al(ch);
        ctx.set_bh(page);
        ctx.set_bl(GRAPHICS_COLOR);
        // SAFETY: teletype output reads the register image and touches the
        // display only.
        unsafe { executor.execute_int(INT10_VIDEO, &mut ctx) }
    }
}

/// Output sink backed by BIOS teletype output.
pub struct TeletypeConsole<'a> {
    executor: &'a RealModeExecutor,
    page: u8,
}

impl<'a> TeletypeConsole<'a> {
    pub const DEFAULT_PAGE: u8 = 0;

    pub fn new(executor: &'a RealModeExecutor) -> Self {
        Self::with_page(executor, Self::DEFAULT_PAGE)
    }

    pub fn with_page(executor: &'a RealModeExecutor, page: u8) -> Self {
        Self { executor, page }
    }

    /// Write one byte, expanding `\n` to CRLF since teletype output moves the
    /// cursor exactly as told.
    pub fn write_byte(&mut self, ch: u8) {
        if ch == b'\n' {
            self.put(b'\r');
        }
        self.put(ch);
    }

    fn put(&mut self, ch: u8) {
        // Dispatch errors are dropped: the sink contract is total, and the
        // logger writes back through this console.
        let _ = int10::write_teletype(self.executor, ch, self.page);
    }
}

impl OutputSink for TeletypeConsole<'_> {
    fn emit(&mut self, text: &str) {
        for ch in text.bytes() {
            self.write_byte(ch);
        }
    }
}

impl fmt::Write for TeletypeConsole<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.emit(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    fn ready_executor() -> RealModeExecutor {
        let mut executor = RealModeExecutor::new();
        executor.init().expect("init is infallible");
        executor
    }

    #[test]
    fn teletype_call_is_accepted_by_simulation() {
        let executor = ready_executor();
        int10::write_teletype(&executor, b'A', 0).expect("teletype is simulated");
    }

    #[test]
    fn console_emits_full_strings() {
        let executor = ready_executor();
        let mut console = TeletypeConsole::new(&executor);
        console.emit("Conventional Memory: 640");
    }

    #[test]
    fn console_implements_fmt_write() {
        let executor = ready_executor();
        let mut console = TeletypeConsole::new(&executor);
        assert!(write!(console, "{} KB", 640).is_ok());
    }

    #[test]
    fn console_survives_uninitialized_executor() {
        // Sink totality: dispatch errors must not escape the console.
        let executor = RealModeExecutor::new();
        let mut console = TeletypeConsole::with_page(&executor, 1);
        console.emit("line one\nline two");
    }
}
