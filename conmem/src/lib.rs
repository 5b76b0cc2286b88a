//! Conventional memory report for x86 real mode.
//!
//! Freestanding, no heap: probes the conventional memory size through BIOS
//! INT 0x12, renders it as decimal digits in a bounded stack buffer, and
//! prints it after a fixed label through BIOS teletype output. Off-target
//! builds run against a simulated interrupt dispatch, which is how the test
//! suite exercises the whole path.

#![no_std]
#![allow(unsafe_op_in_unsafe_fn)]

/// BIOS layer - real mode INT dispatch and the two services this program uses
pub mod bios;

/// Output drivers - global console and logging
pub mod drivers;

/// Decimal rendering of the probed magnitude
pub mod numeral;

/// Driver - probe, format, emit
pub mod report;

pub use bios::realmode::{RealModeContext, RealModeExecutor};
pub use numeral::DigitBuffer;
pub use report::{MemoryProbe, OutputSink, MEMORY_LABEL};
