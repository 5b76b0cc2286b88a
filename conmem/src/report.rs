//! The memory report driver.
//!
//! One linear pass: query the probe, emit the label, render the magnitude,
//! emit the digits. Neither collaborator reports failure, so there are no
//! error paths at this level; the zero/non-zero branch lives inside the
//! formatter.

use crate::numeral::DigitBuffer;

/// Label emitted ahead of the digit sequence. No trailing newline follows the
/// digits.
pub const MEMORY_LABEL: &str = "Conventional Memory: ";

/// Source of the conventional memory magnitude, in KB.
///
/// The underlying BIOS service has no failure indication, so neither does
/// this seam.
pub trait MemoryProbe {
    fn conventional_kb(&mut self) -> u16;
}

/// Consumer of report text. Renders the bytes in order; assumed to always
/// succeed.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Run the report once and return the process status, always zero.
pub fn run<P, S>(probe: &mut P, sink: &mut S) -> i32
where
    P: MemoryProbe,
    S: OutputSink,
{
    let magnitude = probe.conventional_kb();
    log::debug!("conventional memory probe returned {} KB", magnitude);

    let mut digits = DigitBuffer::new();
    sink.emit(MEMORY_LABEL);
    sink.emit(digits.format(magnitude));
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(u16);

    impl MemoryProbe for FixedProbe {
        fn conventional_kb(&mut self) -> u16 {
            self.0
        }
    }

    struct CountingSink {
        emits: usize,
    }

    impl OutputSink for CountingSink {
        fn emit(&mut self, _text: &str) {
            self.emits += 1;
        }
    }

    #[test]
    fn run_emits_label_then_digits_and_returns_zero() {
        let mut probe = FixedProbe(640);
        let mut sink = CountingSink { emits: 0 };

        assert_eq!(run(&mut probe, &mut sink), 0);
        assert_eq!(sink.emits, 2);
    }

    #[test]
    fn label_matches_report_text() {
        assert_eq!(MEMORY_LABEL, "Conventional Memory: ");
    }
}
