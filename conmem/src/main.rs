//! Freestanding entry for the memory report.
//!
//! The stage-one boot stub loads this image and calls [`boot_main`] with the
//! machine still in real mode. There is nowhere to return a status to, so the
//! driver's status is logged and the processor halted.

#![no_std]
#![no_main]

use conmem::bios::memory::Int12Probe;
use conmem::bios::realmode::RealModeExecutor;
use conmem::bios::video::TeletypeConsole;
use conmem::drivers::console;
use conmem::{println, report};
use core::panic::PanicInfo;
use log::LevelFilter;
use spin::Once;

static EXECUTOR: Once<RealModeExecutor> = Once::new();

/// Entry point, invoked once by the stage-one stub.
#[unsafe(no_mangle)]
pub extern "C" fn boot_main() -> ! {
    let executor = EXECUTOR.call_once(|| {
        let mut executor = RealModeExecutor::new();
        if executor.init().is_err() {
            // No console exists yet, so there is nothing to report through.
            halt();
        }
        executor
    });

    console::install(TeletypeConsole::new(executor));
    console::init_logging(max_log_level());

    let mut probe = Int12Probe::new(executor);
    cross_check_bda(&mut probe);

    let mut sink = TeletypeConsole::new(executor);
    let status = report::run(&mut probe, &mut sink);

    log::debug!("memory report completed with status {}", status);
    halt();
}

/// Compare the interrupt result against the BIOS Data Area before the report
/// runs. Diagnostic only; the report always uses the interrupt result.
#[cfg(target_arch = "x86")]
fn cross_check_bda(probe: &mut Int12Probe<'_>) {
    use conmem::bios::memory::{self, BiosDataArea};
    use conmem::report::MemoryProbe;

    let probed_kb = probe.conventional_kb();
    // SAFETY: boot_main runs in the real-mode layout where POST has
    // populated the BIOS Data Area and low memory is identity-mapped.
    let bda = unsafe { BiosDataArea::read() };
    memory::verify_against_bda(&bda, probed_kb);
}

#[cfg(not(target_arch = "x86"))]
fn cross_check_bda(_probe: &mut Int12Probe<'_>) {}

fn max_log_level() -> LevelFilter {
    if cfg!(feature = "verbose_logging") {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

fn halt() -> ! {
    loop {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        // SAFETY: halting with interrupts as the stub left them.
        unsafe {
            core::arch::asm!("hlt", options(nomem, nostack, preserves_flags));
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        core::hint::spin_loop();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    println!();
    println!("!! PANIC !!");
    if let Some(location) = info.location() {
        println!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
    println!("Message: {}", info.message());
    halt();
}
