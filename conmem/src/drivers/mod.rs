//! Output drivers built on the BIOS layer

pub mod console;
