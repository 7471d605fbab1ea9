//! Command-line front end for jaki-core
//!
//! The command handlers return their output as strings so the binary only
//! parses arguments and prints.

pub mod commands;
pub mod playback;

pub use commands::{DisplayConfig, PerformanceConfig};
pub use playback::{EventPrinter, OutputFormat};
