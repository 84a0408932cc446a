//! Monitors and writers

pub mod monitor;
pub mod output;

pub use monitor::{CancelHandle, TimeoutMonitor};
pub use output::{write_dot, EdgeListWriter, OutputOptions};
