//! # Driver / Termination Monitor
//!
//! Runs one analysis end to end and reports on it:
//! - **Monitor**: wall-clock deadline plus a cancel flag settable from another thread
//! - **Runner**: options → loader → builder → statistics
//! - **Output**: tab-separated edge listing and Graphviz export

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{AnalysisDriver, DriverReport};
pub use domain::CallGraphStats;
pub use infrastructure::{
    write_dot, CancelHandle, EdgeListWriter, OutputOptions, TimeoutMonitor,
};
