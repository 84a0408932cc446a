//! Driver-side reporting types

pub mod stats;

pub use stats::CallGraphStats;
