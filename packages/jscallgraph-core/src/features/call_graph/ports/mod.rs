//! Ports for call-graph construction
//!
//! The builder reports progress to, and takes cancellation from, a [`ProgressMonitor`]. The
//! monitor is consulted once per worklist iteration, so a cancellation takes effect at the
//! next checkpoint and leaves a consistent partial graph behind.

use std::fmt;
use std::time::Duration;

/// Why a monitor asks the builder to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Wall-clock budget exceeded
    Timeout { elapsed: Duration, limit: Duration },
    /// Cancel flag set by another party
    Requested,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Timeout { elapsed, limit } => write!(
                f,
                "timed out after {}ms (limit {}ms)",
                elapsed.as_millis(),
                limit.as_millis()
            ),
            CancelReason::Requested => f.write_str("canceled"),
        }
    }
}

/// Progress and cancellation sink
///
/// All methods take `&self`; implementations that count work use interior mutability, which
/// lets a cancel handle share the monitor with another thread.
pub trait ProgressMonitor {
    fn begin_task(&self, _name: &str, _total_work: usize) {}

    fn worked(&self, _units: usize) {}

    /// `Some` once the run should stop
    fn cancel_reason(&self) -> Option<CancelReason>;

    fn done(&self) {}
}

/// Monitor that never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {
    fn cancel_reason(&self) -> Option<CancelReason> {
        None
    }
}
