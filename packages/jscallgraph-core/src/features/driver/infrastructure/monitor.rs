//! Wall-clock and cancel-flag monitor

use crate::features::call_graph::ports::{CancelReason, ProgressMonitor};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Handle for canceling a running analysis from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the analysis to stop at its next checkpoint
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clear the flag so the handle can be reused for another run
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Monitor enforcing a deadline and honoring a [`CancelHandle`]
///
/// The clock starts when the monitor is created.
#[derive(Debug)]
pub struct TimeoutMonitor {
    started: Instant,
    limit: Option<Duration>,
    cancel: CancelHandle,
    total: AtomicUsize,
    worked: AtomicUsize,
}

impl TimeoutMonitor {
    pub fn new(limit: Option<Duration>, cancel: CancelHandle) -> Self {
        Self {
            started: Instant::now(),
            limit,
            cancel,
            total: AtomicUsize::new(0),
            worked: AtomicUsize::new(0),
        }
    }

    /// Monitor without a deadline
    pub fn unbounded(cancel: CancelHandle) -> Self {
        Self::new(None, cancel)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Work units reported so far
    pub fn work_done(&self) -> usize {
        self.worked.load(Ordering::Relaxed)
    }
}

impl ProgressMonitor for TimeoutMonitor {
    fn begin_task(&self, name: &str, total_work: usize) {
        self.total.store(total_work, Ordering::Relaxed);
        debug!("{}: {} units of work known up front", name, total_work);
    }

    fn worked(&self, units: usize) {
        self.worked.fetch_add(units, Ordering::Relaxed);
    }

    fn cancel_reason(&self) -> Option<CancelReason> {
        if self.cancel.is_canceled() {
            return Some(CancelReason::Requested);
        }
        let limit = self.limit?;
        let elapsed = self.started.elapsed();
        (elapsed > limit).then_some(CancelReason::Timeout { elapsed, limit })
    }

    fn done(&self) {
        debug!(
            "Monitor done after {:?}, {} of {} units worked",
            self.started.elapsed(),
            self.worked.load(Ordering::Relaxed),
            self.total.load(Ordering::Relaxed)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cancel_from_another_thread() {
        let handle = CancelHandle::new();
        let monitor = TimeoutMonitor::unbounded(handle.clone());
        assert_eq!(monitor.cancel_reason(), None);

        let remote = handle.clone();
        thread::spawn(move || remote.cancel()).join().unwrap();
        assert_eq!(monitor.cancel_reason(), Some(CancelReason::Requested));

        handle.reset();
        assert_eq!(monitor.cancel_reason(), None);
    }

    #[test]
    fn test_deadline() {
        let monitor = TimeoutMonitor::new(Some(Duration::ZERO), CancelHandle::new());
        thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            monitor.cancel_reason(),
            Some(CancelReason::Timeout { .. })
        ));

        let relaxed = TimeoutMonitor::new(Some(Duration::from_secs(3600)), CancelHandle::new());
        assert_eq!(relaxed.cancel_reason(), None);
    }

    #[test]
    fn test_counts_work() {
        let monitor = TimeoutMonitor::unbounded(CancelHandle::new());
        monitor.begin_task("test", 10);
        monitor.worked(3);
        monitor.worked(4);
        assert_eq!(monitor.work_done(), 7);
    }
}
