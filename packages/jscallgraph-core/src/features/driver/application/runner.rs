//! Analysis driver
//!
//! One run: validate options, load the program, build the call graph under the configured
//! timeout and cancel flag, collect statistics.

use crate::config::AnalysisOptions;
use crate::errors::Result;
use crate::features::call_graph::{AnalysisResult, CallGraphBuilder};
use crate::features::driver::domain::CallGraphStats;
use crate::features::driver::infrastructure::{CancelHandle, TimeoutMonitor};
use crate::features::program::{Program, SourceLoader};
use tracing::info;

/// Result of a driver run together with its statistics
#[derive(Debug, Clone)]
pub struct DriverReport {
    pub program: Program,
    pub result: AnalysisResult,
    pub stats: CallGraphStats,
}

#[derive(Debug, Clone)]
pub struct AnalysisDriver {
    options: AnalysisOptions,
    cancel: CancelHandle,
}

impl AnalysisDriver {
    /// Driver for `options`; invalid options are rejected here, before any input is read
    pub fn new(options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            cancel: CancelHandle::new(),
        })
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Handle that stops the current (or next) run at its next checkpoint
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Build the call graph of an already loaded program
    pub fn analyze(&self, program: &Program) -> Result<AnalysisResult> {
        let builder = CallGraphBuilder::new(program, self.options.clone())?;
        let monitor = TimeoutMonitor::new(self.options.timeout(), self.cancel.clone());
        Ok(builder.build(&monitor))
    }

    /// Load through `loader`, analyze, and collect statistics
    pub fn run(&self, loader: &dyn SourceLoader) -> Result<DriverReport> {
        info!(
            "Analyzing {} with {} (reflection={}, timeout={:?})",
            loader.describe(),
            self.options.algorithm,
            self.options.reflection,
            self.options.timeout()
        );
        let program = loader.load()?;
        let result = self.analyze(&program)?;
        let stats = CallGraphStats::collect(&result, &program);
        Ok(DriverReport {
            program,
            result,
            stats,
        })
    }
}
