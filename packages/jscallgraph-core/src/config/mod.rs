//! Configuration system
//!
//! - [`AnalysisOptions`]: the immutable snapshot consumed by the engine
//! - [`ConfigFileV1`]: versioned YAML schema for the same options
//!
//! # Examples
//!
//! ```rust,ignore
//! use jscallgraph_core::config::{AnalysisOptions, CallGraphAlgorithm};
//!
//! let options = AnalysisOptions::new()
//!     .algorithm(CallGraphAlgorithm::OneCfa)
//!     .max_nodes(Some(10_000));
//! options.validate()?;
//! ```

pub mod error;
pub mod io;
pub mod options;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use options::{
    AnalysisOptions, CallGraphAlgorithm, InstanceKeyMode, ReflectionMode, DEFAULT_TIMEOUT_MS,
};
