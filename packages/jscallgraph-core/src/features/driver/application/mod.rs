pub mod runner;

pub use runner::{AnalysisDriver, DriverReport};
