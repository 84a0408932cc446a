//! Propagation engine

pub mod propagation;
pub mod worklist;

pub use propagation::{PropagationStats, PropagationSystem};
pub use worklist::Worklist;
