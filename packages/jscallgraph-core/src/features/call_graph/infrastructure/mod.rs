//! Dispatch resolution

pub mod dispatch;

pub use dispatch::{DispatchResolver, DispatchTarget, DispatchTargetKind};
