//! # Context Selector & Instance-Key Policy
//!
//! Pluggable strategies deciding how precisely the analysis distinguishes calls and objects:
//! - **Contexts**: `Everywhere` or a length-1 call string
//! - **Selectors**: 0-CFA, 0-1-CFA and 1-CFA
//! - **Instance keys**: allocation site alone, or site plus the allocating node's context;
//!   constants either per value or per kind

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{CallString, Context};
pub use infrastructure::{
    instance_key_policy, selector_for, AllocationSiteKeys, ContextAllocationKeys,
    OneCfaSelector, ZeroCfaSelector, ZeroOneCfaSelector,
};
pub use ports::{ContextRequest, ContextSelector, InstanceKeyPolicy};
