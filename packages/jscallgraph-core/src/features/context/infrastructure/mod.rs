//! Shipped selectors and instance-key policies

pub mod instance_keys;
pub mod selectors;

pub use instance_keys::{instance_key_policy, AllocationSiteKeys, ContextAllocationKeys};
pub use selectors::{selector_for, OneCfaSelector, ZeroCfaSelector, ZeroOneCfaSelector};
