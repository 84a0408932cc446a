//! Instance-key policies

use crate::config::{AnalysisOptions, InstanceKeyMode};
use crate::features::context::domain::Context;
use crate::features::context::ports::InstanceKeyPolicy;
use crate::features::points_to::domain::{AllocationSite, ConstantKey, ConstantKind, InstanceKey};
use crate::features::program::ConstantValue;

fn constant_key(value: &ConstantValue, constant_specific: bool) -> Option<InstanceKey> {
    if !constant_specific {
        return ConstantKind::of(value).map(InstanceKey::ConstantKind);
    }
    match value {
        ConstantValue::String(s) => Some(InstanceKey::Constant(ConstantKey::String(s.clone()))),
        ConstantValue::Number(n) => Some(InstanceKey::Constant(ConstantKey::number(*n))),
        ConstantValue::Boolean(b) => Some(InstanceKey::Constant(ConstantKey::Boolean(*b))),
        ConstantValue::Null => None,
    }
}

/// One key per allocation site
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationSiteKeys {
    pub constant_specific: bool,
}

impl InstanceKeyPolicy for AllocationSiteKeys {
    fn allocation(&self, site: AllocationSite, _context: Context) -> InstanceKey {
        InstanceKey::Allocation {
            site,
            context: Context::Everywhere,
        }
    }

    fn constant(&self, value: &ConstantValue) -> Option<InstanceKey> {
        constant_key(value, self.constant_specific)
    }

    fn name(&self) -> &'static str {
        "allocation-sites"
    }
}

/// One key per (allocation site, context of the allocating node)
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAllocationKeys {
    pub constant_specific: bool,
}

impl InstanceKeyPolicy for ContextAllocationKeys {
    fn allocation(&self, site: AllocationSite, context: Context) -> InstanceKey {
        InstanceKey::Allocation { site, context }
    }

    fn constant(&self, value: &ConstantValue) -> Option<InstanceKey> {
        constant_key(value, self.constant_specific)
    }

    fn name(&self) -> &'static str {
        "context-allocations"
    }
}

/// Policy configured by `options`
pub fn instance_key_policy(options: &AnalysisOptions) -> Box<dyn InstanceKeyPolicy> {
    let constant_specific = options.use_constant_specific_keys;
    match options.instance_keys {
        InstanceKeyMode::AllocationSites => Box::new(AllocationSiteKeys { constant_specific }),
        InstanceKeyMode::ContextAllocations => {
            Box::new(ContextAllocationKeys { constant_specific })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::domain::ObjectKind;

    #[test]
    fn test_allocation_sites_ignore_context() {
        let policy = AllocationSiteKeys::default();
        let site = AllocationSite::new(0, 1, ObjectKind::Object);
        assert_eq!(
            policy.allocation(site, Context::call_string(0, 1)),
            policy.allocation(site, Context::call_string(0, 2))
        );
    }

    #[test]
    fn test_context_allocations_split_by_context() {
        let policy = ContextAllocationKeys::default();
        let site = AllocationSite::new(0, 1, ObjectKind::Object);
        assert_ne!(
            policy.allocation(site, Context::call_string(0, 1)),
            policy.allocation(site, Context::call_string(0, 2))
        );
    }

    #[test]
    fn test_constant_keys() {
        let merged = AllocationSiteKeys {
            constant_specific: false,
        };
        let specific = AllocationSiteKeys {
            constant_specific: true,
        };
        let a = ConstantValue::String("a".into());
        let b = ConstantValue::String("b".into());

        assert_eq!(merged.constant(&a), merged.constant(&b));
        assert_ne!(specific.constant(&a), specific.constant(&b));
        assert_eq!(merged.constant(&ConstantValue::Null), None);
        assert_eq!(specific.constant(&ConstantValue::Null), None);
    }

    #[test]
    fn test_policy_from_options() {
        let options = AnalysisOptions::default().instance_keys(InstanceKeyMode::ContextAllocations);
        assert_eq!(instance_key_policy(&options).name(), "context-allocations");
        assert_eq!(
            instance_key_policy(&AnalysisOptions::default()).name(),
            "allocation-sites"
        );
    }
}
