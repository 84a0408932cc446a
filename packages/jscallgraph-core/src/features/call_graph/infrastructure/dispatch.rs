//! Dispatch resolution
//!
//! Maps the callee set of a call site to what the builder must do for each member:
//! - function objects are invoked
//! - `Function.prototype.call` / `apply` either turn into reflective dispatch on the site's
//!   receiver (when rewriting is on) or are invoked as opaque builtins
//! - anything else (plain objects, constants) is not callable and is ignored
//!
//! Resolution is a pure function of the callee set, so re-resolving a site whose set did not
//! change yields exactly the same targets.

use crate::features::points_to::domain::{Builtin, DispatchKind, InstanceKey, PointsToSet};
use crate::features::points_to::PropagationSystem;
use crate::shared::{FunctionId, InstanceKeyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DispatchTarget {
    /// Invoke `function`, reached through function object `key`
    Function {
        function: FunctionId,
        key: InstanceKeyId,
    },
    /// Invoke a builtin body
    Builtin(Builtin),
    /// Re-dispatch the site on its receiver with the given mode
    Reflective(DispatchKind),
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchResolver {
    handle_call_apply: bool,
}

impl DispatchResolver {
    pub fn new(handle_call_apply: bool) -> Self {
        Self { handle_call_apply }
    }

    /// What invoking `callee` through a site dispatched with `dispatch` means
    pub fn classify(&self, callee: &InstanceKey, dispatch: DispatchKind) -> Option<DispatchTargetKind> {
        if let Some(function) = callee.function() {
            return Some(DispatchTargetKind::Function(function));
        }
        match callee.builtin() {
            Some(Builtin::Call) if self.rewrites(dispatch) => {
                Some(DispatchTargetKind::Reflective(DispatchKind::Call))
            }
            Some(Builtin::Apply) if self.rewrites(dispatch) => {
                Some(DispatchTargetKind::Reflective(DispatchKind::Apply))
            }
            Some(builtin) if builtin.is_callable() => Some(DispatchTargetKind::Builtin(builtin)),
            _ => None,
        }
    }

    /// Only sites not already rewritten are rewritten
    fn rewrites(&self, dispatch: DispatchKind) -> bool {
        self.handle_call_apply && dispatch == DispatchKind::Direct
    }

    /// Targets for every member of `callees`, in instance-key order without duplicates
    pub fn resolve(
        &self,
        system: &PropagationSystem,
        callees: &PointsToSet,
        dispatch: DispatchKind,
    ) -> Vec<DispatchTarget> {
        let mut targets = Vec::new();
        for id in callees.iter() {
            let Some(callee) = system.resolve_instance_key(id) else {
                continue;
            };
            let target = match self.classify(callee, dispatch) {
                Some(DispatchTargetKind::Function(function)) => {
                    DispatchTarget::Function { function, key: id }
                }
                Some(DispatchTargetKind::Builtin(builtin)) => DispatchTarget::Builtin(builtin),
                Some(DispatchTargetKind::Reflective(kind)) => DispatchTarget::Reflective(kind),
                None => continue,
            };
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

/// Classification of a single callee, independent of its instance-key id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTargetKind {
    Function(FunctionId),
    Builtin(Builtin),
    Reflective(DispatchKind),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReflectionMode;
    use crate::features::context::Context;
    use crate::features::points_to::domain::{AllocationSite, ConstantKind, ObjectKind};

    fn function_key(function: FunctionId) -> InstanceKey {
        InstanceKey::Allocation {
            site: AllocationSite::new(0, function, ObjectKind::Function(function)),
            context: Context::Everywhere,
        }
    }

    #[test]
    fn test_classify() {
        let resolver = DispatchResolver::new(true);
        assert_eq!(
            resolver.classify(&function_key(3), DispatchKind::Direct),
            Some(DispatchTargetKind::Function(3))
        );
        assert_eq!(
            resolver.classify(&InstanceKey::Builtin(Builtin::Call), DispatchKind::Direct),
            Some(DispatchTargetKind::Reflective(DispatchKind::Call))
        );
        assert_eq!(
            resolver.classify(&InstanceKey::Builtin(Builtin::Apply), DispatchKind::Call),
            Some(DispatchTargetKind::Builtin(Builtin::Apply))
        );
        assert_eq!(
            resolver.classify(&InstanceKey::ConstantKind(ConstantKind::String), DispatchKind::Direct),
            None
        );
        assert_eq!(
            resolver.classify(&InstanceKey::Builtin(Builtin::ObjectPrototype), DispatchKind::Direct),
            None
        );
    }

    #[test]
    fn test_call_apply_rewriting_can_be_disabled() {
        let resolver = DispatchResolver::new(false);
        assert_eq!(
            resolver.classify(&InstanceKey::Builtin(Builtin::Call), DispatchKind::Direct),
            Some(DispatchTargetKind::Builtin(Builtin::Call))
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut system = PropagationSystem::new(ReflectionMode::None);
        let f = system.instance_key(function_key(1));
        let g = system.instance_key(function_key(2));
        let call = system.instance_key(InstanceKey::Builtin(Builtin::Call));
        let callees: PointsToSet = [g, f, call].into_iter().collect();

        let resolver = DispatchResolver::new(true);
        let first = resolver.resolve(&system, &callees, DispatchKind::Direct);
        let second = resolver.resolve(&system, &callees, DispatchKind::Direct);
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                DispatchTarget::Function { function: 1, key: f },
                DispatchTarget::Function { function: 2, key: g },
                DispatchTarget::Reflective(DispatchKind::Call),
            ]
        );
    }
}
