//! Context selectors
//!
//! | Selector   | Ordinary call | `new` | `call`/`apply` |
//! |------------|---------------|-------|----------------|
//! | 0-CFA      | Everywhere    | Everywhere | Everywhere |
//! | 0-1-CFA    | Everywhere    | caller site | caller site |
//! | 1-CFA      | caller site   | caller site | caller site |

use crate::config::CallGraphAlgorithm;
use crate::features::context::domain::Context;
use crate::features::context::ports::{ContextRequest, ContextSelector};
use crate::features::program::CallKind;

/// Length-1 call string of the request's site, or `Everywhere` from synthetic callers
fn caller_site(request: &ContextRequest<'_>) -> Context {
    match request.caller.method.function() {
        Some(caller) => Context::call_string(caller, request.site.pc),
        None => Context::Everywhere,
    }
}

/// Context-insensitive
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCfaSelector;

impl ContextSelector for ZeroCfaSelector {
    fn select(&self, _request: &ContextRequest<'_>) -> Context {
        Context::Everywhere
    }

    fn name(&self) -> &'static str {
        "0-CFA"
    }
}

/// Call-site sensitivity for constructors and reflective dispatch only
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroOneCfaSelector;

impl ContextSelector for ZeroOneCfaSelector {
    fn select(&self, request: &ContextRequest<'_>) -> Context {
        if request.site.kind == CallKind::Construct || request.dispatch.is_reflective() {
            caller_site(request)
        } else {
            Context::Everywhere
        }
    }

    fn name(&self) -> &'static str {
        "0-1-CFA"
    }
}

/// Immediate caller site for every call
#[derive(Debug, Clone, Copy, Default)]
pub struct OneCfaSelector;

impl ContextSelector for OneCfaSelector {
    fn select(&self, request: &ContextRequest<'_>) -> Context {
        caller_site(request)
    }

    fn name(&self) -> &'static str {
        "1-CFA"
    }
}

/// Selector implementing `algorithm`
pub fn selector_for(algorithm: CallGraphAlgorithm) -> Box<dyn ContextSelector> {
    match algorithm {
        CallGraphAlgorithm::ZeroCfa => Box::new(ZeroCfaSelector),
        CallGraphAlgorithm::ZeroOneCfa => Box::new(ZeroOneCfaSelector),
        CallGraphAlgorithm::OneCfa => Box::new(OneCfaSelector),
    }
}
