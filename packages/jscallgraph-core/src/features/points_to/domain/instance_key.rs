//! Instance keys: abstract runtime objects
//!
//! Every object the analysis reasons about is an instance key. Allocation instructions yield
//! one key per (site, heap context); the heap context is always `Everywhere` unless the
//! instance-key policy asks for context-qualified allocations.

use crate::features::context::Context;
use crate::features::program::{ConstantValue, Program};
use crate::shared::{FunctionId, ProgramCounter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an allocation site creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    /// `{}` or an object created by `new`
    Object,
    /// `[]`
    Array,
    /// Function object for the given function
    Function(FunctionId),
    /// The fresh `F.prototype` object that comes with every function object
    Prototype(FunctionId),
}

/// Allocation site: an instruction that creates an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllocationSite {
    /// Function containing the allocating instruction
    pub function: FunctionId,
    pub pc: ProgramCounter,
    pub kind: ObjectKind,
}

impl AllocationSite {
    pub fn new(function: FunctionId, pc: ProgramCounter, kind: ObjectKind) -> Self {
        Self { function, pc, kind }
    }
}

/// A specific constant (constant-specific keys)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstantKey {
    String(String),
    /// Bit pattern of the `f64`; `-0.0` and `NaN` payloads are normalized
    Number(u64),
    Boolean(bool),
}

impl ConstantKey {
    /// Normalize a number so that equal values share a key
    pub fn number(value: f64) -> Self {
        let value = if value == 0.0 {
            0.0
        } else if value.is_nan() {
            f64::NAN
        } else {
            value
        };
        ConstantKey::Number(value.to_bits())
    }
}

/// One key per constant kind (when constants are not distinguished)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstantKind {
    String,
    Number,
    Boolean,
}

impl ConstantKind {
    /// Kind of a literal; `null` has none
    pub fn of(value: &ConstantValue) -> Option<Self> {
        match value {
            ConstantValue::String(_) => Some(ConstantKind::String),
            ConstantValue::Number(_) => Some(ConstantKind::Number),
            ConstantValue::Boolean(_) => Some(ConstantKind::Boolean),
            ConstantValue::Null => None,
        }
    }
}

/// Objects that exist before the program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Builtin {
    ObjectPrototype,
    FunctionPrototype,
    /// `Function.prototype.call`
    Call,
    /// `Function.prototype.apply`
    Apply,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::ObjectPrototype,
        Builtin::FunctionPrototype,
        Builtin::Call,
        Builtin::Apply,
    ];

    /// Name of the builtin's body in the prologue script
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::ObjectPrototype => "Lprologue.js/Object_prototype",
            Builtin::FunctionPrototype => "Lprologue.js/Function_prototype",
            Builtin::Call => "Lprologue.js/Function_prototype_call",
            Builtin::Apply => "Lprologue.js/Function_prototype_apply",
        }
    }

    /// Whether the builtin can be invoked
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Builtin::Call | Builtin::Apply)
    }
}

/// Abstract object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstanceKey {
    Allocation {
        site: AllocationSite,
        /// Heap context; `Everywhere` for plain allocation-site keys
        context: Context,
    },
    Constant(ConstantKey),
    ConstantKind(ConstantKind),
    Builtin(Builtin),
}

impl InstanceKey {
    /// The function this key is a function object of
    #[inline]
    pub fn function(&self) -> Option<FunctionId> {
        match self {
            InstanceKey::Allocation {
                site:
                    AllocationSite {
                        kind: ObjectKind::Function(f),
                        ..
                    },
                ..
            } => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            InstanceKey::Builtin(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the key stands for a primitive value rather than an object
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            InstanceKey::Constant(_) | InstanceKey::ConstantKind(_)
        )
    }

    /// Human-readable rendering, resolving function names through `program`
    pub fn render(&self, program: &Program) -> String {
        let function_name = |id: FunctionId| {
            program
                .function(id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("f{}", id))
        };
        match self {
            InstanceKey::Allocation { site, context } => {
                let what = match site.kind {
                    ObjectKind::Object => "object".to_string(),
                    ObjectKind::Array => "array".to_string(),
                    ObjectKind::Function(f) => format!("function {}", function_name(f)),
                    ObjectKind::Prototype(f) => format!("prototype of {}", function_name(f)),
                };
                format!(
                    "[{} @ {}:{} in {}]",
                    what,
                    function_name(site.function),
                    site.pc,
                    context.render(program)
                )
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKey::Allocation { site, .. } => {
                write!(f, "[{:?} @ f{}:{}]", site.kind, site.function, site.pc)
            }
            InstanceKey::Constant(ConstantKey::String(s)) => write!(f, "[string {:?}]", s),
            InstanceKey::Constant(ConstantKey::Number(bits)) => {
                write!(f, "[number {}]", f64::from_bits(*bits))
            }
            InstanceKey::Constant(ConstantKey::Boolean(b)) => write!(f, "[boolean {}]", b),
            InstanceKey::ConstantKind(kind) => write!(f, "[{:?} constants]", kind),
            InstanceKey::Builtin(b) => write!(f, "[{}]", b.name()),
        }
    }
}
