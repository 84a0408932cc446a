//! SSA instructions
//!
//! The front-end lowers each function to a flat list of SSA instructions. Every value is
//! defined exactly once; `Phi` merges values at join points. Control flow is irrelevant to a
//! flow-insensitive pointer analysis, so no branch instructions exist.

use crate::shared::{FunctionId, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal value of a `Constant` instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Null,
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Boolean(b) => write!(f, "{}", b),
            ConstantValue::Number(n) => write!(f, "{}", n),
            ConstantValue::String(s) => write!(f, "{:?}", s),
            ConstantValue::Null => f.write_str("null"),
        }
    }
}

/// Ordinary call or `new` expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Call,
    Construct,
}

impl Default for CallKind {
    fn default() -> Self {
        CallKind::Call
    }
}

/// A call instruction: `dst = callee.call(receiver, args...)`
///
/// Method calls `o.m(a)` are lowered to a property read of `m` into `callee` followed by an
/// invoke with `receiver = o`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInstruction {
    #[serde(default)]
    pub dst: Option<VarId>,
    pub callee: VarId,
    #[serde(default)]
    pub receiver: Option<VarId>,
    #[serde(default)]
    pub args: Vec<VarId>,
    #[serde(default)]
    pub kind: CallKind,
}

/// SSA instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// `dst = {}`
    NewObject { dst: VarId },

    /// `dst = []`
    NewArray { dst: VarId },

    /// `dst = function ...` (creates a function object for `function`)
    Closure { dst: VarId, function: FunctionId },

    /// `dst = <literal>`
    Constant { dst: VarId, value: ConstantValue },

    /// `dst = src`
    Copy { dst: VarId, src: VarId },

    /// `dst = φ(sources)`
    Phi { dst: VarId, sources: Vec<VarId> },

    /// `dst = object.property`
    GetProperty {
        dst: VarId,
        object: VarId,
        property: String,
    },

    /// `object.property = value`
    PutProperty {
        object: VarId,
        property: String,
        value: VarId,
    },

    /// `dst = object[key]`
    GetDynamic { dst: VarId, object: VarId, key: VarId },

    /// `object[key] = value`
    PutDynamic {
        object: VarId,
        key: VarId,
        value: VarId,
    },

    /// `dst = <global name>`
    GlobalRead { dst: VarId, name: String },

    /// `<global name> = value`
    GlobalWrite { name: String, value: VarId },

    /// `dst = name` where `name` is declared by the enclosing function `definer`
    LexicalRead {
        dst: VarId,
        name: String,
        definer: FunctionId,
    },

    /// `name = value` where `name` is declared by the enclosing function `definer`
    LexicalWrite {
        name: String,
        definer: FunctionId,
        value: VarId,
    },

    /// Function call or construction
    Invoke(CallInstruction),

    /// `return value`
    Return { value: Option<VarId> },
}

impl Instruction {
    /// SSA value defined by this instruction, if any
    pub fn defined_var(&self) -> Option<VarId> {
        match self {
            Instruction::NewObject { dst }
            | Instruction::NewArray { dst }
            | Instruction::Closure { dst, .. }
            | Instruction::Constant { dst, .. }
            | Instruction::Copy { dst, .. }
            | Instruction::Phi { dst, .. }
            | Instruction::GetProperty { dst, .. }
            | Instruction::GetDynamic { dst, .. }
            | Instruction::GlobalRead { dst, .. }
            | Instruction::LexicalRead { dst, .. } => Some(*dst),
            Instruction::Invoke(call) => call.dst,
            Instruction::PutProperty { .. }
            | Instruction::PutDynamic { .. }
            | Instruction::GlobalWrite { .. }
            | Instruction::LexicalWrite { .. }
            | Instruction::Return { .. } => None,
        }
    }

    /// SSA values read by this instruction
    pub fn used_vars(&self) -> Vec<VarId> {
        match self {
            Instruction::NewObject { .. }
            | Instruction::NewArray { .. }
            | Instruction::Closure { .. }
            | Instruction::Constant { .. }
            | Instruction::GlobalRead { .. }
            | Instruction::LexicalRead { .. } => Vec::new(),
            Instruction::Copy { src, .. } => vec![*src],
            Instruction::Phi { sources, .. } => sources.clone(),
            Instruction::GetProperty { object, .. } => vec![*object],
            Instruction::PutProperty { object, value, .. } => vec![*object, *value],
            Instruction::GetDynamic { object, key, .. } => vec![*object, *key],
            Instruction::PutDynamic {
                object, key, value, ..
            } => vec![*object, *key, *value],
            Instruction::GlobalWrite { value, .. } | Instruction::LexicalWrite { value, .. } => {
                vec![*value]
            }
            Instruction::Invoke(call) => {
                let mut vars = vec![call.callee];
                vars.extend(call.receiver);
                vars.extend(call.args.iter().copied());
                vars
            }
            Instruction::Return { value } => value.iter().copied().collect(),
        }
    }

    /// Function objects created by this instruction
    pub fn referenced_function(&self) -> Option<FunctionId> {
        match self {
            Instruction::Closure { function, .. } => Some(*function),
            Instruction::LexicalRead { definer, .. } | Instruction::LexicalWrite { definer, .. } => {
                Some(*definer)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn as_call(&self) -> Option<&CallInstruction> {
        match self {
            Instruction::Invoke(call) => Some(call),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::NewObject { dst } => write!(f, "v{} = new Object", dst),
            Instruction::NewArray { dst } => write!(f, "v{} = new Array", dst),
            Instruction::Closure { dst, function } => write!(f, "v{} = closure f{}", dst, function),
            Instruction::Constant { dst, value } => write!(f, "v{} = {}", dst, value),
            Instruction::Copy { dst, src } => write!(f, "v{} = v{}", dst, src),
            Instruction::Phi { dst, sources } => {
                write!(f, "v{} = phi ", dst)?;
                write_vars(f, sources)
            }
            Instruction::GetProperty {
                dst,
                object,
                property,
            } => write!(f, "v{} = v{}.{}", dst, object, property),
            Instruction::PutProperty {
                object,
                property,
                value,
            } => write!(f, "v{}.{} = v{}", object, property, value),
            Instruction::GetDynamic { dst, object, key } => {
                write!(f, "v{} = v{}[v{}]", dst, object, key)
            }
            Instruction::PutDynamic { object, key, value } => {
                write!(f, "v{}[v{}] = v{}", object, key, value)
            }
            Instruction::GlobalRead { dst, name } => write!(f, "v{} = global:{}", dst, name),
            Instruction::GlobalWrite { name, value } => write!(f, "global:{} = v{}", name, value),
            Instruction::LexicalRead { dst, name, definer } => {
                write!(f, "v{} = lexical:{}@f{}", dst, name, definer)
            }
            Instruction::LexicalWrite {
                name,
                definer,
                value,
            } => write!(f, "lexical:{}@f{} = v{}", name, definer, value),
            Instruction::Invoke(call) => {
                if let Some(dst) = call.dst {
                    write!(f, "v{} = ", dst)?;
                }
                let verb = match call.kind {
                    CallKind::Call => "invoke",
                    CallKind::Construct => "construct",
                };
                write!(f, "{} v{}", verb, call.callee)?;
                if let Some(receiver) = call.receiver {
                    write!(f, " this=v{}", receiver)?;
                }
                f.write_str(" ")?;
                write_vars(f, &call.args)
            }
            Instruction::Return { value: Some(v) } => write!(f, "return v{}", v),
            Instruction::Return { value: None } => f.write_str("return"),
        }
    }
}

fn write_vars(f: &mut fmt::Formatter<'_>, vars: &[VarId]) -> fmt::Result {
    f.write_str("(")?;
    for (i, v) in vars.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "v{}", v)?;
    }
    f.write_str(")")
}
