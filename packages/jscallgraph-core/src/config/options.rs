//! Analysis options
//!
//! Immutable configuration snapshot handed to the engine at construction. The driver owns it;
//! the builder only reads it.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default wall-clock budget: two hours
pub const DEFAULT_TIMEOUT_MS: u64 = 7_200_000;

/// Call-graph construction algorithm (context-sensitivity policy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallGraphAlgorithm {
    /// Context-insensitive everywhere
    ZeroCfa,

    /// Context-insensitive, except one level of call string for constructors and
    /// `call`/`apply` dispatch
    ZeroOneCfa,

    /// One level of call string for every call
    OneCfa,
}

impl CallGraphAlgorithm {
    pub const VALUES: [&'static str; 3] = ["zero-cfa", "zero-one-cfa", "one-cfa"];
    pub const ALL: [CallGraphAlgorithm; 3] = [Self::ZeroCfa, Self::ZeroOneCfa, Self::OneCfa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroCfa => "zero-cfa",
            Self::ZeroOneCfa => "zero-one-cfa",
            Self::OneCfa => "one-cfa",
        }
    }
}

impl Default for CallGraphAlgorithm {
    fn default() -> Self {
        Self::ZeroOneCfa
    }
}

impl fmt::Display for CallGraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallGraphAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "zero-cfa" | "0-cfa" => Ok(Self::ZeroCfa),
            "zero-one-cfa" | "zeroone-cfa" | "0-1-cfa" => Ok(Self::ZeroOneCfa),
            "one-cfa" | "1-cfa" => Ok(Self::OneCfa),
            _ => Err(ConfigError::unknown_value("algorithm", s, &Self::VALUES)),
        }
    }
}

/// How computed property accesses (`o[k]`) are modelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectionMode {
    /// Only numeric keys (array elements) are followed
    None,

    /// Numeric keys plus keys that are known string constants
    StringOnly,

    /// Everything above, plus unknown keys through per-object summary properties
    Full,
}

impl ReflectionMode {
    pub const VALUES: [&'static str; 3] = ["none", "string-only", "full"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::StringOnly => "string-only",
            Self::Full => "full",
        }
    }

    /// Whether string-constant keys resolve to named properties
    #[inline]
    pub fn resolves_string_keys(&self) -> bool {
        *self >= Self::StringOnly
    }

    /// Whether unknown keys are routed through summary properties
    #[inline]
    pub fn models_unknown_keys(&self) -> bool {
        *self == Self::Full
    }
}

impl Default for ReflectionMode {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for ReflectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReflectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(Self::None),
            "string-only" => Ok(Self::StringOnly),
            "full" => Ok(Self::Full),
            _ => Err(ConfigError::unknown_value("reflection", s, &Self::VALUES)),
        }
    }
}

/// Allocation abstraction granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceKeyMode {
    /// One key per allocation site
    AllocationSites,

    /// One key per (allocation site, context of the allocating node)
    ContextAllocations,
}

impl Default for InstanceKeyMode {
    fn default() -> Self {
        Self::AllocationSites
    }
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Context-sensitivity policy
    pub algorithm: CallGraphAlgorithm,

    /// Computed property access handling
    pub reflection: ReflectionMode,

    /// Maximum number of call-graph nodes (None = unbounded)
    pub max_nodes: Option<usize>,

    /// Wall-clock budget in milliseconds (None = unbounded)
    pub timeout_ms: Option<u64>,

    /// Rewrite `f.call(..)` / `f.apply(..)` to direct dispatch on `f`
    pub handle_call_apply: bool,

    /// Distinct instance keys per constant value instead of per constant kind
    pub use_constant_specific_keys: bool,

    /// Allocation abstraction
    pub instance_keys: InstanceKeyMode,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            algorithm: CallGraphAlgorithm::default(),
            reflection: ReflectionMode::default(),
            max_nodes: None,
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            handle_call_apply: true,
            use_constant_specific_keys: false,
            instance_keys: InstanceKeyMode::default(),
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_nodes == Some(0) {
            return Err(ConfigError::range_with_hint(
                "max_nodes",
                0,
                1,
                usize::MAX,
                "Leave the ceiling unset for an unbounded analysis",
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(ConfigError::range_with_hint(
                "timeout_ms",
                0,
                1,
                u64::MAX,
                "Leave the timeout unset to disable it",
            ));
        }

        if self.reflection == ReflectionMode::StringOnly && !self.use_constant_specific_keys {
            return Err(ConfigError::conflict(
                "reflection 'string-only' needs string constants to keep their values, \
                 but use_constant_specific_keys is off",
                "enable use_constant_specific_keys or pick reflection 'full'",
            ));
        }

        Ok(())
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Builder: Set algorithm
    pub fn algorithm(mut self, v: CallGraphAlgorithm) -> Self {
        self.algorithm = v;
        self
    }

    /// Builder: Set reflection
    pub fn reflection(mut self, v: ReflectionMode) -> Self {
        self.reflection = v;
        self
    }

    /// Builder: Set max_nodes
    pub fn max_nodes(mut self, v: Option<usize>) -> Self {
        self.max_nodes = v;
        self
    }

    /// Builder: Set timeout_ms
    pub fn timeout_ms(mut self, v: Option<u64>) -> Self {
        self.timeout_ms = v;
        self
    }

    /// Builder: Set handle_call_apply
    pub fn handle_call_apply(mut self, v: bool) -> Self {
        self.handle_call_apply = v;
        self
    }

    /// Builder: Set use_constant_specific_keys
    pub fn use_constant_specific_keys(mut self, v: bool) -> Self {
        self.use_constant_specific_keys = v;
        self
    }

    /// Builder: Set instance_keys
    pub fn instance_keys(mut self, v: InstanceKeyMode) -> Self {
        self.instance_keys = v;
        self
    }
}
