//! Configuration I/O (YAML loading)

use super::error::{ConfigError, ConfigResult};
use super::options::AnalysisOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported schema versions
pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// analysis:
///   algorithm: one-cfa
///   max_nodes: 5000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Analysis options; missing fields take their defaults
    #[serde(default)]
    pub analysis: AnalysisOptions,
}

impl ConfigFileV1 {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<AnalysisOptions> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        file.analysis.validate()?;
        Ok(file.analysis)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<AnalysisOptions> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize options as a v1 document
    pub fn to_yaml(options: &AnalysisOptions) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            analysis: options.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
