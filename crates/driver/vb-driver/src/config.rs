//! `vbx.toml` configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vb_ir::CompareMode;
use vb_lower::LowerOptions;

/// Whole configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TranspileConfig {
    /// `[output]`
    pub output: OutputConfig,

    /// `[lowering]`
    pub lowering: LoweringConfig,
}

/// Shape of the produced program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Name of the top-level type wrapping a bare file
    pub class_name: String,

    /// Namespace recorded on the program
    pub namespace: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            class_name: "Module1".to_string(),
            namespace: None,
        }
    }
}

/// Comparison mode as written in the file
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareSetting {
    /// Ordinal
    #[default]
    Binary,
    /// Case-insensitive
    Text,
}

impl From<CompareSetting> for CompareMode {
    fn from(setting: CompareSetting) -> Self {
        match setting {
            CompareSetting::Binary => Self::Binary,
            CompareSetting::Text => Self::Text,
        }
    }
}

/// Initial directive state and comment handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoweringConfig {
    /// Comparison mode before any `Option Compare`
    pub option_compare: CompareSetting,

    /// Array base before any `Option Base`
    pub option_base: u8,

    /// Carry attached comments into the program
    pub emit_comments: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            option_compare: CompareSetting::Binary,
            option_base: 0,
            emit_comments: true,
        }
    }
}

impl TranspileConfig {
    /// Parses and validates a configuration document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if config.lowering.option_base > 1 {
            return Err(ConfigError::InvalidBase(config.lowering.option_base));
        }
        Ok(config)
    }

    /// Reads and parses a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Options handed to the lowering pass
    pub fn lower_options(&self) -> LowerOptions {
        LowerOptions {
            class_name: self.output.class_name.clone(),
            namespace: self.output.namespace.clone(),
            compare: self.lowering.option_compare.into(),
            base: self.lowering.option_base,
            emit_comments: self.lowering.emit_comments,
        }
    }
}
