//! Configuration types for onnxrun.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Model configuration.
    #[serde(default)]
    pub model: ModelConfig,

    /// Compilation configuration.
    #[serde(default)]
    pub compilation: CompilationConfig,
}

/// Model configuration.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Compilation configuration.
#[derive(Debug, Deserialize)]
pub struct CompilationConfig {
    /// Accelerator to compile for.
    #[serde(default = "default_accelerator")]
    pub accelerator: String,

    /// Whether to run the runtime's graph optimizer before execution.
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

impl Default for CompilationConfig {
    fn default() -> Self {
        Self {
            accelerator: default_accelerator(),
            optimize: default_optimize(),
        }
    }
}

fn default_model_path() -> String {
    "model.onnx".to_string()
}

fn default_accelerator() -> String {
    "cpu".to_string()
}

fn default_optimize() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> crate::error::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
