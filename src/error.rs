//! Error types for onnxrun.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for onnxrun operations.
pub type Result<T> = std::result::Result<T, OnnxRunError>;

/// Errors that can occur while driving the inference runtime.
#[derive(Debug, Error)]
pub enum OnnxRunError {
    /// Runtime environment creation failed.
    #[error("Environment creation failed: {0}")]
    Environment(String),

    /// Model loading failed.
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    /// Model compilation failed.
    #[error("Compilation failed: {0}")]
    Compile(String),

    /// Tensor buffer creation or access failed.
    #[error("Buffer error: {0}")]
    Buffer(String),

    /// Inference failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

impl OnnxRunError {
    /// Create an environment error.
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Create a model load error.
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a compilation error.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Create a buffer error.
    pub fn buffer(msg: impl Into<String>) -> Self {
        Self::Buffer(msg.into())
    }

    /// Create an inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
