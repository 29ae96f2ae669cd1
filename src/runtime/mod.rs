//! Inference runtime wrappers.
//!
//! This module provides safe handles over the tract ONNX runtime for
//! environment setup, model loading, compilation, and buffer management.

mod model;

pub use model::{
    Accelerator, CompileOptions, CompiledModel, Environment, InferenceStats, Model, TensorBuffer,
};
