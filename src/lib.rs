//! onnxrun: Minimal demo for running ONNX models with the tract runtime.
//!
//! This crate wraps the runtime behind a small set of safe handles that
//! follow the runtime's dependency order: an [`Environment`] is created
//! first and outlives everything derived from it, a [`Model`] is parsed
//! from disk, and compiling the model under [`CompileOptions`] produces a
//! [`CompiledModel`] that hands out tensor buffers and runs inference.
//!
//! # Example
//!
//! ```ignore
//! use onnxrun::runtime::{CompileOptions, CompiledModel, Environment};
//!
//! let env = Environment::create()?;
//! let model = env.load_model("model.onnx")?;
//! let compiled = CompiledModel::compile(&env, model, &CompileOptions::new())?;
//!
//! let inputs = compiled.create_input_buffers()?;
//! let mut outputs = compiled.create_output_buffers()?;
//! let stats = compiled.run(&inputs, &mut outputs)?;
//! println!("ran in {:.2}ms", stats.latency_ms);
//! ```

pub mod config;
pub mod error;
pub mod runtime;

// Re-export commonly used types
pub use error::{OnnxRunError, Result};
pub use runtime::{
    Accelerator, CompileOptions, CompiledModel, Environment, InferenceStats, Model, TensorBuffer,
};
