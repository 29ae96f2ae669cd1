//! Demo entry point for onnxrun.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use onnxrun::config::Config;
use onnxrun::runtime::{Accelerator, CompileOptions, CompiledModel, Environment};

fn main() -> ExitCode {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// The demo flow: environment, model, options, compilation, buffers, one
/// inference pass. Each stage either succeeds or ends the run.
fn run() -> Result<ExitCode> {
    info!("Starting ONNX inference example");

    let config = Config::default();

    // The environment uses global runtime resources and must outlive all
    // other handles.
    let env = Environment::create().context("Failed to create runtime environment")?;
    info!("Runtime environment created");

    let model_path = Path::new(&config.model.path);
    if !model_path.exists() {
        warn!(
            "Model file '{}' not found. Place a valid ONNX model in the working directory.",
            model_path.display()
        );
        warn!("Skipping model loading and inference steps for this run.");
        return Ok(ExitCode::SUCCESS);
    }

    let model = env
        .load_model(model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;
    info!("Model loaded successfully");

    let accelerator: Accelerator = config
        .compilation
        .accelerator
        .parse()
        .context("Failed to build compilation options")?;
    let options = CompileOptions::new()
        .with_accelerator(accelerator)
        .with_optimize(config.compilation.optimize);
    info!("Compiling for accelerator: {}", accelerator);

    let compiled =
        CompiledModel::compile(&env, model, &options).context("Failed to compile model")?;
    info!("Model compiled successfully");

    let input_buffers = compiled
        .create_input_buffers()
        .context("Failed to create input buffers")?;
    info!("Created {} input buffer(s)", input_buffers.len());

    // Inputs stay zero-filled for the demo run; a real caller would copy
    // image or feature data into them here via TensorBuffer::write_f32.

    let mut output_buffers = compiled
        .create_output_buffers()
        .context("Failed to create output buffers")?;
    info!("Created {} output buffer(s)", output_buffers.len());

    info!("Running inference...");
    let stats = compiled
        .run(&input_buffers, &mut output_buffers)
        .context("Inference failed")?;
    info!("Inference completed successfully");
    info!(
        "{} output(s) in {:.2} ms",
        output_buffers.len(),
        stats.latency_ms
    );

    Ok(ExitCode::SUCCESS)
}
