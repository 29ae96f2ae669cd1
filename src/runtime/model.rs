//! Safe wrappers around the tract ONNX runtime.
//!
//! Handles follow the runtime's dependency order: an [`Environment`] is
//! created first and borrowed by everything derived from it, a [`Model`] is
//! parsed from disk, and compiling the model under [`CompileOptions`]
//! produces a [`CompiledModel`] that owns the executable plan and its
//! tensor signature.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use tract_onnx::prelude::*;
use tract_onnx::Onnx;

use crate::error::{OnnxRunError, Result};

/// Hardware execution target selectable via [`CompileOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accelerator {
    /// CPU execution.
    #[default]
    Cpu,
    /// GPU execution (not available in this build).
    Gpu,
    /// NPU execution (not available in this build).
    Npu,
}

impl FromStr for Accelerator {
    type Err = OnnxRunError;

    /// Parse an accelerator string like "cpu", "gpu", "npu".
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "gpu" => Ok(Self::Gpu),
            "npu" => Ok(Self::Npu),
            other => Err(OnnxRunError::config(format!(
                "Invalid accelerator: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Gpu => write!(f, "gpu"),
            Self::Npu => write!(f, "npu"),
        }
    }
}

/// Process-wide runtime context.
///
/// The environment owns the ONNX importer and must outlive every handle
/// derived from it: create it first, drop it last.
pub struct Environment {
    framework: Onnx,
}

impl Environment {
    /// Create the runtime environment.
    pub fn create() -> Result<Self> {
        Ok(Self {
            framework: tract_onnx::onnx(),
        })
    }

    /// Accelerators this build can execute on.
    pub fn supported_accelerators(&self) -> &'static [Accelerator] {
        &[Accelerator::Cpu]
    }

    /// Whether this build can execute on the given accelerator.
    pub fn supports(&self, accelerator: Accelerator) -> bool {
        self.supported_accelerators().contains(&accelerator)
    }

    /// Parse a model file into an in-memory [`Model`].
    ///
    /// # Errors
    ///
    /// Returns [`OnnxRunError::FileNotFound`] if the path does not exist
    /// and [`OnnxRunError::ModelLoad`] if the runtime rejects the file.
    pub fn load_model(&self, path: impl AsRef<Path>) -> Result<Model> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OnnxRunError::FileNotFound(path.to_path_buf()));
        }

        let graph = self
            .framework
            .model_for_path(path)
            .map_err(|e| OnnxRunError::model_load(format!("{}: {}", path.display(), e)))?;

        Ok(Model { graph })
    }
}

/// In-memory parsed model, input to compilation.
pub struct Model {
    graph: InferenceModel,
}

impl Model {
    /// Number of graph inputs.
    pub fn num_inputs(&self) -> usize {
        self.graph.inputs.len()
    }

    /// Number of graph outputs.
    pub fn num_outputs(&self) -> usize {
        self.graph.outputs.len()
    }
}

/// Configuration value consumed once during compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    accelerator: Accelerator,
    optimize: bool,
    input_shape: Option<Vec<usize>>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            accelerator: Accelerator::Cpu,
            optimize: true,
            input_shape: None,
        }
    }
}

impl CompileOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the hardware accelerator to compile for.
    pub fn with_accelerator(mut self, accelerator: Accelerator) -> Self {
        self.accelerator = accelerator;
        self
    }

    /// Enable or disable the runtime's graph optimizer.
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Override the shape of the first graph input.
    ///
    /// Useful for models exported with a symbolic batch dimension.
    pub fn with_input_shape(mut self, shape: Vec<usize>) -> Self {
        self.input_shape = Some(shape);
        self
    }

    /// The accelerator these options select.
    pub fn accelerator(&self) -> Accelerator {
        self.accelerator
    }
}

/// Executable artifact produced by compiling a [`Model`].
pub struct CompiledModel {
    plan: TypedRunnableModel<TypedModel>,
}

impl CompiledModel {
    /// Compile a model for the target selected by `options`.
    ///
    /// Consumes the model; the compiled plan owns the optimized graph and
    /// its tensor signature.
    pub fn compile(env: &Environment, model: Model, options: &CompileOptions) -> Result<Self> {
        if !env.supports(options.accelerator) {
            return Err(OnnxRunError::compile(format!(
                "accelerator {} is not available in this build",
                options.accelerator
            )));
        }

        let mut graph = model.graph;
        if let Some(shape) = options.input_shape.clone() {
            graph = graph
                .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), shape))
                .map_err(|e| OnnxRunError::compile(e.to_string()))?;
        }

        let typed = if options.optimize {
            graph.into_optimized()
        } else {
            graph.into_typed()
        }
        .map_err(|e| OnnxRunError::compile(e.to_string()))?;

        let plan = typed
            .into_runnable()
            .map_err(|e| OnnxRunError::compile(e.to_string()))?;

        Ok(Self { plan })
    }

    /// Number of input tensors in the compiled signature.
    pub fn num_inputs(&self) -> usize {
        self.plan.model().inputs.len()
    }

    /// Number of output tensors in the compiled signature.
    pub fn num_outputs(&self) -> usize {
        self.plan.model().outputs.len()
    }

    /// Concrete shape of the `index`-th input tensor.
    pub fn input_shape(&self, index: usize) -> Result<Vec<usize>> {
        let fact = self
            .plan
            .model()
            .input_fact(index)
            .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
        concrete_shape(fact, "input", index)
    }

    /// Concrete shape of the `index`-th output tensor.
    pub fn output_shape(&self, index: usize) -> Result<Vec<usize>> {
        let fact = self
            .plan
            .model()
            .output_fact(index)
            .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
        concrete_shape(fact, "output", index)
    }

    /// Allocate zero-filled buffers matching the model's input signature.
    pub fn create_input_buffers(&self) -> Result<Vec<TensorBuffer>> {
        (0..self.num_inputs())
            .map(|i| {
                let fact = self
                    .plan
                    .model()
                    .input_fact(i)
                    .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
                TensorBuffer::for_fact(fact, "input", i)
            })
            .collect()
    }

    /// Allocate zero-filled buffers matching the model's output signature.
    pub fn create_output_buffers(&self) -> Result<Vec<TensorBuffer>> {
        (0..self.num_outputs())
            .map(|i| {
                let fact = self
                    .plan
                    .model()
                    .output_fact(i)
                    .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
                TensorBuffer::for_fact(fact, "output", i)
            })
            .collect()
    }

    /// Run one inference pass.
    ///
    /// Reads `inputs`, writes the produced tensors into `outputs`, and
    /// reports wall-clock latency.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer counts do not match the compiled
    /// signature or if the runtime fails to execute the plan.
    pub fn run(
        &self,
        inputs: &[TensorBuffer],
        outputs: &mut [TensorBuffer],
    ) -> Result<InferenceStats> {
        if inputs.len() != self.num_inputs() {
            return Err(OnnxRunError::inference(format!(
                "expected {} input buffer(s), got {}",
                self.num_inputs(),
                inputs.len()
            )));
        }
        if outputs.len() != self.num_outputs() {
            return Err(OnnxRunError::inference(format!(
                "expected {} output buffer(s), got {}",
                self.num_outputs(),
                outputs.len()
            )));
        }

        let feed: TVec<TValue> = inputs.iter().map(|b| b.tensor.clone().into()).collect();

        let start = Instant::now();
        let produced = self
            .plan
            .run(feed)
            .map_err(|e| OnnxRunError::inference(e.to_string()))?;
        let latency_ms = start.elapsed().as_secs_f64() * 1e3;

        for (buffer, value) in outputs.iter_mut().zip(produced) {
            buffer.tensor = value.into_tensor();
        }

        Ok(InferenceStats { latency_ms })
    }
}

/// A memory region holding one input or output tensor.
///
/// Buffers are zero-initialized at creation, shaped and typed per the
/// compiled model's signature. Callers write inputs and read outputs
/// through the typed slice accessors.
pub struct TensorBuffer {
    tensor: Tensor,
}

impl TensorBuffer {
    fn for_fact(fact: &TypedFact, kind: &str, index: usize) -> Result<Self> {
        let shape = concrete_shape(fact, kind, index)?;
        let tensor = Tensor::zero_dt(fact.datum_type, &shape)
            .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
        Ok(Self { tensor })
    }

    /// Shape of the buffer.
    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.tensor.len() == 0
    }

    /// Copy `data` into the buffer.
    ///
    /// The buffer must hold f32 elements and `data` must match its length.
    pub fn write_f32(&mut self, data: &[f32]) -> Result<()> {
        let dst = self
            .tensor
            .as_slice_mut::<f32>()
            .map_err(|e| OnnxRunError::buffer(e.to_string()))?;
        if data.len() != dst.len() {
            return Err(OnnxRunError::buffer(format!(
                "expected {} element(s), got {}",
                dst.len(),
                data.len()
            )));
        }
        dst.copy_from_slice(data);
        Ok(())
    }

    /// View the buffer contents as f32 elements.
    pub fn read_f32(&self) -> Result<&[f32]> {
        self.tensor
            .as_slice::<f32>()
            .map_err(|e| OnnxRunError::buffer(e.to_string()))
    }
}

/// Timing for one inference pass.
#[derive(Debug, Clone, Copy)]
pub struct InferenceStats {
    /// Wall-clock latency in milliseconds.
    pub latency_ms: f64,
}

fn concrete_shape(fact: &TypedFact, kind: &str, index: usize) -> Result<Vec<usize>> {
    fact.shape
        .as_concrete()
        .map(|dims| dims.to_vec())
        .ok_or_else(|| {
            OnnxRunError::buffer(format!("{} {} has a dynamic shape: {:?}", kind, index, fact))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accelerator_parses_known_targets() {
        assert_eq!("cpu".parse::<Accelerator>().unwrap(), Accelerator::Cpu);
        assert_eq!("GPU".parse::<Accelerator>().unwrap(), Accelerator::Gpu);
        assert_eq!(" npu ".parse::<Accelerator>().unwrap(), Accelerator::Npu);
        assert!("tpu".parse::<Accelerator>().is_err());
    }

    #[test]
    fn accelerator_display_round_trips() {
        for acc in [Accelerator::Cpu, Accelerator::Gpu, Accelerator::Npu] {
            assert_eq!(acc.to_string().parse::<Accelerator>().unwrap(), acc);
        }
    }

    #[test]
    fn default_options_target_cpu() {
        let options = CompileOptions::new();
        assert_eq!(options.accelerator(), Accelerator::Cpu);
    }

    #[test]
    fn environment_supports_cpu_only() {
        let env = Environment::create().unwrap();
        assert!(env.supports(Accelerator::Cpu));
        assert!(!env.supports(Accelerator::Gpu));
        assert!(!env.supports(Accelerator::Npu));
    }
}
