use crate::error::InferenceError;

/// A binary module loaded into memory, ready to construct engines.
///
/// Loading is the expensive, one-time step of engine initialization: parsing
/// and compiling the module's code and trained parameters. A worker loads its
/// module exactly once, before it accepts any work.
pub trait InferenceModule: Sized + Send + 'static {
    /// The engine type this module constructs
    type Engine: InferenceEngine;

    /// Compiles raw module bytes into a loaded module.
    ///
    /// Fails with [`InferenceError::ModuleLoad`] when the bytes are absent,
    /// malformed, or incompatible with the host.
    fn load(bytes: &[u8]) -> Result<Self, InferenceError>;

    /// Builds a fresh, ready-to-use engine from this module.
    ///
    /// Must be cheap relative to [`load`](InferenceModule::load) and must not
    /// reload the module; calling it more than once on the same module is
    /// allowed.
    fn construct(&self) -> Result<Self::Engine, InferenceError>;
}

/// A stateful engine wrapping a loaded module's code and weights.
///
/// The engine lives for the entire duration of the worker that owns it and is
/// only ever touched by that worker, one invocation at a time.
pub trait InferenceEngine: Send + 'static {
    /// Input payload type for one invocation
    type Input: Send + 'static;

    /// Output value produced by one invocation
    type Output: Send + 'static;

    /// Runs one synchronous inference.
    ///
    /// Must be deterministic for identical (state, input) pairs. A malformed
    /// input yields [`InferenceError::InvalidInput`] and an internal fault
    /// yields [`InferenceError::Execution`]; neither may leave the engine in
    /// a state that corrupts later invocations.
    fn execute(&mut self, input: Self::Input) -> Result<Self::Output, InferenceError>;
}

/// Input type of the engine constructed by module `M`.
pub type EngineInput<M> =
    <<M as InferenceModule>::Engine as InferenceEngine>::Input;

/// Output type of the engine constructed by module `M`.
pub type EngineOutput<M> =
    <<M as InferenceModule>::Engine as InferenceEngine>::Output;
