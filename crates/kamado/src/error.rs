use thiserror::Error;

/// Errors produced while loading a module or serving inference requests.
///
/// Every variant carries a human-readable detail string and the whole enum is
/// cloneable, so errors can be sent across the response channel as plain
/// values rather than thrown across the task boundary.
///
/// Only [`InferenceError::ModuleLoad`] is fatal to a worker. The other kinds
/// fail a single request and leave the worker serving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Module bytes were missing, malformed, or incompatible with the host.
    #[error("module load failed: {0}")]
    ModuleLoad(String),

    /// The request could not be served because the engine never became ready.
    #[error("engine not ready: {0}")]
    NotReady(String),

    /// The request payload failed shape or range validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The engine's computation failed for an internal reason.
    #[error("execution failed: {0}")]
    Execution(String),
}

impl InferenceError {
    /// Short stable name of the error kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModuleLoad(_) => "module_load",
            Self::NotReady(_) => "not_ready",
            Self::InvalidInput(_) => "invalid_input",
            Self::Execution(_) => "execution",
        }
    }
}

/// Returned by [`WorkerContext::submit`](crate::worker::WorkerContext::submit)
/// when the worker has already shut down and can accept no further requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("worker context is terminated")]
pub struct Terminated;
