//! # Kamado
//!
//! An **isolated single-worker inference runtime**: one background task
//! exclusively owns one loaded model, and the rest of the program talks to it
//! only through message channels.
//!
//! ## Overview
//!
//! This library decouples model execution from the caller's control flow. A
//! [`WorkerContext`](worker::WorkerContext) spawns a dedicated task that
//! fetches a binary module, loads it into an engine, and then serves requests
//! strictly one at a time in arrival order. The caller submits requests
//! without blocking and collects responses from an ordered outbound stream.
//!
//! Key components include:
//!
//! - Engine traits separating the expensive one-time module load from cheap
//!   engine construction
//! - A worker execution context with an observable lifecycle
//!   (`Uninitialized → Loading → Ready ⇄ Busy → Terminated`)
//! - Startup buffering: requests submitted while the module is still loading
//!   are replayed in order once the engine is ready
//! - A typed error taxonomy delivered per-request over the response channel
//!
//! ## Architecture
//!
//! ### Engine Traits
//!
//! The [`engine::InferenceModule`] and [`engine::InferenceEngine`] traits
//! define the interface any model backend must satisfy. Loading is the
//! expensive step and happens exactly once per worker; constructing an engine
//! from a loaded module is cheap. This keeps the worker loop independent of
//! the specific model implementation.
//!
//! ### Worker Execution Context
//!
//! The worker owns its engine outright. All data crosses the task boundary by
//! value through unbounded channels, so no locks guard the engine: it is only
//! ever touched by the single consuming task. Exactly one response is emitted
//! per accepted request, success or failure, and responses preserve request
//! order.
//!
//! ## Features
//!
//! - **onnx** - Enables the tract-onnx digit classification engine
//!
//! ## Failure Model
//!
//! Per-request faults (malformed input, numeric failure) answer that one
//! request with an error and leave the worker serving. Only a module load
//! failure is fatal: the worker answers every buffered request with a
//! not-ready error and terminates without ever becoming ready.

mod communication;
mod error;
mod source;

pub mod engine;
pub mod worker;

pub use communication::{Response, ResponseStream};
pub use error::{InferenceError, Terminated};
pub use source::{FileModuleSource, ModuleSource, StaticModuleSource};
pub use worker::{LifecycleState, WorkerContext};
