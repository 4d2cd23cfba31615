//! # Inference Engine
//!
//! This module defines the interface a model backend must satisfy to run
//! inside a worker, keeping the worker loop independent of any specific
//! model implementation.
//!
//! Initialization is two-phase on purpose: [`InferenceModule::load`] is the
//! expensive step that compiles the binary module and happens exactly once
//! per worker, while [`InferenceModule::construct`] builds a ready-to-use
//! engine from the loaded module and is cheap enough to call repeatedly.

//! ## Feature Flags
//!
//! - `onnx`: Enables the tract-onnx digit classification engine

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "onnx")))]
#[cfg(feature = "onnx")]
/// ONNX digit classification engine.
///
/// This module is only available when the `onnx` feature flag is enabled.
/// It loads an MNIST-style ONNX graph with tract-onnx and classifies
/// hand-drawn canvas images into digits.
pub mod onnx;


// Re-export the core traits for convenient imports
pub use core_trait::*;


#[cfg(test)]
/// Mock module and engine implementation.
///
/// Deterministic integer arithmetic with injectable failure modes
pub(crate) mod mock_engine;
