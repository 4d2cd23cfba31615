use std::io::Cursor;
use std::sync::Arc;

use image::{imageops, ImageBuffer, Luma};
use tracing::debug;
use tract_onnx::prelude::*;

use crate::engine::{InferenceEngine, InferenceModule};
use crate::error::InferenceError;

/// Side of the square sample the model consumes
const SAMPLE_SIDE: u32 = 28;

/// Number of digit classes the model scores
const CLASS_COUNT: usize = 10;

type DigitPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// An RGBA canvas snapshot to classify.
///
/// Any canvas size is accepted; the engine converts to grayscale and resizes
/// to the model's native sample size. `data` must hold exactly
/// `width * height * 4` bytes in RGBA order.
#[derive(Debug, Clone)]
pub struct CanvasImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl CanvasImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// The digit the model recognized, with the raw score for every class.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    label: usize,
    scores: Vec<f32>,
}

impl Classification {
    /// The class with the highest score.
    pub fn label(&self) -> usize {
        self.label
    }

    /// Raw model scores, indexed by class.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }
}

/// An MNIST-style ONNX graph compiled into a runnable plan.
pub struct DigitModule {
    plan: Arc<DigitPlan>,
}

/// Classifies hand-drawn canvases against a [`DigitModule`]'s plan.
pub struct DigitEngine {
    plan: Arc<DigitPlan>,
}

impl InferenceModule for DigitModule {
    type Engine = DigitEngine;

    fn load(bytes: &[u8]) -> Result<Self, InferenceError> {
        if bytes.is_empty() {
            return Err(InferenceError::ModuleLoad(
                "module bytes are empty".to_string(),
            ));
        }

        let plan = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(bytes))
            .map_err(|e| InferenceError::ModuleLoad(format!("parsing onnx graph: {e}")))?
            .into_optimized()
            .map_err(|e| InferenceError::ModuleLoad(format!("optimizing graph: {e}")))?
            .into_runnable()
            .map_err(|e| InferenceError::ModuleLoad(format!("planning graph: {e}")))?;

        debug!(bytes = bytes.len(), "onnx digit model compiled");
        Ok(Self {
            plan: Arc::new(plan),
        })
    }

    fn construct(&self) -> Result<Self::Engine, InferenceError> {
        // The compiled plan is shared; constructing an engine never reloads it
        Ok(DigitEngine {
            plan: self.plan.clone(),
        })
    }
}

impl InferenceEngine for DigitEngine {
    type Input = CanvasImage;
    type Output = Classification;

    fn execute(&mut self, input: Self::Input) -> Result<Self::Output, InferenceError> {
        let gray = grayscale(&input)?;
        let sample = prepare_sample(gray, input.width, input.height)?;

        let side = SAMPLE_SIDE as usize;
        let tensor =
            tract_ndarray::Array4::from_shape_fn((1, 1, side, side), |(_, _, y, x)| {
                sample[y * side + x]
            })
            .into_tensor();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::Execution(format!("running plan: {e}")))?;

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Execution(format!("reading output tensor: {e}")))?;
        let scores: Vec<f32> = view.iter().copied().collect();
        if scores.len() != CLASS_COUNT {
            return Err(InferenceError::Execution(format!(
                "expected {} class scores, got {}",
                CLASS_COUNT,
                scores.len()
            )));
        }

        let label = argmax(&scores).ok_or_else(|| {
            InferenceError::Execution("class scores are all NaN".to_string())
        })?;
        Ok(Classification { label, scores })
    }
}

/// Collapses RGBA canvas data to alpha-weighted grayscale.
fn grayscale(input: &CanvasImage) -> Result<Vec<u8>, InferenceError> {
    if input.width == 0 || input.height == 0 {
        return Err(InferenceError::InvalidInput(
            "canvas dimensions are zero".to_string(),
        ));
    }
    let expected = (input.width * input.height * 4) as usize;
    if input.data.len() != expected {
        return Err(InferenceError::InvalidInput(format!(
            "canvas is {}x{} so rgba data must be {} bytes, got {}",
            input.width,
            input.height,
            expected,
            input.data.len()
        )));
    }

    let gray = input
        .data
        .chunks_exact(4)
        .map(|px| {
            let alpha = px[3] as f32 / 255.0;
            let r = px[0] as f32 * alpha;
            let g = px[1] as f32 * alpha;
            let b = px[2] as f32 * alpha;
            ((r + g + b) / 3.0) as u8
        })
        .collect();
    Ok(gray)
}

/// Resizes to the model's sample size and binarizes with a mid-range
/// threshold. Ink is dark on a light canvas; the model wants white-on-black,
/// so stroke pixels become 1.0 and everything else 0.0.
fn prepare_sample(gray: Vec<u8>, width: u32, height: u32) -> Result<Vec<f32>, InferenceError> {
    let buffer = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, gray)
        .ok_or_else(|| {
            InferenceError::InvalidInput("could not assemble grayscale buffer".to_string())
        })?;
    let resized = imageops::resize(&buffer, SAMPLE_SIDE, SAMPLE_SIDE, imageops::FilterType::Lanczos3);

    let max = resized.pixels().map(|p| p[0]).max().unwrap_or(0);
    let min = resized.pixels().map(|p| p[0]).min().unwrap_or(0);
    if max == min {
        return Err(InferenceError::InvalidInput(
            "canvas is uniform, nothing to classify".to_string(),
        ));
    }
    let threshold = min + (max - min) / 2;

    Ok(resized
        .pixels()
        .map(|p| if p[0] < threshold { 1.0 } else { 0.0 })
        .collect())
}

fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a `width` x `height` white canvas with an optional black
    /// vertical stroke down the middle.
    fn canvas(width: u32, height: u32, stroke: bool) -> CanvasImage {
        let mut data = vec![255u8; (width * height * 4) as usize];
        if stroke {
            for y in 0..height {
                for x in (width / 2).saturating_sub(1)..=(width / 2) {
                    let at = ((y * width + x) * 4) as usize;
                    data[at] = 0;
                    data[at + 1] = 0;
                    data[at + 2] = 0;
                }
            }
        }
        CanvasImage::new(data, width, height)
    }

    #[test]
    fn test_load_rejects_empty_bytes() {
        assert!(matches!(
            DigitModule::load(&[]),
            Err(InferenceError::ModuleLoad(_))
        ));
    }

    #[test]
    fn test_load_rejects_garbage_bytes() {
        assert!(matches!(
            DigitModule::load(b"definitely not an onnx graph"),
            Err(InferenceError::ModuleLoad(_))
        ));
    }

    #[test]
    fn test_grayscale_rejects_wrong_length() {
        let input = CanvasImage::new(vec![0u8; 12], 28, 28);
        match grayscale(&input) {
            Err(InferenceError::InvalidInput(detail)) => {
                assert!(detail.contains("3136"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_grayscale_rejects_zero_dimensions() {
        let input = CanvasImage::new(vec![], 0, 28);
        assert!(matches!(
            grayscale(&input),
            Err(InferenceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_grayscale_is_alpha_weighted() {
        // One fully transparent white pixel, one opaque white pixel
        let input = CanvasImage::new(vec![255, 255, 255, 0, 255, 255, 255, 255], 2, 1);
        let gray = grayscale(&input).unwrap();
        assert_eq!(gray, vec![0, 255]);
    }

    #[test]
    fn test_prepare_sample_rejects_uniform_canvas() {
        let input = canvas(56, 56, false);
        let gray = grayscale(&input).unwrap();
        assert!(matches!(
            prepare_sample(gray, 56, 56),
            Err(InferenceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prepare_sample_binarizes_stroke() {
        let input = canvas(56, 56, true);
        let gray = grayscale(&input).unwrap();
        let sample = prepare_sample(gray, 56, 56).unwrap();

        assert_eq!(sample.len(), (SAMPLE_SIDE * SAMPLE_SIDE) as usize);
        assert!(sample.iter().all(|&v| v == 0.0 || v == 1.0));
        // The stroke survives the resize as ink
        assert!(sample.iter().any(|&v| v == 1.0));
        // And the background stays background
        assert!(sample.iter().any(|&v| v == 0.0));
    }

    #[test]
    fn test_argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[0.1, f32::NAN, 0.3]), Some(2));
        assert_eq!(argmax(&[f32::NAN]), None);
    }
}
