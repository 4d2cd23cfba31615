use std::env;
use std::process::ExitCode;

use futures::StreamExt;
use kamado::engine::onnx::{CanvasImage, DigitModule};
use kamado::{FileModuleSource, WorkerContext};

const SIDE: u32 = 280;

/// A white canvas with a thick vertical stroke, roughly a hand-drawn "1".
fn vertical_stroke() -> CanvasImage {
    let mut data = vec![255u8; (SIDE * SIDE * 4) as usize];
    for y in SIDE / 8..SIDE - SIDE / 8 {
        for x in SIDE / 2 - 10..SIDE / 2 + 10 {
            let at = ((y * SIDE + x) * 4) as usize;
            data[at] = 0;
            data[at + 1] = 0;
            data[at + 2] = 0;
        }
    }
    CanvasImage::new(data, SIDE, SIDE)
}

/// A white canvas with a thick horizontal stroke.
fn horizontal_stroke() -> CanvasImage {
    let mut data = vec![255u8; (SIDE * SIDE * 4) as usize];
    for y in SIDE / 2 - 10..SIDE / 2 + 10 {
        for x in SIDE / 8..SIDE - SIDE / 8 {
            let at = ((y * SIDE + x) * 4) as usize;
            data[at] = 0;
            data[at + 1] = 0;
            data[at + 2] = 0;
        }
    }
    CanvasImage::new(data, SIDE, SIDE)
}

/// An untouched canvas; the engine answers this one with an invalid-input
/// error while the worker keeps serving.
fn blank() -> CanvasImage {
    CanvasImage::new(vec![255u8; (SIDE * SIDE * 4) as usize], SIDE, SIDE)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(model_path) = env::args().nth(1) else {
        eprintln!("usage: digit-worker <path-to-mnist-onnx-model>");
        return ExitCode::FAILURE;
    };

    let (context, mut responses) =
        WorkerContext::<DigitModule>::spawn(FileModuleSource::new(model_path));

    // Submitted while the model is still loading; the worker buffers these
    // and replays them in order once it is ready.
    let samples = [vertical_stroke(), horizontal_stroke(), blank()];
    let mut remaining = 0usize;
    for sample in samples {
        match context.submit(sample) {
            Ok(id) => {
                println!("submitted {}", id);
                remaining += 1;
            }
            Err(e) => eprintln!("submit failed: {}", e),
        }
    }

    while remaining > 0 {
        let Some(response) = responses.next().await else {
            eprintln!("worker terminated before answering every request");
            return ExitCode::FAILURE;
        };
        remaining -= 1;

        let id = response.id();
        match response.into_result() {
            Ok(digit) => println!(
                "{} -> digit {} (scores {:?})",
                id,
                digit.label(),
                digit.scores()
            ),
            Err(err) => println!("{} -> {}", id, err),
        }
    }

    ExitCode::SUCCESS
}
