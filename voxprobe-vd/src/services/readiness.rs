//! Readiness prober
//!
//! One background warm-up runs at startup: it forces the codec registry and
//! probe into existence, checks that MP3 decoding is available, and runs the
//! feature extractor and classifier once over a synthetic tone, so the first
//! real request does not pay for that initialisation.
//!
//! The outcome is published exactly once into a [`Readiness`] cell. Requests
//! are never gated on it; `/ready` reports it.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration, Instant};
use symphonia::core::codecs::CODEC_TYPE_MP3;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::pipeline::DetectionPipeline;

/// Synthetic warm-up signal: 1 s of 220 Hz at 0.1 peak, 22.05 kHz
const WARMUP_SAMPLE_RATE: u32 = 22050;
const WARMUP_FREQUENCY_HZ: f64 = 220.0;
const WARMUP_AMPLITUDE: f64 = 0.1;

/// Successful warm-up summary
#[derive(Debug, Clone, PartialEq)]
pub struct WarmupReport {
    pub elapsed: Duration,
    /// Voiced frames found in the synthetic tone
    pub voiced_frames: usize,
}

/// Warm-up failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarmupError {
    #[error("codec not registered: {0}")]
    CodecUnavailable(&'static str),

    #[error("feature extraction failed: {0}")]
    Extraction(String),

    #[error("warm-up task aborted: {0}")]
    Aborted(String),
}

pub type WarmupOutcome = Result<WarmupReport, WarmupError>;

/// One-shot readiness cell
///
/// Written at most once (by the prober), read lock-free by anyone.
#[derive(Debug, Clone, Default)]
pub struct Readiness {
    outcome: Arc<OnceCell<WarmupOutcome>>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only after a successful warm-up; never reset
    pub fn is_ready(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(_)))
    }

    /// Published outcome, `None` while warm-up is still running
    pub fn outcome(&self) -> Option<&WarmupOutcome> {
        self.outcome.get()
    }

    /// Store the outcome; returns false if one was already stored
    pub fn publish(&self, outcome: WarmupOutcome) -> bool {
        self.outcome.set(outcome).is_ok()
    }
}

/// Run the warm-up synchronously
pub fn warm_up(pipeline: &DetectionPipeline) -> WarmupOutcome {
    let started = Instant::now();

    // Both registries are lazily built statics
    let _ = symphonia::default::get_probe();
    if symphonia::default::get_codecs()
        .get_codec(CODEC_TYPE_MP3)
        .is_none()
    {
        return Err(WarmupError::CodecUnavailable("mp3"));
    }

    let tone = synthetic_tone();
    let (features, _) = pipeline
        .classify_waveform(&tone, WARMUP_SAMPLE_RATE)
        .map_err(|e| WarmupError::Extraction(e.to_string()))?;

    Ok(WarmupReport {
        elapsed: started.elapsed(),
        voiced_frames: features.pitch_contour.len(),
    })
}

fn synthetic_tone() -> Vec<f32> {
    (0..WARMUP_SAMPLE_RATE)
        .map(|i| {
            let t = i as f64 / WARMUP_SAMPLE_RATE as f64;
            (WARMUP_AMPLITUDE * (2.0 * std::f64::consts::PI * WARMUP_FREQUENCY_HZ * t).sin()) as f32
        })
        .collect()
}

/// Spawn the supervised warm-up task
///
/// The warm-up itself runs on the blocking pool; the returned task observes
/// its result (including a panic) and publishes it. No retry, no timeout.
pub fn spawn_readiness_probe(
    readiness: Readiness,
    pipeline: Arc<DetectionPipeline>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Readiness probe: warming up audio pipeline");

        let outcome = match tokio::task::spawn_blocking(move || warm_up(&pipeline)).await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(WarmupError::Aborted(join_err.to_string())),
        };

        match &outcome {
            Ok(report) => info!(
                elapsed_ms = report.elapsed.as_millis() as u64,
                voiced_frames = report.voiced_frames,
                "Readiness probe: pipeline warm"
            ),
            Err(e) => error!(error = %e, "Readiness probe failed; service stays not-ready"),
        }

        if !readiness.publish(outcome) {
            warn!("Readiness outcome already published; ignoring second result");
        }
    })
}
