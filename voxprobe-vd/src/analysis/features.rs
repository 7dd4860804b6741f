//! Dispersion statistics used by the classifier
//!
//! - `pitch_variation`: standard deviation of the YIN pitch contour
//! - `energy_variation`: standard deviation of every raw sample amplitude
//!
//! Both use the population form (divide by N).

use super::pitch::{PitchConfig, YinTracker};
use super::FeatureError;

/// Features derived from one waveform
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// f0 estimate (Hz) per voiced frame, all within the configured band
    pub pitch_contour: Vec<f64>,
    pub pitch_variation: f64,
    pub energy_variation: f64,
}

/// Extract features from a mono waveform at its native sample rate
///
/// Degenerate contours: no voiced frame (e.g. silence) or a single frame
/// both yield `pitch_variation = 0.0`.
pub fn extract_features(
    samples: &[f32],
    sample_rate: u32,
    config: &PitchConfig,
) -> Result<FeatureSet, FeatureError> {
    if samples.is_empty() {
        return Err(FeatureError::EmptyWaveform);
    }

    let tracker = YinTracker::new(config, sample_rate)?;
    let pitch_contour = tracker.track(samples)?;

    let pitch_variation = std_dev(pitch_contour.iter().copied()).unwrap_or(0.0);
    let energy_variation = std_dev(samples.iter().map(|s| *s as f64)).unwrap_or(0.0);

    tracing::debug!(
        sample_rate,
        samples = samples.len(),
        voiced_frames = pitch_contour.len(),
        pitch_variation,
        energy_variation,
        "Features extracted"
    );

    Ok(FeatureSet {
        pitch_contour,
        pitch_variation,
        energy_variation,
    })
}

/// Population standard deviation; `None` for an empty sequence
///
/// Welford's online update keeps it accurate over long sample runs.
pub fn std_dev<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0u64;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for value in values {
        count += 1;
        let delta = value - mean;
        mean += delta / count as f64;
        m2 += delta * (value - mean);
    }

    if count == 0 {
        None
    } else {
        Some((m2 / count as f64).sqrt())
    }
}
