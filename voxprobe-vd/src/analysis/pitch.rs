//! YIN fundamental-frequency tracker
//!
//! **Algorithm (per frame):**
//! 1. Difference function `d(τ) = e(0) + e(τ) - 2·r(τ)` over an integration
//!    window of `frame_length / 2` samples, with `r(τ)` computed as an FFT
//!    cross-correlation and `e(τ)` from prefix sums of squares
//! 2. Cumulative mean normalised difference `d'(τ)`
//! 3. First lag in `[sr/fmax, sr/fmin]` whose `d'` dips under the trough
//!    threshold, walked down to its local minimum
//! 4. Parabolic interpolation around that lag, `f0 = sr / period`
//!
//! Frames with no trough (unvoiced), silent frames, and estimates outside
//! `[fmin, fmax]` are left out of the contour.

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use serde::Deserialize;
use std::sync::Arc;

use super::FeatureError;

/// Pitch tracking parameters (`[pitch]` table)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Lowest accepted fundamental (Hz)
    pub fmin_hz: f64,
    /// Highest accepted fundamental (Hz)
    pub fmax_hz: f64,
    /// Analysis frame length (samples)
    pub frame_length: usize,
    /// Distance between successive frames (samples)
    pub hop_length: usize,
    /// `d'` value a trough must dip under to count as voiced
    pub trough_threshold: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            fmin_hz: 50.0,
            fmax_hz: 300.0,
            frame_length: 2048,
            hop_length: 512,
            trough_threshold: 0.1,
        }
    }
}

impl PitchConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if !(self.fmin_hz.is_finite() && self.fmax_hz.is_finite()) || self.fmin_hz <= 0.0 {
            return Err(FeatureError::InvalidConfig(
                "pitch band must be finite and positive".to_string(),
            ));
        }
        if self.fmin_hz >= self.fmax_hz {
            return Err(FeatureError::InvalidConfig(format!(
                "fmin_hz ({}) must be below fmax_hz ({})",
                self.fmin_hz, self.fmax_hz
            )));
        }
        if self.frame_length < 2 || self.hop_length == 0 {
            return Err(FeatureError::InvalidConfig(
                "frame_length must be >= 2 and hop_length > 0".to_string(),
            ));
        }
        if !(self.trough_threshold > 0.0 && self.trough_threshold < 1.0) {
            return Err(FeatureError::InvalidConfig(
                "trough_threshold must be in (0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}

/// YIN tracker bound to one sample rate
pub struct YinTracker {
    sample_rate: f64,
    fmin_hz: f64,
    fmax_hz: f64,
    hop_length: usize,
    trough_threshold: f64,
    tau_min: usize,
    tau_max: usize,
    /// Integration window
    window: usize,
    frame_length: usize,
    fft_length: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
}

impl YinTracker {
    pub fn new(config: &PitchConfig, sample_rate: u32) -> Result<Self, FeatureError> {
        config.validate()?;
        if sample_rate == 0 {
            return Err(FeatureError::InvalidSampleRate(sample_rate));
        }

        let sr = sample_rate as f64;
        let tau_min = ((sr / config.fmax_hz).floor() as usize).max(1);
        let tau_max = ((sr / config.fmin_hz).ceil() as usize).max(tau_min + 1);
        let window = (config.frame_length / 2).max(1);
        // Room for the largest lag plus the right-hand neighbour used by interpolation
        let frame_length = config.frame_length.max(window + tau_max + 2);
        let fft_length = (frame_length + window).next_power_of_two();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_length);
        let inverse = planner.plan_fft_inverse(fft_length);

        Ok(Self {
            sample_rate: sr,
            fmin_hz: config.fmin_hz,
            fmax_hz: config.fmax_hz,
            hop_length: config.hop_length,
            trough_threshold: config.trough_threshold,
            tau_min,
            tau_max,
            window,
            frame_length,
            fft_length,
            forward,
            inverse,
        })
    }

    /// Frame length actually used (may exceed the configured one at high sample rates)
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Pitch contour for a waveform, one value per voiced frame
    ///
    /// A waveform shorter than one frame is zero-padded into a single frame.
    pub fn track(&self, samples: &[f32]) -> Result<Vec<f64>, FeatureError> {
        if samples.is_empty() {
            return Err(FeatureError::EmptyWaveform);
        }

        let mut workspace = Workspace::new(self);
        let mut frame = vec![0.0f64; self.frame_length];
        let mut contour = Vec::new();

        if samples.len() <= self.frame_length {
            for (dst, src) in frame.iter_mut().zip(samples) {
                *dst = *src as f64;
            }
            contour.extend(self.estimate_frame(&frame, &mut workspace)?);
            return Ok(contour);
        }

        let mut start = 0;
        while start + self.frame_length <= samples.len() {
            for (dst, src) in frame.iter_mut().zip(&samples[start..start + self.frame_length]) {
                *dst = *src as f64;
            }
            contour.extend(self.estimate_frame(&frame, &mut workspace)?);
            start += self.hop_length;
        }

        Ok(contour)
    }

    /// f0 of one frame, or `None` when the frame is unvoiced or out of band
    fn estimate_frame(
        &self,
        frame: &[f64],
        ws: &mut Workspace,
    ) -> Result<Option<f64>, FeatureError> {
        let w = self.window;

        // Prefix sums of squares; energy of frame[s..s + w] is prefix[s + w] - prefix[s]
        ws.prefix[0] = 0.0;
        for (i, x) in frame.iter().enumerate() {
            ws.prefix[i + 1] = ws.prefix[i] + x * x;
        }

        let e0 = ws.prefix[w];
        if e0 <= f64::EPSILON {
            return Ok(None);
        }

        self.cross_correlate(frame, ws)?;

        // d(τ) and d'(τ) for τ in 0..=tau_max + 1
        let last = self.tau_max + 1;
        ws.cmnd[0] = 1.0;
        let mut running = 0.0;
        for tau in 1..=last {
            let e_tau = ws.prefix[tau + w] - ws.prefix[tau];
            let diff = (e0 + e_tau - 2.0 * ws.correlation[tau]).max(0.0);
            running += diff;
            ws.cmnd[tau] = if running > 0.0 {
                diff * tau as f64 / running
            } else {
                1.0
            };
        }

        let mut tau = self.tau_min;
        let found = loop {
            if tau > self.tau_max {
                break None;
            }
            if ws.cmnd[tau] < self.trough_threshold {
                while tau < self.tau_max && ws.cmnd[tau + 1] < ws.cmnd[tau] {
                    tau += 1;
                }
                break Some(tau);
            }
            tau += 1;
        };

        let Some(tau) = found else {
            return Ok(None);
        };

        let period = tau as f64 + parabolic_shift(ws.cmnd[tau - 1], ws.cmnd[tau], ws.cmnd[tau + 1]);
        if period <= 0.0 {
            return Ok(None);
        }

        let f0 = self.sample_rate / period;
        if f0 < self.fmin_hz || f0 > self.fmax_hz {
            return Ok(None);
        }

        Ok(Some(f0))
    }

    /// `ws.correlation[τ] = Σ_{j<w} frame[j]·frame[j+τ]`
    fn cross_correlate(&self, frame: &[f64], ws: &mut Workspace) -> Result<(), FeatureError> {
        ws.head.iter_mut().for_each(|v| *v = 0.0);
        ws.head[..self.window].copy_from_slice(&frame[..self.window]);
        self.forward
            .process(&mut ws.head, &mut ws.head_spectrum)
            .map_err(|e| FeatureError::Fft(e.to_string()))?;

        ws.full.iter_mut().for_each(|v| *v = 0.0);
        ws.full[..frame.len()].copy_from_slice(frame);
        self.forward
            .process(&mut ws.full, &mut ws.full_spectrum)
            .map_err(|e| FeatureError::Fft(e.to_string()))?;

        for (a, b) in ws.head_spectrum.iter_mut().zip(ws.full_spectrum.iter()) {
            *a = a.conj() * *b;
        }
        // DC and Nyquist bins of a real signal's spectrum are real
        if let Some(first) = ws.head_spectrum.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = ws.head_spectrum.last_mut() {
            last.im = 0.0;
        }

        self.inverse
            .process(&mut ws.head_spectrum, &mut ws.correlation)
            .map_err(|e| FeatureError::Fft(e.to_string()))?;

        let scale = 1.0 / self.fft_length as f64;
        ws.correlation.iter_mut().for_each(|v| *v *= scale);
        Ok(())
    }
}

/// Sub-sample offset of a parabola's vertex through three points, in [-1, 1]
fn parabolic_shift(left: f64, centre: f64, right: f64) -> f64 {
    let denom = left - 2.0 * centre + right;
    if denom.abs() <= f64::EPSILON {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-1.0, 1.0)
}

/// Scratch buffers reused across frames
struct Workspace {
    prefix: Vec<f64>,
    head: Vec<f64>,
    full: Vec<f64>,
    head_spectrum: Vec<Complex<f64>>,
    full_spectrum: Vec<Complex<f64>>,
    correlation: Vec<f64>,
    cmnd: Vec<f64>,
}

impl Workspace {
    fn new(tracker: &YinTracker) -> Self {
        Self {
            prefix: vec![0.0; tracker.frame_length + 1],
            head: tracker.forward.make_input_vec(),
            full: tracker.forward.make_input_vec(),
            head_spectrum: tracker.forward.make_output_vec(),
            full_spectrum: tracker.forward.make_output_vec(),
            correlation: tracker.inverse.make_output_vec(),
            cmnd: vec![0.0; tracker.tau_max + 2],
        }
    }
}
