mod labels;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::audio::{self, resample};
use crate::cache::FeatureCache;
use crate::config::ExtractorConfig;
use crate::dsp::{self, MfccSettings};
use crate::error::{ExtractionError, Result};
use crate::types::{AudioSignal, FeatureVector, LabelVector, ParameterizationKind};

/// Turns vowel recordings into MFCC/LPC feature vectors and vowels into labels.
#[derive(Debug, Clone)]
pub struct AudioFeatureExtractor {
    config: ExtractorConfig,
}

impl AudioFeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        info!(
            coefficient_count = config.coefficient_count,
            recorded_sampling_rate = config.recorded_sampling_rate,
            target_sampling_rate = config.target_sampling_rate,
            vowels = config.vowel_vocabulary.len(),
            "feature extractor configured"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Load `path` at the recorded rate and run the windowing pipeline.
    pub fn preprocess(&self, path: &Path) -> Result<AudioSignal> {
        let raw = audio::load_at_rate(path, self.config.recorded_sampling_rate)?;
        self.preprocess_signal(&raw)
    }

    /// Window around the midpoint, resample to the target rate and optionally
    /// take the first difference.
    ///
    /// `signal` must already be at the recorded sampling rate.
    pub fn preprocess_signal(&self, signal: &AudioSignal) -> Result<AudioSignal> {
        if signal.sample_rate != self.config.recorded_sampling_rate {
            return Err(ExtractionError::configuration(format!(
                "signal is sampled at {} Hz, expected the recorded rate of {} Hz",
                signal.sample_rate, self.config.recorded_sampling_rate
            )));
        }

        let windowed = midpoint_window(&signal.samples, self.config.window_samples());
        let mut samples = resample::sinc_resample(
            windowed,
            self.config.recorded_sampling_rate,
            self.config.target_sampling_rate,
        )?;
        if self.config.preprocess.high_frequency_heuristic {
            samples = first_difference(&samples);
        }
        debug!(
            input = signal.len(),
            windowed = windowed.len(),
            output = samples.len(),
            "preprocessed signal"
        );
        Ok(AudioSignal::new(samples, self.config.target_sampling_rate))
    }

    /// Features for `path`, served from `cache` when possible.
    ///
    /// On a miss the result is computed and stored. A failed store is logged
    /// and the computed features are still returned.
    pub fn extract(
        &self,
        path: &Path,
        cache: &FeatureCache,
        kind: ParameterizationKind,
    ) -> Result<FeatureVector> {
        let count = self.config.coefficient_count;
        match cache.lookup(path, kind, count) {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(err @ ExtractionError::CacheCorruption { .. }) => {
                warn!(error = %err, "discarding unreadable cache entry; recomputing");
            }
            Err(err) => return Err(err),
        }

        let features = self.compute(path, kind)?;
        if let Err(err) = cache.store(path, kind, count, &features) {
            warn!(error = %err, "failed to persist features; continuing without cache");
        }
        Ok(features)
    }

    /// Features for `path` without consulting or updating any cache.
    pub fn compute(&self, path: &Path, kind: ParameterizationKind) -> Result<FeatureVector> {
        let signal = self.preprocess(path)?;
        debug!(path = %path.display(), %kind, "computing features");
        self.parameterize(&signal, kind)
    }

    /// Apply `kind` to an already preprocessed signal.
    pub fn parameterize(
        &self,
        signal: &AudioSignal,
        kind: ParameterizationKind,
    ) -> Result<FeatureVector> {
        let count = self.config.coefficient_count;
        match kind {
            ParameterizationKind::Mfcc => {
                let settings = MfccSettings {
                    sample_rate: signal.sample_rate,
                    coefficient_count: count,
                };
                dsp::mfcc(&signal.samples, settings).map(FeatureVector::Mfcc)
            }
            ParameterizationKind::Lpc => {
                dsp::lpc_coefficients(&signal.samples, count).map(FeatureVector::Lpc)
            }
        }
    }

    /// One-hot label for `vowel`; vowels outside the vocabulary are an error.
    pub fn encode_label(&self, vowel: &str) -> Result<LabelVector> {
        labels::one_hot(&self.config.vowel_vocabulary, vowel)
    }
}

/// `[mid - half_width, mid + half_width)` clamped to the signal bounds.
fn midpoint_window(samples: &[f32], half_width: usize) -> &[f32] {
    let midpoint = samples.len() / 2;
    let start = midpoint.saturating_sub(half_width);
    let end = (midpoint + half_width).min(samples.len());
    &samples[start..end]
}

fn first_difference(samples: &[f32]) -> Vec<f32> {
    samples.windows(2).map(|pair| pair[1] - pair[0]).collect()
}
