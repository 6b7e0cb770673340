use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{ExtractionError, Result};

const MS_PER_SEC: u32 = 1000;

/// Window and re-emphasis settings applied before parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Milliseconds kept on each side of the recording's midpoint.
    pub window_ms: u32,
    /// Replace the resampled signal with its first difference.
    pub high_frequency_heuristic: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            window_ms: 50,
            high_frequency_heuristic: true,
        }
    }
}

/// Extractor configuration, immutable once an extractor owns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractorConfig {
    /// Number of MFCC/LPC coefficients; designed around one per kHz of target rate.
    pub coefficient_count: usize,
    pub recorded_sampling_rate: u32,
    pub target_sampling_rate: u32,
    /// Index in this list is the vowel's permanent one-hot slot.
    pub vowel_vocabulary: Vec<String>,
    #[serde(default)]
    pub preprocess: PreprocessOptions,
}

impl ExtractorConfig {
    pub fn new(
        coefficient_count: usize,
        recorded_sampling_rate: u32,
        target_sampling_rate: u32,
        vowel_vocabulary: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            coefficient_count,
            recorded_sampling_rate,
            target_sampling_rate,
            vowel_vocabulary: vowel_vocabulary.into_iter().map(Into::into).collect(),
            preprocess: PreprocessOptions::default(),
        }
    }

    pub fn with_preprocess(mut self, preprocess: PreprocessOptions) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ExtractionError::configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| {
            ExtractionError::configuration(format!("failed to parse config JSON: {}", err))
        })
    }

    /// Reject unusable values; a rate/coefficient mismatch only warns.
    pub fn validate(&self) -> Result<()> {
        if self.coefficient_count == 0 {
            return Err(ExtractionError::configuration(
                "coefficient_count must be positive",
            ));
        }
        if self.recorded_sampling_rate == 0 {
            return Err(ExtractionError::configuration(
                "recorded_sampling_rate must be positive",
            ));
        }
        if self.target_sampling_rate == 0 {
            return Err(ExtractionError::configuration(
                "target_sampling_rate must be positive",
            ));
        }
        if self.preprocess.window_ms == 0 {
            return Err(ExtractionError::configuration("window_ms must be positive"));
        }
        if self.vowel_vocabulary.is_empty() {
            return Err(ExtractionError::configuration(
                "vowel_vocabulary must contain at least one vowel",
            ));
        }
        let mut seen = HashSet::with_capacity(self.vowel_vocabulary.len());
        for vowel in &self.vowel_vocabulary {
            if !seen.insert(vowel.as_str()) {
                return Err(ExtractionError::configuration(format!(
                    "vowel_vocabulary contains duplicate entry '{}'",
                    vowel
                )));
            }
        }

        let expected_rate = self.coefficient_count as u64 * MS_PER_SEC as u64;
        if self.target_sampling_rate as u64 != expected_rate {
            warn!(
                coefficient_count = self.coefficient_count,
                target_sampling_rate = self.target_sampling_rate,
                expected_rate,
                "target sampling rate does not give one coefficient per kHz"
            );
        }
        Ok(())
    }

    /// Samples kept on each side of the midpoint at the recorded rate.
    pub fn window_samples(&self) -> usize {
        (self.preprocess.window_ms as f64 * self.recorded_sampling_rate as f64
            / MS_PER_SEC as f64)
            .round() as usize
    }
}

impl Default for ExtractorConfig {
    /// MFCC14/LPC14 at 14 kHz over 44.1 kHz recordings, Hillenbrand vowel names.
    fn default() -> Self {
        Self::new(
            14,
            44_100,
            14_000,
            [
                "ae", "ah", "aw", "eh", "ei", "er", "ih", "iy", "oa", "oo", "uh", "uw",
            ],
        )
    }
}
