//! Error kinds surfaced by the feature pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the extraction pipeline.
pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Source recording is missing, unreadable or not decodable.
    #[error("failed to load audio from {path}: {message}")]
    AudioLoad { path: PathBuf, message: String },

    /// Caller supplied an invalid configuration or request.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown vowel '{0}' is not part of the configured vocabulary")]
    UnknownVowel(String),

    /// A cache entry exists but could not be deserialized.
    #[error("cache entry {path} is corrupt: {message}")]
    CacheCorruption { path: PathBuf, message: String },

    #[error("failed to write cache entry {path}: {message}")]
    CacheWrite { path: PathBuf, message: String },

    #[error("resampling failed: {0}")]
    Resample(String),

    /// Preprocessed signal is too short for the requested analysis.
    #[error("signal of {len} samples is too short for {analysis} (needs at least {required})")]
    SignalTooShort {
        analysis: &'static str,
        len: usize,
        required: usize,
    },
}

impl ExtractionError {
    pub fn audio_load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::AudioLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn cache_write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::CacheWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn cache_corruption(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::CacheCorruption {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
