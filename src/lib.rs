//! Vowel feature extraction: MFCC/LPC coefficients and one-hot labels from
//! short vowel recordings, memoized on disk.

pub mod audio;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod dsp;
pub mod error;
pub mod extractor;
pub mod types;

pub use cache::FeatureCache;
pub use config::{ExtractorConfig, PreprocessOptions};
pub use error::{ExtractionError, Result};
pub use extractor::AudioFeatureExtractor;
pub use types::{AudioSignal, FeatureVector, LabelVector, ParameterizationKind};
