//! Core types for the vowel feature pipeline

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Mono audio signal together with the rate it is currently sampled at.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Audio samples, normalized to [-1.0, 1.0] on decode
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Spectral parameterization applied to a preprocessed signal.
///
/// There is deliberately no default: every extraction names its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterizationKind {
    Mfcc,
    Lpc,
}

impl ParameterizationKind {
    /// Upper-case name used in cache file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mfcc => "MFCC",
            Self::Lpc => "LPC",
        }
    }

    /// Resolve a kind from a pair of selector flags. Exactly one must be set.
    pub fn from_flags(mfcc: bool, lpc: bool) -> Result<Self> {
        match (mfcc, lpc) {
            (true, false) => Ok(Self::Mfcc),
            (false, true) => Ok(Self::Lpc),
            (false, false) => Err(ExtractionError::configuration(
                "parameterization kind required (MFCC or LPC)",
            )),
            (true, true) => Err(ExtractionError::configuration(
                "select exactly one parameterization kind, not both MFCC and LPC",
            )),
        }
    }

    /// Resolve an optional kind, failing when none was supplied.
    pub fn require(kind: Option<Self>) -> Result<Self> {
        kind.ok_or_else(|| ExtractionError::configuration("parameterization kind required"))
    }
}

impl fmt::Display for ParameterizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterizationKind {
    type Err = ExtractionError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mfcc" => Ok(Self::Mfcc),
            "lpc" => Ok(Self::Lpc),
            "" => Err(ExtractionError::configuration(
                "parameterization kind required",
            )),
            other => Err(ExtractionError::configuration(format!(
                "unknown parameterization kind '{}' (expected mfcc or lpc)",
                other
            ))),
        }
    }
}

/// Coefficients computed for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "coefficients", rename_all = "lowercase")]
pub enum FeatureVector {
    /// Shape (coefficient_count, num_frames).
    Mfcc(Array2<f32>),
    /// Length coefficient_count, leading unity term dropped.
    Lpc(Array1<f32>),
}

impl FeatureVector {
    pub fn kind(&self) -> ParameterizationKind {
        match self {
            Self::Mfcc(_) => ParameterizationKind::Mfcc,
            Self::Lpc(_) => ParameterizationKind::Lpc,
        }
    }

    /// Number of coefficients (first dimension for MFCC).
    pub fn coefficient_count(&self) -> usize {
        match self {
            Self::Mfcc(matrix) => matrix.len_of(Axis(0)),
            Self::Lpc(vector) => vector.len(),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Mfcc(matrix) => matrix.shape().to_vec(),
            Self::Lpc(vector) => vector.shape().to_vec(),
        }
    }

    pub fn as_mfcc(&self) -> Option<&Array2<f32>> {
        match self {
            Self::Mfcc(matrix) => Some(matrix),
            Self::Lpc(_) => None,
        }
    }

    pub fn as_lpc(&self) -> Option<&Array1<f32>> {
        match self {
            Self::Lpc(vector) => Some(vector),
            Self::Mfcc(_) => None,
        }
    }

    /// Row-major iterator over every coefficient.
    pub fn values(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match self {
            Self::Mfcc(matrix) => Box::new(matrix.iter().copied()),
            Self::Lpc(vector) => Box::new(vector.iter().copied()),
        }
    }

    /// Largest absolute element-wise difference, `None` when kinds or shapes differ.
    pub fn max_abs_diff(&self, other: &FeatureVector) -> Option<f32> {
        if self.kind() != other.kind() || self.shape() != other.shape() {
            return None;
        }
        Some(
            self.values()
                .zip(other.values())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f32, f32::max),
        )
    }
}

/// One-hot label for a vowel.
pub type LabelVector = Array1<u8>;
