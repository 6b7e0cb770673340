//! Numeric collaborators: cepstral and linear-prediction analysis.

mod lpc;
mod mfcc;

pub use lpc::{lpc_burg, lpc_coefficients};
pub use mfcc::{mfcc, MfccSettings};
