use ndarray::Array1;

use crate::error::{ExtractionError, Result};
use crate::types::LabelVector;

/// One-hot vector for `vowel`, slot given by its vocabulary index.
pub fn one_hot(vocabulary: &[String], vowel: &str) -> Result<LabelVector> {
    let index = vocabulary
        .iter()
        .position(|entry| entry == vowel)
        .ok_or_else(|| ExtractionError::UnknownVowel(vowel.to_string()))?;
    let mut label = Array1::zeros(vocabulary.len());
    label[index] = 1;
    Ok(label)
}
