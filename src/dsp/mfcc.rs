use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;
use ndarray::Array2;

use crate::error::{ExtractionError, Result};

const WINDOW_MS: usize = 25;
const HOP_MS: usize = 10;
const MEL_BANDS: usize = 26;
const MIN_FREQ: f64 = 20.0;
// Mel energy floor; keeps the log of an empty band finite.
const MEL_FLOOR: f64 = 1e-10;

/// STFT framing used for MFCC analysis at a given sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfccSettings {
    pub sample_rate: u32,
    pub coefficient_count: usize,
}

impl MfccSettings {
    pub fn fft_size(&self) -> usize {
        ((self.sample_rate as usize * WINDOW_MS) / 1000).max(1)
    }

    pub fn hop_size(&self) -> usize {
        ((self.sample_rate as usize * HOP_MS) / 1000).max(1)
    }

    /// Mel bands never fewer than requested coefficients.
    pub fn mel_bands(&self) -> usize {
        MEL_BANDS.max(self.coefficient_count)
    }
}

/// Compute an MFCC matrix of shape (coefficient_count, num_frames).
///
/// Frames use a 25 ms Hann window with a 10 ms hop; the mel filterbank spans
/// 20 Hz to Nyquist of `settings.sample_rate`.
pub fn mfcc(samples: &[f32], settings: MfccSettings) -> Result<Array2<f32>> {
    let fft_size = settings.fft_size();
    let hop_size = settings.hop_size();
    if samples.len() < fft_size {
        return Err(ExtractionError::SignalTooShort {
            analysis: "MFCC",
            len: samples.len(),
            required: fft_size,
        });
    }

    let audio_f64: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let stft = spectrum::rstft(&audio_f64, fft_size, hop_size, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let power = analysis::make_power_spectrogram(&magnitude);

    let freqs = spectrum::rfftfreq(fft_size, settings.sample_rate);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        (settings.sample_rate as f64) / 2.0,
        settings.mel_bands(),
        &freqs,
        true,
    );
    let mut mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);
    mel.iter_mut()
        .flatten()
        .for_each(|energy| *energy = energy.max(MEL_FLOOR));
    let per_frame = analysis::mel::mfcc_spectrogram(&mel, settings.coefficient_count, None);

    coefficients_by_frame(&per_frame, settings.coefficient_count)
}

/// Transpose frame-major rows into a (coefficient, frame) matrix.
fn coefficients_by_frame(per_frame: &[Vec<f64>], coefficient_count: usize) -> Result<Array2<f32>> {
    if let Some(row) = per_frame.iter().find(|row| row.len() != coefficient_count) {
        return Err(ExtractionError::configuration(format!(
            "MFCC backend returned {} coefficients per frame, expected {}",
            row.len(),
            coefficient_count
        )));
    }
    Ok(Array2::from_shape_fn(
        (coefficient_count, per_frame.len()),
        |(coefficient, frame)| per_frame[frame][coefficient] as f32,
    ))
}
