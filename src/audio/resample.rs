use std::iter;

use rubato::{FftFixedIn, Resampler};

use crate::error::{ExtractionError, Result};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;
/// Minimum edge extension on each side, in source samples.
const MIN_EDGE_PAD: usize = 1024;

/// Number of samples produced when resampling `len` samples between rates.
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    if source_rate == target_rate {
        return len;
    }
    (len as f64 * target_rate as f64 / source_rate as f64).round() as usize
}

/// Band-limited resample of `samples` from `source_rate` to `target_rate`.
///
/// The anti-aliasing cutoff sits at the lower of the two Nyquist rates. The
/// filter delay is removed, so output sample `i` lines up with time
/// `i / target_rate` of the input.
pub fn sinc_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == 0 || target_rate == 0 {
        return Err(ExtractionError::configuration(
            "sample rates must be positive for resampling",
        ));
    }
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let output_len = resampled_len(samples.len(), source_rate, target_rate);
    let divisor = gcd(source_rate, target_rate) as usize;
    let step_in = source_rate as usize / divisor;
    let step_out = target_rate as usize / divisor;
    // Whole rate periods, so the padding maps to an exact number of output samples.
    let pad_in = (MIN_EDGE_PAD + step_in - 1) / step_in * step_in;
    let pad_out = pad_in / step_in * step_out;

    // Edges are extended with the boundary samples so the filter never sees a
    // step down to silence.
    let first = samples[0];
    let last = samples[samples.len() - 1];
    let padded: Vec<f32> = iter::repeat(first)
        .take(pad_in)
        .chain(samples.iter().copied())
        .chain(iter::repeat(last).take(pad_in))
        .collect();

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
    )
    .map_err(|err| ExtractionError::Resample(err.to_string()))?;

    let skip = resampler.output_delay() + pad_out;
    let wanted = skip + output_len;
    let mut output = Vec::with_capacity(wanted + CHUNK_SIZE);
    let mut position = 0;
    while output.len() < wanted {
        let needed = resampler.input_frames_next();
        let end = (position + needed).min(padded.len());
        let mut chunk = padded[position..end].to_vec();
        chunk.resize(needed, 0.0);
        position = end;

        let waves_in = vec![chunk];
        let processed = resampler
            .process(&waves_in, None)
            .map_err(|err| ExtractionError::Resample(err.to_string()))?;
        output.extend_from_slice(&processed[0]);
    }
    Ok(output[skip..wanted].to_vec())
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::{gcd, resampled_len, sinc_resample};
    use std::f32::consts::PI;

    fn tone(frequency: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn output_length_rounds_rate_ratio() {
        assert_eq!(resampled_len(4410, 44_100, 14_000), 1400);
        assert_eq!(resampled_len(1000, 48_000, 16_000), 333);
        assert_eq!(resampled_len(1001, 44_100, 44_100), 1001);
        assert_eq!(gcd(44_100, 14_000), 700);
    }

    #[test]
    fn sinc_resample_has_predicted_length() {
        let input = tone(440.0, 0.5, 44_100, 4410);
        let output = sinc_resample(&input, 44_100, 14_000).unwrap();
        assert_eq!(output.len(), 1400);
        assert!(output.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn constant_signal_stays_constant_from_first_sample() {
        let output = sinc_resample(&vec![1.0; 4410], 44_100, 14_000).unwrap();
        for (index, sample) in output.iter().enumerate() {
            assert!(
                (sample - 1.0).abs() < 0.01,
                "sample {} drifted to {}",
                index,
                sample
            );
        }
    }

    #[test]
    fn tone_above_target_nyquist_is_removed() {
        let input = tone(10_000.0, 1.0, 44_100, 4410);
        let output = sinc_resample(&input, 44_100, 14_000).unwrap();
        assert!(rms(&input) > 0.7);
        assert!(rms(&output) < 0.05, "alias leaked with rms {}", rms(&output));
    }

    #[test]
    fn in_band_tone_keeps_amplitude_and_phase() {
        let input = tone(1_000.0, 0.5, 44_100, 4410);
        let output = sinc_resample(&input, 44_100, 14_000).unwrap();
        let expected = tone(1_000.0, 0.5, 14_000, output.len());
        for index in 40..output.len() - 40 {
            assert!(
                (output[index] - expected[index]).abs() < 0.02,
                "sample {}: {} vs {}",
                index,
                output[index],
                expected[index]
            );
        }
    }

    #[test]
    fn sinc_resample_is_deterministic() {
        let input = tone(300.0, 0.8, 48_000, 2000);
        let first = sinc_resample(&input, 48_000, 16_000).unwrap();
        let second = sinc_resample(&input, 48_000, 16_000).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn same_rate_is_passthrough() {
        let input = vec![0.25, -0.5, 0.75];
        assert_eq!(sinc_resample(&input, 16_000, 16_000).unwrap(), input);
    }

    #[test]
    fn rejects_zero_rates() {
        assert!(sinc_resample(&[0.0; 4], 0, 16_000).is_err());
        assert!(sinc_resample(&[0.0; 4], 16_000, 0).is_err());
    }
}
