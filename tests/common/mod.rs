#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Vowel-like test tone: a fundamental plus two formant-ish partials.
pub fn vowel_tone(sample_rate: u32, duration_secs: f32) -> Vec<f32> {
    let total_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..total_samples)
        .map(|index| {
            let t = index as f32 / sample_rate as f32;
            0.4 * (2.0 * PI * 140.0 * t).sin()
                + 0.2 * (2.0 * PI * 730.0 * t).sin()
                + 0.1 * (2.0 * PI * 1090.0 * t).sin()
        })
        .collect()
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .unwrap_or_else(|err| panic!("failed to create {:?}: {}", path, err));
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Write a two-second 44.1 kHz tone named `file_name` into `dir`.
pub fn write_fixture(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    write_wav(&path, &vowel_tone(44_100, 2.0), 44_100);
    path
}
