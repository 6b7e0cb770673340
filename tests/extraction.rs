mod common;

use std::fs;
use std::path::Path;

use anyhow::Result;
use tempfile::tempdir;
use vowelfeat::{
    AudioFeatureExtractor, ExtractionError, ExtractorConfig, FeatureCache, FeatureVector,
    ParameterizationKind,
};

const VOWELS: [&str; 4] = ["aa", "iy", "uw", "eh"];

fn extractor(coefficients: usize) -> AudioFeatureExtractor {
    let config = ExtractorConfig::new(
        coefficients,
        44_100,
        coefficients as u32 * 1000,
        VOWELS,
    );
    AudioFeatureExtractor::new(config).expect("valid config")
}

fn cache_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[test]
fn preprocess_from_file_has_predicted_length() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "aa_sine.wav");

    // 2 * round(50 * 44100 / 1000) = 4410 -> 4410 * 14000 / 44100 = 1400 -> diff 1399
    let signal = extractor(14).preprocess(&wav)?;
    assert_eq!(signal.len(), 1399);
    assert_eq!(signal.sample_rate, 14_000);
    Ok(())
}

#[test]
fn recordings_at_other_rates_are_brought_to_recorded_rate() -> Result<()> {
    let dir = tempdir()?;
    let wav = dir.path().join("iy_48k.wav");
    common::write_wav(&wav, &common::vowel_tone(48_000, 1.0), 48_000);

    let signal = extractor(14).preprocess(&wav)?;
    assert_eq!(signal.len(), 1399);
    Ok(())
}

#[test]
fn extract_twice_is_bit_identical_and_served_from_cache() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "uw_amanda.wav");
    let cache_dir = dir.path().join("cache");
    let cache = FeatureCache::new(&cache_dir);
    let extractor = extractor(14);

    for kind in [ParameterizationKind::Mfcc, ParameterizationKind::Lpc] {
        let first = extractor.extract(&wav, &cache, kind)?;
        let entry = cache.entry_path(&wav, kind, 14);
        assert!(entry.exists(), "miss should store {:?}", entry);

        let second = extractor.extract(&wav, &cache, kind)?;
        assert_eq!(first, second);
        assert_eq!(cache.lookup(&wav, kind, 14)?, Some(first));
    }
    assert_eq!(cache_entries(&cache_dir), 2);
    Ok(())
}

#[test]
fn cached_result_matches_direct_computation() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "eh_bob.wav");
    let cache = FeatureCache::new(dir.path().join("cache"));
    let extractor = extractor(14);

    for kind in [ParameterizationKind::Mfcc, ParameterizationKind::Lpc] {
        extractor.extract(&wav, &cache, kind)?;
        let cached = extractor.extract(&wav, &cache, kind)?;
        let direct = extractor.compute(&wav, kind)?;
        let diff = cached
            .max_abs_diff(&direct)
            .expect("cached and direct features share a shape");
        assert!(diff <= 1e-6, "{} diverged by {}", kind, diff);
    }
    Ok(())
}

#[test]
fn coefficient_count_fixes_output_dimension() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "aa_n.wav");
    let cache = FeatureCache::new(dir.path().join("cache"));

    for count in [8, 12, 16] {
        let extractor = extractor(count);
        let lpc = extractor.extract(&wav, &cache, ParameterizationKind::Lpc)?;
        let lpc = lpc.as_lpc().expect("LPC vector");
        assert_eq!(lpc.len(), count);

        let mfcc = extractor.extract(&wav, &cache, ParameterizationKind::Mfcc)?;
        let mfcc = mfcc.as_mfcc().expect("MFCC matrix");
        assert_eq!(mfcc.nrows(), count);
        assert!(mfcc.ncols() > 0);
    }
    Ok(())
}

#[test]
fn nonexistent_file_fails_without_cache_entry() {
    let dir = tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let cache = FeatureCache::new(&cache_dir);
    let missing = dir.path().join("oo_missing.wav");

    let err = extractor(14)
        .extract(&missing, &cache, ParameterizationKind::Lpc)
        .unwrap_err();
    assert!(matches!(err, ExtractionError::AudioLoad { .. }));
    assert_eq!(cache_entries(&cache_dir), 0);
}

#[test]
fn corrupt_file_is_audio_load_error() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("ae_bogus.wav");
    fs::write(&bogus, b"RIFF but not really a wave file").unwrap();

    let err = extractor(14).preprocess(&bogus).unwrap_err();
    assert!(matches!(err, ExtractionError::AudioLoad { .. }));
}

#[test]
fn missing_kind_fails_before_touching_files() {
    let err = ParameterizationKind::require(None).unwrap_err();
    assert!(matches!(err, ExtractionError::Configuration(_)));
    let err = ParameterizationKind::from_flags(false, false).unwrap_err();
    assert!(matches!(err, ExtractionError::Configuration(_)));
    assert!("".parse::<ParameterizationKind>().is_err());
}

#[test]
fn corrupted_cache_entry_is_recomputed_and_rewritten() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "iy_corrupt.wav");
    let cache = FeatureCache::new(dir.path().join("cache"));
    let extractor = extractor(14);

    let expected = extractor.extract(&wav, &cache, ParameterizationKind::Lpc)?;
    let entry = cache.entry_path(&wav, ParameterizationKind::Lpc, 14);
    fs::write(&entry, b"{\"kind\": \"lpc\", \"coeff")?;

    let recovered = extractor.extract(&wav, &cache, ParameterizationKind::Lpc)?;
    assert_eq!(recovered, expected);
    assert_eq!(
        cache.lookup(&wav, ParameterizationKind::Lpc, 14)?,
        Some(expected)
    );
    Ok(())
}

#[test]
fn unwritable_cache_still_returns_features() -> Result<()> {
    let dir = tempdir()?;
    let wav = common::write_fixture(dir.path(), "uh_nocache.wav");
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"occupied")?;
    let cache = FeatureCache::new(&blocker);

    let features = extractor(14).extract(&wav, &cache, ParameterizationKind::Lpc)?;
    assert!(matches!(features, FeatureVector::Lpc(ref v) if v.len() == 14));
    Ok(())
}

#[test]
fn one_hot_labels_cover_vocabulary() {
    let extractor = extractor(14);
    for (index, vowel) in VOWELS.iter().enumerate() {
        let label = extractor.encode_label(vowel).unwrap();
        assert_eq!(label.len(), VOWELS.len());
        for (slot, value) in label.iter().enumerate() {
            assert_eq!(*value, u8::from(slot == index));
        }
    }
    assert!(matches!(
        extractor.encode_label("oa"),
        Err(ExtractionError::UnknownVowel(_))
    ));
}
