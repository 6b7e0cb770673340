//! Batch conversion of labelled recordings into training examples.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cache::FeatureCache;
use crate::extractor::AudioFeatureExtractor;
use crate::types::{FeatureVector, LabelVector, ParameterizationKind};

/// Feature/label pair for one recording.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledExample {
    pub source: PathBuf,
    pub vowel: String,
    pub features: FeatureVector,
    pub label: LabelVector,
}

/// Vowel symbol encoded in a Hillenbrand-style file name (`aa_speaker.wav` -> `aa`).
pub fn vowel_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("cannot read a file name from {:?}", path))?;
    match stem.split_once('_') {
        Some((vowel, _)) if !vowel.is_empty() => Ok(vowel.to_string()),
        _ => Err(anyhow!(
            "file name {:?} does not start with a '<vowel>_' prefix",
            stem
        )),
    }
}

/// Extract features and labels for every file in `paths`, in order.
pub fn build_dataset<P: AsRef<Path>>(
    extractor: &AudioFeatureExtractor,
    cache: &FeatureCache,
    paths: &[P],
    kind: ParameterizationKind,
) -> Result<Vec<LabeledExample>> {
    let mut examples = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let vowel = vowel_from_path(path)?;
        let label = extractor
            .encode_label(&vowel)
            .with_context(|| format!("failed to label {:?}", path))?;
        let features = extractor
            .extract(path, cache, kind)
            .with_context(|| format!("failed to extract {} features from {:?}", kind, path))?;
        examples.push(LabeledExample {
            source: path.to_path_buf(),
            vowel,
            features,
            label,
        });
    }
    info!(examples = examples.len(), %kind, "dataset assembled");
    Ok(examples)
}

/// Write `examples` as a JSON array.
pub fn write_dataset(examples: &[LabeledExample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create dataset file {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, examples).context("Failed to serialize dataset")?;
    writer.flush().context("Failed to flush dataset file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::vowel_from_path;
    use std::path::Path;

    #[test]
    fn vowel_is_file_name_prefix() {
        assert_eq!(
            vowel_from_path(Path::new("wav_data/Vowels_Amanda/aa_amanda.wav")).unwrap(),
            "aa"
        );
        assert_eq!(vowel_from_path(Path::new("uw_b_2.wav")).unwrap(), "uw");
    }

    #[test]
    fn rejects_names_without_prefix() {
        assert!(vowel_from_path(Path::new("amanda.wav")).is_err());
        assert!(vowel_from_path(Path::new("_amanda.wav")).is_err());
    }
}
