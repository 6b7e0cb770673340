//! On-disk memoization of feature vectors.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::types::{FeatureVector, ParameterizationKind};

const ENTRY_EXTENSION: &str = "json";

/// Directory of serialized feature arrays, one file per
/// `{file_name}_{KIND}_{coefficient_count}.json` key.
///
/// Keys use the source file's name (extension included) and ignore its
/// directory, so recordings that share a file name in different directories
/// share an entry.
#[derive(Debug, Clone)]
pub struct FeatureCache {
    root: PathBuf,
}

impl FeatureCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache key (file name) for a source recording.
    pub fn key(source_path: &Path, kind: ParameterizationKind, coeff_count: usize) -> String {
        let basename = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "{}_{}_{}.{}",
            basename,
            kind.name(),
            coeff_count,
            ENTRY_EXTENSION
        )
    }

    pub fn entry_path(
        &self,
        source_path: &Path,
        kind: ParameterizationKind,
        coeff_count: usize,
    ) -> PathBuf {
        self.root.join(Self::key(source_path, kind, coeff_count))
    }

    /// Stored vector for the key, `None` when no entry exists.
    pub fn lookup(
        &self,
        source_path: &Path,
        kind: ParameterizationKind,
        coeff_count: usize,
    ) -> Result<Option<FeatureVector>> {
        let path = self.entry_path(source_path, kind, coeff_count);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ExtractionError::cache_corruption(&path, err)),
        };
        let vector: FeatureVector = serde_json::from_slice(&bytes)
            .map_err(|err| ExtractionError::cache_corruption(&path, err))?;
        if vector.kind() != kind || vector.coefficient_count() != coeff_count {
            return Err(ExtractionError::cache_corruption(
                &path,
                format!(
                    "entry holds {} with {} coefficients",
                    vector.kind(),
                    vector.coefficient_count()
                ),
            ));
        }
        debug!(path = %path.display(), "cache hit");
        Ok(Some(vector))
    }

    /// Persist `vector`, replacing any existing entry for the key.
    ///
    /// The entry is written to a temporary file in the cache directory and
    /// renamed into place, so readers never observe a partial write.
    pub fn store(
        &self,
        source_path: &Path,
        kind: ParameterizationKind,
        coeff_count: usize,
        vector: &FeatureVector,
    ) -> Result<PathBuf> {
        let path = self.entry_path(source_path, kind, coeff_count);
        fs::create_dir_all(&self.root)
            .map_err(|err| ExtractionError::cache_write(&path, err))?;
        let staging = NamedTempFile::new_in(&self.root)
            .map_err(|err| ExtractionError::cache_write(&path, err))?;
        {
            let mut writer = BufWriter::new(staging.as_file());
            serde_json::to_writer(&mut writer, vector)
                .map_err(|err| ExtractionError::cache_write(&path, err))?;
            writer
                .flush()
                .map_err(|err| ExtractionError::cache_write(&path, err))?;
        }
        staging
            .persist(&path)
            .map_err(|err| ExtractionError::cache_write(&path, err.error))?;
        debug!(path = %path.display(), "cache entry stored");
        Ok(path)
    }
}
