use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::ExtractorConfig;
use crate::types::ParameterizationKind;

#[derive(Parser, Debug)]
#[command(
    name = "vowelfeat",
    version,
    about = "Extract MFCC/LPC features and one-hot labels from vowel recordings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the feature vector for one recording.
    Extract(ExtractArgs),
    /// Print the one-hot label for a vowel.
    Label(LabelArgs),
    /// Convert recordings named `<vowel>_<speaker>.wav` into a JSON dataset.
    Dataset(DatasetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// JSON extractor configuration; built-in 14 kHz / MFCC14 defaults when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<ExtractorConfig> {
        match &self.config {
            Some(path) => ExtractorConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path)),
            None => Ok(ExtractorConfig::default()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct KindArgs {
    /// Compute mel-frequency cepstral coefficients.
    #[arg(long)]
    pub mfcc: bool,
    /// Compute linear-prediction coefficients.
    #[arg(long)]
    pub lpc: bool,
}

impl KindArgs {
    pub fn kind(&self) -> Result<ParameterizationKind> {
        Ok(ParameterizationKind::from_flags(self.mfcc, self.lpc)?)
    }
}

#[derive(Args, Debug, Clone)]
pub struct CacheArgs {
    /// Directory holding cached feature arrays.
    #[arg(long = "cache-dir", value_name = "DIR", default_value = ".vowelfeat-cache")]
    pub cache_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Recording to parameterize.
    #[arg(value_name = "WAV")]
    pub input: PathBuf,
    #[command(flatten)]
    pub kind: KindArgs,
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// Vowel symbol from the configured vocabulary.
    pub vowel: String,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Recordings to convert.
    #[arg(value_name = "WAV", required = true)]
    pub inputs: Vec<PathBuf>,
    /// Destination JSON file.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,
    #[command(flatten)]
    pub kind: KindArgs,
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(flatten)]
    pub cache: CacheArgs,
}
