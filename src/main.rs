use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vowelfeat::cli::{Cli, Command, DatasetArgs, ExtractArgs, LabelArgs};
use vowelfeat::{dataset, AudioFeatureExtractor, FeatureCache, FeatureVector};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => handle_extract(&args),
        Command::Label(args) => handle_label(&args),
        Command::Dataset(args) => handle_dataset(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_extract(args: &ExtractArgs) -> Result<()> {
    let kind = args.kind.kind()?;
    let extractor = AudioFeatureExtractor::new(args.config.load()?)?;
    let cache = FeatureCache::new(&args.cache.cache_dir);
    let features = extractor
        .extract(&args.input, &cache, kind)
        .with_context(|| format!("Failed to extract features from {:?}", args.input))?;

    println!("{} shape: {:?}", kind, features.shape());
    match &features {
        FeatureVector::Mfcc(matrix) => {
            for row in matrix.outer_iter() {
                println!("{}", format_row(row.iter().copied()));
            }
        }
        FeatureVector::Lpc(vector) => println!("{}", format_row(vector.iter().copied())),
    }
    Ok(())
}

fn handle_label(args: &LabelArgs) -> Result<()> {
    let extractor = AudioFeatureExtractor::new(args.config.load()?)?;
    let label = extractor.encode_label(&args.vowel)?;
    println!("{}", label);
    Ok(())
}

fn handle_dataset(args: &DatasetArgs) -> Result<()> {
    let kind = args.kind.kind()?;
    let extractor = AudioFeatureExtractor::new(args.config.load()?)?;
    let cache = FeatureCache::new(&args.cache.cache_dir);
    let examples = dataset::build_dataset(&extractor, &cache, &args.inputs, kind)?;
    dataset::write_dataset(&examples, &args.output)?;
    println!(
        "Wrote {} {} examples to {:?}",
        examples.len(),
        kind,
        args.output
    );
    Ok(())
}

fn format_row(values: impl Iterator<Item = f32>) -> String {
    values
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join(" ")
}
