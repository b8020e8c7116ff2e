use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vanban_ai::{Classify, GeminiClassifier, GeminiConfig, StaticClassifier};
use vanban_core::RawDocument;
use vanban_pipeline::{Pipeline, PipelineConfig};

/// Segment a Vietnamese administrative document into metadata-tagged
/// markdown blocks.
#[derive(Parser, Debug)]
#[command(name = "vanban", version, about)]
struct Args {
    /// Input text file (already converted from PDF/DOCX).
    input: PathBuf,

    /// Write markdown here instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pipeline configuration as JSON; defaults are built in.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gemini API key for the external classification fallback.
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// Skip the external classifier entirely; inconclusive documents
    /// get the fallback category.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("vanban v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<PipelineConfig>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    let body = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let doc = RawDocument::new(&body, &filename);

    let markdown = match (args.offline, args.api_key) {
        (false, Some(api_key)) => {
            let gemini = GeminiClassifier::new(GeminiConfig {
                api_key,
                ..GeminiConfig::default()
            })?;
            run(config, gemini, &doc).await?
        }
        _ => {
            if !args.offline {
                tracing::warn!("no API key; running with the offline classifier");
            }
            run(config, StaticClassifier::failing(), &doc).await?
        }
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{markdown}"),
    }

    Ok(())
}

async fn run<C: Classify>(
    config: PipelineConfig,
    classifier: C,
    doc: &RawDocument,
) -> anyhow::Result<String> {
    let pipeline = Pipeline::new(config, classifier).context("compiling pipeline configuration")?;
    let output = pipeline.run(doc).await;

    for warning in &output.warnings {
        tracing::warn!("{warning}");
    }
    eprintln!(
        "  {} blocks, category {} ({})",
        output.blocks.len(),
        output.category,
        output.provenance.as_str()
    );

    Ok(output.to_markdown())
}
