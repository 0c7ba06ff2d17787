use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use compath_core::config::{resolve_with_base, Config, Settings};
use compath_core::source_loader::{discover_providers, load_sources};
use compath_core::traits::{NoProgress, ProgressObserver, SourceProvider};
use compath_similarity::{ProgressBarObserver, SimilarityEngine, TsvReportWriter};

/// Pairwise pathway similarity between gene set databases
#[derive(Parser, Debug)]
#[command(name = "compath", version, about, long_about = None)]
struct Cli {
    /// Directory holding one `.gmt` file per database
    #[arg(short, long)]
    input_dir: Option<String>,

    /// Directory receiving one `<a>_<b>.tsv` report per database pair
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Minimum overlap coefficient for a pathway pair to be reported
    #[arg(long)]
    min_gene_set_similarity: Option<f64>,

    /// Minimum similarity between the two database names
    #[arg(long)]
    min_string_similarity: Option<f64>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(dir) = &self.input_dir { settings.input_dir = dir.clone(); }
        if let Some(dir) = &self.output_dir { settings.output_dir = dir.clone(); }
        if let Some(v) = self.min_gene_set_similarity { settings.min_gene_set_similarity = v; }
        if let Some(v) = self.min_string_similarity { settings.min_string_similarity = v; }
        if self.no_progress { settings.progress = false; }
        settings
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose { 0 => "info", 1 => "debug", _ => "trace" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.apply(Config::load().and_then(|c| c.settings()).context("loading configuration")?);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let input_dir = resolve_with_base(&cwd, &settings.input_dir);
    let output_dir = resolve_with_base(&cwd, &settings.output_dir);
    if !(0.0..=1.0).contains(&settings.min_gene_set_similarity) || !(0.0..=1.0).contains(&settings.min_string_similarity) {
        warn!(
            gene_set = settings.min_gene_set_similarity,
            string = settings.min_string_similarity,
            "threshold outside [0, 1]; filter keeps everything or nothing"
        );
    }

    let providers = discover_providers(&input_dir).with_context(|| format!("discovering sources in {}", input_dir.display()))?;
    for provider in &providers { debug!(source = provider.name(), path = %provider.path().display(), "discovered source"); }
    let sources = load_sources(&providers).context("loading sources")?;
    info!(populated = sources.len(), discovered = providers.len(), "sources ready");

    let engine = SimilarityEngine::new(settings.min_gene_set_similarity, settings.min_string_similarity);
    let mut writer = TsvReportWriter::new(&output_dir);
    let mut observer: Box<dyn ProgressObserver> = if settings.progress { Box::new(ProgressBarObserver::new()) } else { Box::new(NoProgress) };
    let matrices = engine
        .compute(&sources, &mut writer, observer.as_mut())
        .context("computing similarity matrices")?;

    for (report, path) in matrices.iter().zip(writer.written()) {
        println!("{} vs {}: {} rows -> {}", report.pair.a, report.pair.b, report.len(), path.display());
    }
    println!("✅ Wrote {} reports to {}", matrices.len(), writer.directory().display());
    Ok(())
}
