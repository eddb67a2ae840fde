//! litesub CLI: extract a subtitle track from a Matroska file, translate
//! it, and write the result to disk (or reuse a cached translation).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use litesub::backend::{build_backend, ProviderConfig};
use litesub::config::AppConfig;
use litesub::config_file::ConfigFile;
use litesub::host::HostCollaborator;
use litesub::progress::ProgressUpdate;
use litesub::subtitle::SubtitleFormat;
use litesub::{JobRequest, LitesubError, Orchestrator, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "litesub", version = VERSION, about = "Extract, translate, and publish MKV subtitle tracks")]
struct Cli {
    /// Path to the source Matroska (.mkv) file
    input: PathBuf,

    /// Zero-based index into the file's subtitle tracks (not the global track number)
    #[arg(long, default_value_t = 0)]
    track: usize,

    /// Source language code (e.g. "en")
    #[arg(long, default_value = "en")]
    from: String,

    /// Target language code (e.g. "fr")
    #[arg(long)]
    to: String,

    /// Output file path; defaults to `<input>.<to>.<ext>`
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output subtitle format: srt, ass, ssa, vtt. Defaults to the source
    /// track's own format.
    #[arg(long)]
    format: Option<String>,

    /// Path to a litesub.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a fully-populated default configuration file to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        litesub::config_file::generate_default_config(path)?;
        tracing::info!("wrote default configuration to {}", path.display());
        return Ok(());
    }

    tracing::info!("litesub v{VERSION} starting");

    let config = load_config(cli.config.as_deref())?;
    let output_format = cli.format.as_deref().map(parse_format).transpose()?;

    let backends = config.backend_chain.iter().map(|name| build_backend(name, provider_config_for(name))).collect();
    let orchestrator = Orchestrator::new(config, backends)?;

    let source_uri = format!("file://{}", cli.input.display());
    let request = JobRequest {
        source_path: cli.input.clone(),
        source_uri,
        track_index: cli.track,
        source_lang: cli.from.clone(),
        target_lang: cli.to.clone(),
        output_format,
    };

    let cancelled = Arc::new(AtomicBool::new(false));
    let ctrl_c_flag = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("cancellation requested, stopping at the next checkpoint");
            ctrl_c_flag.store(true, Ordering::SeqCst);
        }
    });

    let host = CliHost { cancelled };
    let outcome = orchestrator.run(request, &host).await?;

    match outcome {
        litesub::JobOutcome::Done { document, format, from_cache } => {
            let output_path = cli.output.unwrap_or_else(|| default_output_path(&cli.input, &cli.to, format));
            std::fs::write(&output_path, document)?;
            host.show_subtitle(&output_path);
            tracing::info!(
                "wrote {} ({}, {})",
                output_path.display(),
                format.extension(),
                if from_cache { "cache hit" } else { "translated" }
            );
        }
        litesub::JobOutcome::Cancelled => {
            tracing::warn!("job cancelled, no output written");
            std::process::exit(130);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(p) if p.exists() => ConfigFile::from_file(p).map(ConfigFile::into_app_config),
        Some(p) => {
            tracing::warn!("config file {} not found, using defaults", p.display());
            Ok(AppConfig::default())
        }
        None => Ok(AppConfig::default()),
    }
}

fn parse_format(s: &str) -> Result<SubtitleFormat> {
    match s.to_ascii_lowercase().as_str() {
        "srt" => Ok(SubtitleFormat::Srt),
        "ass" => Ok(SubtitleFormat::Ass),
        "ssa" => Ok(SubtitleFormat::Ssa),
        "vtt" | "webvtt" => Ok(SubtitleFormat::WebVtt),
        other => Err(LitesubError::UnsupportedCodec(other.to_string())),
    }
}

fn default_output_path(input: &std::path::Path, target_lang: &str, format: SubtitleFormat) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    input.with_file_name(format!("{stem}.{target_lang}.{}", format.extension()))
}

/// Provider credentials and endpoint overrides come from the environment,
/// matching the original service reading API keys out of its process env
/// rather than the checked-in config file.
fn provider_config_for(provider: &str) -> ProviderConfig {
    let prefix = provider.to_ascii_uppercase();
    ProviderConfig {
        api_key: std::env::var(format!("LITESUB_{prefix}_API_KEY")).ok(),
        endpoint_url: std::env::var(format!("LITESUB_{prefix}_ENDPOINT")).ok(),
        region: std::env::var(format!("LITESUB_{prefix}_REGION")).ok(),
        formality: std::env::var(format!("LITESUB_{prefix}_FORMALITY")).ok(),
        model: std::env::var(format!("LITESUB_{prefix}_MODEL")).ok(),
        max_tokens: std::env::var(format!("LITESUB_{prefix}_MAX_TOKENS")).ok().and_then(|v| v.parse().ok()),
        temperature: std::env::var(format!("LITESUB_{prefix}_TEMPERATURE")).ok().and_then(|v| v.parse().ok()),
        ..ProviderConfig::default()
    }
}

struct CliHost {
    cancelled: Arc<AtomicBool>,
}

impl HostCollaborator for CliHost {
    fn on_progress(&self, update: &ProgressUpdate) {
        match update.eta_secs {
            Some(eta) => tracing::info!("[{}] {:.0}% (eta {:.0}s)", update.stage.as_str(), update.percent, eta),
            None => tracing::info!("[{}] {:.0}%", update.stage.as_str(), update.percent),
        }
        if let Some(message) = &update.message {
            tracing::info!("{message}");
        }
    }

    fn on_warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "litesub=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
