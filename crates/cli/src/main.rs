use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chromapick_api::{ApiConfig, PaletteClient, PaletteService};
use chromapick_engine::PaletteGenerator;
use chromapick_types::{Palette, PaletteError, PaletteResponse};
use chromapick_util::{default_log_path, expand_tilde, load_image_file};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chromapick", version, about = "Generate a color palette from an image")]
struct Cli {
    /// Image to select when the interactive screen opens.
    image: Option<String>,

    /// Base URL of the color extraction service (overrides CHROMAPICK_API_BASE).
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Give up on the extraction request after this many seconds
    /// (overrides CHROMAPICK_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Where the interactive screen writes its log (overrides CHROMAPICK_LOG_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract a palette without opening the interactive screen.
    Extract {
        /// PNG or JPEG image to upload.
        image: String,
        /// Print `{"palette": [...]}` instead of one color per line.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Extract { ref image, json }) => {
            init_tracing(None)?;
            let client = build_client(&cli)?;
            let palette = extract(&client, image).await?;
            let mut stdout = std::io::stdout().lock();
            write_palette(&mut stdout, &palette, json)?;
            Ok(())
        }
        None => {
            let log_path = cli
                .log_file
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(default_log_path);
            init_tracing(Some(&log_path))?;
            let client = build_client(&cli)?;
            chromapick_tui::run(Arc::new(client), cli.image.clone()).await
        }
    }
}

/// Install the global subscriber. The interactive screen owns the terminal,
/// so it logs to `log_path`; headless runs log to stderr.
fn init_tracing(log_path: Option<&Path>) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = log_path else {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
    Ok(())
}

/// Resolve the endpoint: flags win over the environment, which wins over the
/// hosted default. Variables replaced by a flag are not consulted.
fn resolve_config(cli: &Cli) -> Result<ApiConfig> {
    let timeout = cli.timeout_secs.map(Duration::from_secs);
    Ok(ApiConfig::resolve(cli.endpoint.as_deref(), timeout)?)
}

fn build_client(cli: &Cli) -> Result<PaletteClient> {
    let config = resolve_config(cli)?;
    tracing::debug!(endpoint = config.base_url(), timeout = ?config.timeout(), "using color extraction service");
    PaletteClient::new(config).context("failed to build HTTP client")
}

/// Run one select-then-upload cycle against `service`.
async fn extract<S: PaletteService + ?Sized>(service: &S, image: &str) -> Result<Palette> {
    let mut generator = PaletteGenerator::new();
    let file = load_image_file(image).map_err(user_facing)?.ok_or_else(|| user_facing(PaletteError::MissingSelection))?;
    generator.select(Some(file), &mut ()).map_err(user_facing)?;
    let palette = generator.upload(service).await.map_err(user_facing)?;
    Ok(palette.clone())
}

/// Prefer the message the interactive screen would show, keeping the
/// detailed cause alongside it.
fn user_facing(error: PaletteError) -> anyhow::Error {
    match error.user_message() {
        Some(message) => anyhow!(error).context(message),
        None => anyhow!(error),
    }
}

fn write_palette<W: Write>(out: &mut W, palette: &Palette, json: bool) -> Result<()> {
    if json {
        let body = PaletteResponse {
            palette: palette.clone(),
        };
        serde_json::to_writer(&mut *out, &body)?;
        writeln!(out)?;
    } else {
        for color in palette {
            writeln!(out, "{color}")?;
        }
    }
    Ok(())
}
