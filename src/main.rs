//! render-poller
//!
//! Waits for server-side renders to become ready, printing where each one
//! can be fetched. Several identifiers are polled concurrently, each with
//! its own backoff.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures_util::future::join_all;
use thiserror::Error;

use render_poller::config::{self, ConfigError, DispatchMode, PollerConfig};
use render_poller::lifecycle::{cancel_on_ctrl_c, CancelToken};
use render_poller::observability;
use render_poller::poller::{EmptyResourceId, ImagePoller, PollReport, PollerSettings, ResourceId};
use render_poller::transport::{Endpoints, HttpTransport, Transport, TransportError};
use render_poller::view::ConsoleView;

#[derive(Parser)]
#[command(name = "render-poller", version)]
#[command(about = "Wait for server-side renders and report when they are ready", long_about = None)]
struct Cli {
    /// Resource identifiers to wait for.
    #[arg(required = true)]
    identifiers: Vec<String>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render server base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Initial backoff in seconds.
    #[arg(long)]
    initial_backoff: Option<f64>,

    /// Stop after this many status checks.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Stop once polling would run longer than this many seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Alert on status bodies other than "ok" and "fail".
    #[arg(long)]
    strict: bool,

    /// Do not show the metadata line once revealed.
    #[arg(long)]
    no_metadata: bool,

    /// Save the revealed render here (single identifier only).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a JSON report for every sequence.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Identifier(#[from] EmptyResourceId),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("--output needs exactly one identifier")]
    OutputNeedsSingleIdentifier,

    #[error("{failed} of {total} resources were not revealed")]
    NotRevealed { failed: usize, total: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    observability::logging::init(&config.observability);
    tracing::info!(
        base_url = %config.server.base_url,
        initial_backoff_secs = config.backoff.initial_secs,
        dispatch = ?config.dispatch.mode,
        "Configuration loaded"
    );

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(cli: &Cli) -> Result<PollerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => PollerConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }
    if let Some(initial) = cli.initial_backoff {
        config.backoff.initial_secs = initial;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.limits.max_attempts = Some(max_attempts);
    }
    if let Some(deadline) = cli.deadline_secs {
        config.limits.max_elapsed_secs = Some(deadline);
    }
    if cli.strict {
        config.dispatch.mode = DispatchMode::Strict;
    }
    if cli.no_metadata {
        config.view.show_metadata = false;
    }

    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn run(cli: Cli, config: PollerConfig) -> Result<(), CliError> {
    if cli.output.is_some() && cli.identifiers.len() != 1 {
        return Err(CliError::OutputNeedsSingleIdentifier);
    }

    let ids = cli
        .identifiers
        .iter()
        .map(|raw| ResourceId::new(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse() {
            Ok(addr) => {
                if let Err(e) = observability::metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    let endpoints = Endpoints::parse(&config.server.base_url)?;
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.transport)?);
    let settings = PollerSettings::from_config(&config);
    let initial_backoff = config.backoff.initial_secs;

    let cancel = CancelToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());

    let sequences = ids.into_iter().map(|id| {
        let view = Arc::new(ConsoleView::new(&id, endpoints.clone()));
        let poller = ImagePoller::new(transport.clone(), view, endpoints.clone())
            .with_settings(settings.clone());
        let cancel = cancel.clone();
        async move { poller.run(id, initial_backoff, &cancel).await }
    });
    let reports: Vec<PollReport> = join_all(sequences).await;
    ctrl_c.abort();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if let (Some(path), [report]) = (&cli.output, reports.as_slice()) {
        if report.is_revealed() {
            let bytes = transport
                .fetch_render(endpoints.render_url(&report.identifier))
                .await?;
            tokio::fs::write(path, &bytes)
                .await
                .map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "Render saved");
        }
    }

    let failed = reports.iter().filter(|r| !r.is_revealed()).count();
    if failed > 0 {
        return Err(CliError::NotRevealed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}
