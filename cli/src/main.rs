//! CLI entrypoint for votegate
//!
//! Wires the adapters into the use cases and runs ingestion and voting until
//! interrupted.

mod cli;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::Cli;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use votegate_application::{
    DecisionLog, IngestRecordsUseCase, MessageChannel, NoDecisionLog, RunVotingUseCase,
    SharedLedger, TallyReactionUseCase, VotingStop,
};
use votegate_domain::ChannelId;
use votegate_infrastructure::{
    AppsScriptRecordSource, ConfigLoader, DiscordChannel, DiscordGateway, FileConfig,
    JsonlDecisionLog,
};

/// Set up stderr logging, plus a plain-text log file when configured
fn init_tracing(cli: &Cli, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_env_only()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("config error: {}", problem);
        }
        bail!("Invalid configuration ({} problem(s))", problems.len());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(&cli, config.logging.file.as_deref())?;

    info!("Starting votegate");

    // === Dependency Injection ===
    let voting = config.to_voting_params()?;
    let voting_channel = ChannelId::new(config.discord.voting_channel.trim());

    let channel = Arc::new(DiscordChannel::new(
        config.discord.api_base.as_str(),
        config.discord.token.as_str(),
        voting_channel.clone(),
    )?);
    let source = Arc::new(AppsScriptRecordSource::new(
        config.record_source.url.as_str(),
        config.record_source.secret.as_str(),
        config.record_source.timeout(),
    )?);

    let own_id = match channel.authenticate().await {
        Ok(id) => id,
        Err(e) => {
            error!("Login failed: {}", e);
            bail!("Login failed: {}", e);
        }
    };

    let decision_log: Arc<dyn DecisionLog> = match &config.logging.audit_log {
        Some(path) => match JsonlDecisionLog::open(path) {
            Some(log) => {
                info!("Recording decisions to {}", log.path().display());
                Arc::new(log)
            }
            None => Arc::new(NoDecisionLog),
        },
        None => Arc::new(NoDecisionLog),
    };

    let ledger = SharedLedger::new();
    let symbols = voting.symbols.clone();
    let tally = Arc::new(
        TallyReactionUseCase::new(
            ledger.clone(),
            Arc::clone(&source),
            Arc::clone(&channel),
            voting,
        )
        .with_own_id(own_id)
        .with_decision_log(decision_log),
    );
    let ingest = IngestRecordsUseCase::new(
        ledger,
        source,
        Arc::clone(&channel),
        config.ingestion.to_params(),
    )
    .with_symbols(symbols);

    let cancellation = CancellationToken::new();

    let (stream, gateway) = DiscordGateway::new(
        config.discord.gateway_url.as_str(),
        config.discord.token.as_str(),
        voting_channel,
    )
    .spawn(cancellation.child_token());

    let ingestion = {
        let token = cancellation.child_token();
        tokio::spawn(async move { ingest.run(token).await })
    };

    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
                cancellation.cancel();
            }
        });
    }

    let summary = RunVotingUseCase::new(tally)
        .execute(stream, cancellation.clone())
        .await;
    cancellation.cancel();

    if let Err(e) = ingestion.await {
        warn!("Ingestion task failed: {}", e);
    }
    if let Err(e) = gateway.await {
        warn!("Gateway task failed: {}", e);
    }

    info!(
        "Processed {} reaction(s), {} counted, {} decision(s)",
        summary.events, summary.counted, summary.decisions
    );

    if summary.stop == VotingStop::StreamClosed {
        bail!("Reaction stream closed by the gateway");
    }
    Ok(())
}
