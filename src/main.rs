//! Replays a scripted sequence of art detail events against a logging view.

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::select;
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use art_detail::config::Configuration;
use art_detail::events::ScreenEvent;
use art_detail::screen::{ArtContext, ArtDetailScreen};
use art_detail::tasks::replay;
use art_detail::view::LoggingView;

#[derive(Debug, Parser)]
#[command(
    name = "art-detail",
    version,
    about = "Replay viewport, switch and loading events against a logging view"
)]
struct Args {
    /// YAML script of timed screen events
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
    /// Path to YAML config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// How long to let pending timers run after the script ends
    #[arg(long, value_name = "DURATION", default_value = "2s", value_parser = humantime::parse_duration)]
    settle: Duration,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("art_detail={level}").parse()?);
    fmt().with_env_filter(filter).with_target(true).compact().init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let Args {
        script,
        config,
        settle,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let cfg = match &config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;

    let steps = replay::load_script(&script)?;
    info!(steps = steps.len(), script = %script.display(), "loaded script");

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    LocalSet::new()
        .run_until(async move {
            let view = Rc::new(LoggingView::new(cfg.surface_size));
            let screen = ArtDetailScreen::open(ArtContext::new(), view, &cfg);
            screen.on_start();

            let (events_tx, events_rx) = mpsc::channel::<ScreenEvent>(16);
            let feeder = tokio::task::spawn_local(replay::feed(steps, events_tx, cancel.clone()));
            replay::run(Rc::clone(&screen), events_rx, cancel.clone())
                .await
                .context("replay task failed")?;
            feeder.await.context("feed task panicked")??;

            select! {
                _ = cancel.cancelled() => {}
                _ = sleep(settle) => {}
            }
            screen.on_stop();
            screen.close();
            Ok::<(), anyhow::Error>(())
        })
        .await
}
