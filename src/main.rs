use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use event_gallery::carousel::{Carousel, CarouselOptions, LayoutMode, StripLayout, TracingShell};
use event_gallery::config::Configuration;
use event_gallery::crm::ErpNextClient;
use event_gallery::events::Interaction;
use event_gallery::tasks;
use event_gallery::tasks::loader::LoadedProjects;

#[derive(Debug, Parser)]
#[command(
    name = "event-gallery",
    version,
    about = "Looping project carousel backed by ERPNext"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Skip the CRM and show the built-in projects
    #[arg(long)]
    offline: bool,
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
        .add_directive(format!("event_gallery={level}").parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        offline,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    tracing::info!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    let loaded = if offline {
        tracing::info!("offline mode; using built-in projects");
        LoadedProjects::fallback()
    } else {
        let client = ErpNextClient::new(&cfg.crm).context("failed to build CRM client")?;
        tasks::loader::load(&client, cfg.crm.request_timeout).await
    };
    tracing::info!(
        origin = ?loaded.origin,
        projects = loaded.display.canonical_len(),
        "gallery ready"
    );

    let (interaction_tx, interaction_rx) = mpsc::channel::<Interaction>(32); // Control -> Carousel
    let cancel = CancellationToken::new();

    // Ctrl-D/Ctrl-C unmount the carousel
    if io::stdin().is_terminal() {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            let mut sink = Vec::new();
            match io::stdin().read_to_end(&mut sink) {
                Ok(_) => tracing::info!("stdin closed; initiating shutdown"),
                Err(err) => tracing::warn!("stdin watcher failed: {err}"),
            }
            cancel.cancel();
        });
    } else {
        tracing::debug!("stdin is not a terminal; skipping shutdown watcher");
    }

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

    let mut tasks: JoinSet<Result<()>> = JoinSet::new();

    #[cfg(unix)]
    tasks.spawn({
        let socket_path = cfg.control_socket_path.clone();
        let to_carousel = interaction_tx.clone();
        let cancel = cancel.clone();
        async move {
            tasks::control::run(socket_path, to_carousel, cancel)
                .await
                .context("control socket task failed")
        }
    });
    drop(interaction_tx);

    let mode = LayoutMode::for_viewport(cfg.viewport.width, cfg.viewport.mobile_breakpoint);
    let layout = StripLayout::new(loaded.display.len(), cfg.viewport.width, mode);
    let carousel = Carousel::mount(
        loaded.display,
        layout,
        Arc::new(TracingShell),
        CarouselOptions::from_config(&cfg),
        std::time::Instant::now(),
    );

    // The carousel loop runs on the main task until cancellation
    if let Err(e) = tasks::carousel::run(
        carousel,
        interaction_rx,
        cancel.clone(),
        cfg.carousel.frame_interval(),
    )
    .await
    .context("carousel failed")
    {
        tracing::error!("{e:?}");
    }
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}
