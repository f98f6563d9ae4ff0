//! Signwall entry point.
//!
//! Loads the configuration, builds the display controller, and runs it until
//! the console receives `quit` or the process receives Ctrl-C.
//!
//! # Usage
//!
//! ```text
//! signwall [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Config file (.toml or .json) [default: platform config dir]
//!   --monitor <WxH+X+Y>   Monitor geometry, repeatable, in display order
//!   --mode <MODE>         Override the configured mode for this run (single|multi)
//!   --log-level <LEVEL>   Log level when RUST_LOG is unset [default: info]
//!   --no-console          Do not read settings commands from stdin
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Description                          |
//! |-----------------------|--------------------------------------|
//! | `SIGNWALL_CONFIG`     | Config file path                     |
//! | `SIGNWALL_MONITORS`   | Comma-separated monitor geometries   |
//! | `SIGNWALL_MODE`       | Mode override                        |
//! | `SIGNWALL_LOG_LEVEL`  | Log level                            |
//! | `SIGNWALL_NO_CONSOLE` | Disable the stdin console            |
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ FileConfigStore::load()          -- config or defaults
//!  ├─ Controller::new(...)             -- TracingBackend + IntervalSchedulerFactory
//!  ├─ run_display_loop (Tokio task)    -- owns the controller
//!  ├─ run_console      (Tokio task)    -- stdin settings commands
//!  └─ ctrl_c           -- sends Shutdown
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signwall::application::controller::Controller;
use signwall::application::display_loop::{run_display_loop, DisplayCommand};
use signwall::application::settings::{ConfigStore, SettingsEditor};
use signwall::infrastructure::console::{run_console, Console};
use signwall::infrastructure::renderer::TracingBackend;
use signwall::infrastructure::scheduler::IntervalSchedulerFactory;
use signwall::infrastructure::storage::FileConfigStore;
use signwall::infrastructure::topology::StaticTopology;
use signwall_core::{Config, DisplayMode, Monitor};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Signage wall controller.
///
/// Rotates a list of web pages in one window, or tiles them across every
/// monitor in a fixed grid.
#[derive(Debug, Parser)]
#[command(name = "signwall", about = "Rotate or tile web pages across monitors", version)]
struct Cli {
    /// Configuration file.  `.json` files use JSON, anything else TOML.
    #[arg(long, env = "SIGNWALL_CONFIG")]
    config: Option<PathBuf>,

    /// Monitor geometry as `WIDTHxHEIGHT+X+Y`, in display order.
    ///
    /// Repeat the flag once per monitor.  Without it a single 1920x1080
    /// monitor at the origin is assumed.
    #[arg(
        long = "monitor",
        value_name = "WxH+X+Y",
        env = "SIGNWALL_MONITORS",
        value_delimiter = ','
    )]
    monitors: Vec<Monitor>,

    /// Display mode to start with instead of the configured one.
    ///
    /// The file is not rewritten at startup, but the override seeds the
    /// settings console, so a console `save` persists it.
    #[arg(long, env = "SIGNWALL_MODE")]
    mode: Option<DisplayMode>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", env = "SIGNWALL_LOG_LEVEL")]
    log_level: String,

    /// Do not read settings commands from stdin.
    #[arg(long, env = "SIGNWALL_NO_CONSOLE")]
    no_console: bool,
}

impl Cli {
    fn config_store(&self) -> anyhow::Result<FileConfigStore> {
        match &self.config {
            Some(path) => Ok(FileConfigStore::new(path)),
            None => FileConfigStore::at_default_location()
                .context("no --config given and no platform config directory"),
        }
    }

    /// The stored configuration with the `--mode` override applied.
    fn startup_config(&self, store: &dyn ConfigStore) -> Config {
        let config = store.load();
        match self.mode {
            Some(mode) => config.with_mode(mode),
            None => config,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `RUST_LOG` wins over --log-level when both are present.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!("signwall starting");

    let store = Arc::new(cli.config_store()?);
    let config = cli.startup_config(store.as_ref());

    let (tick_tx, tick_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let controller = Controller::new(
        config.clone(),
        Arc::new(TracingBackend::new()),
        Arc::new(IntervalSchedulerFactory::new(tokio::runtime::Handle::current())),
        tick_tx,
    );
    let topology = Arc::new(StaticTopology::new(cli.monitors.clone()));
    let display = tokio::spawn(run_display_loop(controller, topology, cmd_rx, tick_rx));

    // ── Settings console ──────────────────────────────────────────────────────
    if !cli.no_console {
        let console = Console::new(SettingsEditor::new(config), store, cmd_tx.clone());
        tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = run_console(console, stdin, tokio::io::stdout()).await {
                warn!("console stopped: {e}");
            }
        });
        info!("settings console ready; type `help` for commands");
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let shutdown_tx = cmd_tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            // The loop may already be gone after `quit`.
            let _ = shutdown_tx.send(DisplayCommand::Shutdown).await;
        }
    });

    let controller = display.await.context("display loop panicked")?;
    info!(generation = controller.generation(), "signwall stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
