//! kqbnav - join a Killer Queen Black custom match as a spectator
//!
//! Usage:
//!   kqbnav join ab12cd
//!   kqbnav classify --json
//!   kqbnav navigate custom_menu --budget 20
//!   kqbnav config --init

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use kqbnav_core::nav::NavigationBudget;
use kqbnav_core::{desktop, Config, LogicalScreen, NavOutcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kqbnav")]
#[command(about = "Drive the Killer Queen Black client by screen recognition")]
#[command(version)]
struct Args {
    /// Config file (default: $KQBNAV_HOME/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the game if needed and enter a spectate code
    Join {
        /// Six character alphanumeric spectate code
        code: String,

        /// Total navigation budget in seconds
        #[arg(short, long)]
        budget: Option<f64>,

        /// Back-off between polls in seconds
        #[arg(short, long)]
        poll_interval: Option<f64>,
    },

    /// Print the screen currently showing
    Classify {
        /// Print JSON instead of the screen name
        #[arg(long)]
        json: bool,
    },

    /// Navigate the menus to a screen
    Navigate {
        /// Target screen (main_menu, online_menu, custom_menu, code_entry, connecting)
        screen: LogicalScreen,

        /// Total navigation budget in seconds
        #[arg(short, long)]
        budget: Option<f64>,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the config path if no file exists
        #[arg(long)]
        init: bool,
    },
}

const DEFAULT_LOG_LEVEL: &str = "info";

/// Map a `KQBNAV_LOG_LEVEL` value onto an `EnvFilter` directive
fn level_directive(level: &str) -> &str {
    match level.trim() {
        "" => DEFAULT_LOG_LEVEL,
        "silent" | "none" => "off",
        "fatal" => "error",
        other => other,
    }
}

/// `RUST_LOG` wins; otherwise `KQBNAV_LOG_LEVEL`; unparsable input falls back to info
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("KQBNAV_LOG_LEVEL").unwrap_or_default();
        EnvFilter::try_new(level_directive(&level)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    })
}

fn seconds(value: f64, what: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("Invalid {}: {}", what, value))
}

async fn join(config: &Config, code: &str, budget: Option<f64>, poll_interval: Option<f64>) -> Result<()> {
    let budget = match budget {
        Some(secs) => seconds(secs, "budget")?,
        None => config.navigation.budget(),
    };
    let poll_interval = match poll_interval {
        Some(secs) => seconds(secs, "poll interval")?,
        None => config.navigation.poll_interval(),
    };

    let mut session = desktop::session(config).context("Failed to set up desktop session")?;
    session
        .join_spectate(code, budget, poll_interval)
        .await
        .with_context(|| format!("Failed to join match {}", code.trim()))?;

    println!("Entered spectate code {}", code.trim().to_lowercase());
    Ok(())
}

async fn classify(config: &Config, json: bool) -> Result<()> {
    let mut navigator = desktop::navigator(config).context("Failed to set up screen matcher")?;
    let result = navigator
        .classifier_mut()
        .classify_detailed()
        .await
        .context("Classification failed")?;

    if json {
        let value = serde_json::json!({
            "screen": result.screen,
            "template": result.template.map(|t| t.file_name()),
            "position": result.position,
            "confidence": result.attempt.map(|a| a.confidence),
            "scans": result.scans,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", result.screen);
    }
    Ok(())
}

async fn navigate(config: &Config, target: LogicalScreen, budget: Option<f64>) -> Result<()> {
    let total = match budget {
        Some(secs) => seconds(secs, "budget")?,
        None => config.navigation.budget(),
    };

    let mut session = desktop::session(config).context("Failed to set up desktop session")?;
    if !session.focus()? {
        warn!("Game window not in foreground");
    }

    let mut budget = NavigationBudget::new(total, config.navigation.poll_interval());
    match session.navigator_mut().run_with_budget(target, &mut budget).await? {
        NavOutcome::Reached { maneuvers } => {
            println!("Reached {} ({} maneuvers)", target, maneuvers);
            Ok(())
        }
        NavOutcome::TimedOut { last_seen, maneuvers } => Err(anyhow!(
            "Timed out after {:?} navigating to {} (last seen {}, {} maneuvers)",
            total,
            target,
            last_seen,
            maneuvers
        )),
    }
}

fn show_config(config: &Config, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            bail!("Config already exists: {}", path.display());
        }
        config
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Default config written");
    }
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path);

    match args.command {
        Command::Join {
            code,
            budget,
            poll_interval,
        } => join(&config, &code, budget, poll_interval).await,
        Command::Classify { json } => classify(&config, json).await,
        Command::Navigate { screen, budget } => navigate(&config, screen, budget).await,
        Command::Config { init } => show_config(&config, &config_path, init),
    }
}
