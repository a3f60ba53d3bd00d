// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::{
    FilePreferenceStore, PreferencesController, Settings, Skin, UiAction, UiPreferences,
};
use clap::{Parser, Subcommand, ValueEnum};
use core_types::{OrderBookDepth, StrategyParams};
use engine::DashboardEngine;
use events::DashboardMessage;
use self::log_pane::LogPane;
use self::tracing_layer::{BroadcastLogLayer, LogCache};
use std::collections::VecDeque;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tracing_subscriber::prelude::*;

mod log_pane;
mod render;
mod tracing_layer;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Live terminal dashboard for a paper-trading bot.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Polls the bot continuously and prints each refresh.
    Watch {
        /// Order book levels to request (5 to 50, step 5). Type a new value on stdin to change it.
        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Runs a single refresh cycle and prints it.
    Once {
        #[arg(short, long)]
        depth: Option<u32>,

        /// Print the full view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Pushes strategy parameters to the bot. Unset flags keep the bot's current values.
    PushConfig {
        #[arg(long)]
        stop_loss: Option<f64>,
        #[arg(long)]
        take_profit: Option<f64>,
        #[arg(long)]
        trailing_stop: Option<f64>,
        #[arg(long)]
        position_scale: Option<f64>,
    },

    /// Shows or changes the saved display preferences.
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    Show,
    ToggleTheme,
    Skin { skin: SkinArg },
    ToggleFocus,
    ToggleSound,
    ToggleLargeText,
    ToggleTextOnly,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SkinArg {
    Aurora,
    Cyberpunk,
    Solar,
    Minimal,
}

impl From<SkinArg> for Skin {
    fn from(arg: SkinArg) -> Self {
        match arg {
            SkinArg::Aurora => Skin::Aurora,
            SkinArg::Cyberpunk => Skin::Cyberpunk,
            SkinArg::Solar => Skin::Solar,
            SkinArg::Minimal => Skin::Minimal,
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("failed to load settings")?;

    // --- Message Channel and Tracing Setup ---
    let (tx, _) = broadcast::channel::<DashboardMessage>(1024);
    let log_cache: LogCache = Arc::new(Mutex::new(VecDeque::with_capacity(
        tracing_layer::LOG_CACHE_SIZE,
    )));
    let log_layer = BroadcastLogLayer::new(tx.clone(), log_cache.clone());
    let level = tracing::Level::from_str(&settings.app.log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).with(log_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting dashboard application");

    match cli.command {
        Commands::Watch { depth } => handle_watch(&settings, depth, tx, &log_cache).await?,
        Commands::Once { depth, json } => handle_once(&settings, depth, json, tx).await?,
        Commands::PushConfig {
            stop_loss,
            take_profit,
            trailing_stop,
            position_scale,
        } => {
            handle_push_config(&settings, stop_loss, take_profit, trailing_stop, position_scale)
                .await?
        }
        Commands::Prefs { action } => handle_prefs(&settings, action.unwrap_or(PrefsAction::Show))?,
    }

    Ok(())
}

/// The CLI flag wins over the configured depth.
fn resolve_depth(settings: &Settings, flag: Option<u32>) -> Result<OrderBookDepth> {
    let depth = match flag {
        Some(levels) => OrderBookDepth::new(levels)?,
        None => settings.poller.depth()?,
    };
    Ok(depth)
}

fn load_preferences(settings: &Settings) -> PreferencesController<FilePreferenceStore> {
    PreferencesController::new(FilePreferenceStore::new(settings.preferences.path.clone()))
}

// --- "Watch" Subcommand Logic ---

async fn handle_watch(
    settings: &Settings,
    depth: Option<u32>,
    tx: broadcast::Sender<DashboardMessage>,
    log_cache: &LogCache,
) -> Result<()> {
    let depth = resolve_depth(settings, depth)?;
    let prefs = load_preferences(settings).preferences().clone();

    // 1. Channels: shutdown signal and the user-controlled depth.
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let (depth_tx, depth_rx) = watch::channel(depth);

    // 2. Subscribe before the engine starts so the first refresh is not missed,
    //    and seed the alerts pane with what was logged before that.
    let mut rx = tx.subscribe();
    let mut alerts = LogPane::from_cache(log_cache, log_pane::ALERT_LINES);
    let engine = DashboardEngine::from_settings(settings, tx)?;
    let engine_handle = tokio::spawn(engine.run(shutdown_rx, depth_rx));

    // 3. Read depth changes from stdin on a plain thread so a pending read never blocks exit.
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            let input = line.trim();
            match input.parse::<u32>().ok().and_then(|v| OrderBookDepth::new(v).ok()) {
                Some(depth) => {
                    if depth_tx.send(depth).is_err() {
                        break;
                    }
                }
                None => tracing::warn!(%input, "Ignoring invalid order book depth."),
            }
        }
    });

    // 4. Render until Ctrl+C.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested.");
                break;
            }
            msg = rx.recv() => match msg {
                Ok(DashboardMessage::ViewModel(view)) => {
                    println!("{}", render::render_view(&view, &prefs));
                    if !prefs.focus_mode && !alerts.is_empty() {
                        println!("{}", alerts.render());
                    }
                }
                Ok(DashboardMessage::SignalChanged(event)) => {
                    println!(">>> signal {}", render::describe_signal(&event));
                    if prefs.sound_enabled {
                        print!("\x07");
                        let _ = std::io::stdout().flush();
                    }
                }
                Ok(DashboardMessage::Log(log)) => alerts.push(log),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind, skipping messages.");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    let _ = shutdown_tx.send(());
    engine_handle.await?;
    Ok(())
}

// --- "Once" Subcommand Logic ---

async fn handle_once(
    settings: &Settings,
    depth: Option<u32>,
    json: bool,
    tx: broadcast::Sender<DashboardMessage>,
) -> Result<()> {
    let depth = resolve_depth(settings, depth)?;
    let mut engine = DashboardEngine::from_settings(settings, tx)?;
    let output = engine.poll_once(depth).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&output.view)?);
    } else {
        let prefs = load_preferences(settings).preferences().clone();
        println!("{}", render::render_view(&output.view, &prefs));
    }
    if let Some(error) = output.view.error() {
        tracing::warn!(%error, "Some resources could not be refreshed.");
    }
    Ok(())
}

// --- "Push-Config" Subcommand Logic ---

async fn handle_push_config(
    settings: &Settings,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    trailing_stop: Option<f64>,
    position_scale: Option<f64>,
) -> Result<()> {
    let client = api_client::new(&settings.backend)?;

    // Start from what the bot reports so unset flags are left untouched.
    let current = match client.get_status().await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read current parameters, using defaults.");
            None
        }
    };
    let mut params = StrategyParams::from_status(current.as_ref());
    if let Some(v) = stop_loss {
        params.stop_loss_pct = v;
    }
    if let Some(v) = take_profit {
        params.take_profit_pct = v;
    }
    if let Some(v) = trailing_stop {
        params.trailing_stop_pct = v;
    }
    if let Some(v) = position_scale {
        params.position_scale = v;
    }

    client.post_config(&params).await?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

// --- "Prefs" Subcommand Logic ---

fn handle_prefs(settings: &Settings, action: PrefsAction) -> Result<()> {
    let mut controller = load_preferences(settings);
    let action = match action {
        PrefsAction::Show => None,
        PrefsAction::ToggleTheme => Some(UiAction::ToggleTheme),
        PrefsAction::Skin { skin } => Some(UiAction::SetSkin(skin.into())),
        PrefsAction::ToggleFocus => Some(UiAction::ToggleFocus),
        PrefsAction::ToggleSound => Some(UiAction::ToggleSound),
        PrefsAction::ToggleLargeText => Some(UiAction::ToggleLargeText),
        PrefsAction::ToggleTextOnly => Some(UiAction::ToggleTextOnly),
    };
    if let Some(action) = action {
        controller.dispatch(action)?;
    }
    print_preferences(controller.preferences());
    Ok(())
}

fn print_preferences(prefs: &UiPreferences) {
    println!("theme:       {:?}", prefs.theme);
    println!("skin:        {:?}", prefs.skin);
    println!("focus mode:  {}", prefs.focus_mode);
    println!("sound:       {}", prefs.sound_enabled);
    println!("large text:  {}", prefs.large_text);
    println!("text only:   {}", prefs.text_only);
}
