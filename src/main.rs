use anyhow::Context;
use clap::Parser;
use crossbeam_channel::Receiver;
use deck_tally::capture::{ReplaySource, SnapshotSource};
use deck_tally::config::Config;
use deck_tally::detection::{LineClassifier, MatchTracker};
use deck_tally::error::AppResult;
use deck_tally::logging;
use deck_tally::runner::{CaptureLoop, LoopStats};
use deck_tally::status::{StatusServer, StatusSource};
use deck_tally::store::{CounterFile, SharedStore};
use std::path::PathBuf;

/// Track per-deck wins and losses by reading a game window's text
#[derive(Parser, Debug)]
#[command(name = "deck-tally", version)]
struct Cli {
    /// Config file (default: <config dir>/DeckTally/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Counter file, overriding the config
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Title of the window to observe, overriding the config
    #[arg(long, value_name = "TITLE")]
    window: Option<String>,

    /// Read snapshots from a recorded file instead of the live window
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Print the titles of capturable windows and exit
    #[arg(long)]
    list_windows: bool,

    /// Don't serve the status page
    #[arg(long)]
    no_status: bool,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let _log_guard = logging::initialize_tracing();
    logging::log_runtime_environment();

    if cli.list_windows {
        return list_windows();
    }

    let config = load_config(&cli)?;
    tracing::info!("Watching window: {}", config.window_title);
    tracing::info!("Counter file: {}", config.data_file.display());

    let file = CounterFile::new(&config.data_file);
    let store = file
        .load()
        .with_context(|| format!("Refusing to start over {}", config.data_file.display()))?;
    let store = SharedStore::new(store);

    let classifier = LineClassifier::new(config.markers.clone());
    let tracker = MatchTracker::new(classifier, store.clone(), file);

    if config.status.enabled && !cli.no_status {
        let source = StatusSource::new(store.reader(), tracker.current_deck());
        StatusServer::bind(&config.status.bind, source, config.status.refresh_secs)?.spawn()?;
    }

    let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        tracing::info!("Shutting down...");
        let _ = stop_tx.try_send(());
    })
    .context("Failed to install Ctrl+C handler")?;

    let stats = match &cli.replay {
        Some(path) => run(ReplaySource::from_file(path)?, tracker, &config, stop_rx),
        None => run_live(tracker, &config, stop_rx)?,
    };

    tracing::info!(
        "Done: {} match event(s) over {} cycle(s)",
        stats.events,
        stats.cycles
    );
    Ok(())
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&path)?;

    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(window) = &cli.window {
        config.window_title = window.clone();
    }
    config.validate()?;

    Ok(config)
}

fn run<S: SnapshotSource>(
    source: S,
    tracker: MatchTracker,
    config: &Config,
    stop_rx: Receiver<()>,
) -> LoopStats {
    let (stats, _tracker) = CaptureLoop::new(source, tracker, config.cycle_delay(), stop_rx)
        .with_skip_warning(config.skip_warning_threshold)
        .run();
    stats
}

#[cfg(feature = "live-capture")]
fn run_live(tracker: MatchTracker, config: &Config, stop_rx: Receiver<()>) -> AppResult<LoopStats> {
    use deck_tally::capture::WindowOcrSource;
    use deck_tally::ocr::OcrManager;

    let ocr = OcrManager::new(&config.ocr).context("Install Tesseract or set ocr.tessdata_dir")?;
    let source = WindowOcrSource::new(config.window_title.clone(), ocr);
    Ok(run(source, tracker, config, stop_rx))
}

#[cfg(not(feature = "live-capture"))]
fn run_live(_tracker: MatchTracker, _config: &Config, _stop_rx: Receiver<()>) -> AppResult<LoopStats> {
    anyhow::bail!("Built without live capture; rebuild with `--features live-capture` or pass --replay <FILE>")
}

#[cfg(feature = "live-capture")]
fn list_windows() -> AppResult<()> {
    for title in deck_tally::capture::window::list_windows()? {
        println!("{}", title);
    }
    Ok(())
}

#[cfg(not(feature = "live-capture"))]
fn list_windows() -> AppResult<()> {
    anyhow::bail!("Built without live capture; rebuild with `--features live-capture`")
}
