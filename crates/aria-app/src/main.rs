mod app;
mod cli;
mod input;

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use aria_config::{AriaConfig, ReloadManager};

/// Load environment variables from a .env file (KEY=VALUE lines).
/// Existing variables win.
fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        PathBuf::from(".env"),
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(directive);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The file to watch for live reload, if one exists.
fn watched_path(args: &cli::Args) -> Option<PathBuf> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => aria_config::toml_loader::default_config_path().ok()?,
    };
    path.exists().then_some(path)
}

fn main() {
    load_dotenv();
    let args = cli::parse();

    // The config may choose the log level, so load it before logging starts
    // and report any failure afterwards.
    let loaded = aria_config::load_config(args.config.as_deref());
    let directive = args.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.logging.level.as_filter().to_string(),
        Err(_) => "info".to_string(),
    });
    init_logging(&directive);

    tracing::info!("Aria v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        AriaConfig::default()
    });

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("aria-rt")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let mut app = app::AvatarApp::new(config.clone());
    if let Some(path) = watched_path(&args) {
        let _enter = runtime.enter();
        let (_, updates) = ReloadManager::start(path.clone());
        tracing::info!(path = %path.display(), "watching config for changes");
        app = app.with_config_updates(updates);
    }

    let character = args
        .character
        .clone()
        .unwrap_or_else(|| config.characters.default.clone());
    if !app.switch_character(&character) {
        tracing::warn!(%character, "starting without a character");
    }

    let mut events = app.bus().subscribe();
    runtime.spawn(async move {
        loop {
            match events.recv().await {
                Ok(aria_common::Event::Shutdown) => break,
                Ok(event) => tracing::debug!(?event, "avatar event"),
                Err(RecvError::Lagged(n)) => tracing::debug!(skipped = n, "event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    app.start_conversation(runtime.handle());
    if let Some(text) = args.say.as_deref() {
        app.send_message(text);
    }

    let input = input::spawn_stdin_reader();
    app.run(input);
    app.shutdown();

    runtime.shutdown_timeout(Duration::from_secs(2));
    tracing::info!("Shutdown complete");
}
