use crate::keyboard::EnigoOutput;
use crate::listener::start_keyboard_listener;
use keyphrase_core::config::ensure_config_dir;
use keyphrase_core::dispatch::DEFAULT_QUEUE_CAPACITY;
use keyphrase_core::watch::{watch_catalog_file, DEFAULT_DEBOUNCE};
use keyphrase_core::{
    key_channel, spawn_engine, CatalogWatcher, Engine, EngineConfig, JsonPhraseStore,
    KeyphraseError, MatchEngine, PhraseStore, ReentrancyGuard, Result,
};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};

/// Settings for a foreground daemon run
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub config: EngineConfig,
    /// Quiet period after a database write before matchers are rebuilt
    pub debounce: Duration,
}

impl DaemonOptions {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Run the expansion daemon until the keyboard listener stops
pub fn run_daemon(options: DaemonOptions) -> Result<()> {
    let DaemonOptions { config, debounce } = options;
    config.validate()?;

    if config.database.is_none() {
        ensure_config_dir()?;
    }
    let db_path = config.database_path();
    if !db_path.exists() {
        warn!(path = %db_path.display(), "Phrase database not found, starting with no phrases");
    }

    let store: Arc<dyn PhraseStore> = Arc::new(JsonPhraseStore::new(&db_path));
    let matcher = Arc::new(MatchEngine::new());
    let guard = ReentrancyGuard::new();

    // Load the phrase database
    let watcher = CatalogWatcher::new(Arc::clone(&store), Arc::clone(&matcher), config.ambiguity);
    if let Err(err) = watcher.rebuild() {
        error!(error = %err, "Failed to load phrases");
    }

    // Rebuild whenever the database file changes
    let (_file_watch, notifications) = watch_catalog_file(&db_path, debounce)?;
    watcher.spawn(notifications)?;
    info!(path = %db_path.display(), "Watching phrase database");

    let (gate, events) = key_channel(guard.clone(), DEFAULT_QUEUE_CAPACITY);
    let engine_thread = spawn_engine(events, move || {
        let output = EnigoOutput::new()?;
        Engine::with_shared(&config, store, Box::new(output), matcher, guard)
    })?;
    let keyboard_thread = start_keyboard_listener(gate)?;

    // The engine stops when its output cannot be created or the listener gives up
    let result = join(engine_thread, "engine");
    if result.is_ok() {
        return join(keyboard_thread, "keyboard listener");
    }
    result
}

fn join(handle: JoinHandle<Result<()>>, name: &str) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(KeyphraseError::Other(format!("{} thread panicked", name))),
    }
}
