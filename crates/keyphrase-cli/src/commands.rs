use crate::cli::{Commands, RunArgs};
use keyphrase_core::config::get_config_file_path;
use keyphrase_core::{AmbiguityPolicy, EngineConfig, Result};
use keyphrase_daemon::{run_daemon, DaemonOptions};
use tracing::info;

/// Names accepted by `--trigger-keys` besides any other key's lowercase name
pub const TRIGGER_KEY_NAMES: &[(&str, &str)] = &[
    ("enter", "Return or keypad Enter (alias: return)"),
    ("space", "Space bar"),
    ("tab", "Tab"),
    ("escape", "Escape"),
];

pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => handle_run(args),
        Commands::Keys => {
            print!("{}", trigger_key_listing());
            Ok(())
        }
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    info!(
        buffer_size = config.buffer_size,
        triggers = ?config.trigger_keys,
        "Starting keyphrase"
    );
    run_daemon(DaemonOptions::new(config))
}

/// Load the config file and apply command-line overrides on top
pub fn resolve_config(args: &RunArgs) -> Result<EngineConfig> {
    let path = args.config.clone().unwrap_or_else(get_config_file_path);
    let mut config = EngineConfig::load(&path)?;

    if let Some(size) = args.buffer_size {
        config.buffer_size = size;
    }
    if !args.trigger_keys.is_empty() {
        config.trigger_keys = args.trigger_keys.clone();
    }
    if let Some(database) = &args.database {
        config.database = Some(database.clone());
    }
    if let Some(policy) = args.unrecognized {
        config.unrecognized_keys = policy.into();
    }
    if args.longest_key_first {
        config.ambiguity = AmbiguityPolicy::LongestKey;
    }

    config.validate()?;
    Ok(config)
}

pub fn trigger_key_listing() -> String {
    let mut out = String::new();
    for (name, description) in TRIGGER_KEY_NAMES {
        out.push_str(&format!("{:<8} {}\n", name, description));
    }
    out.push_str("Other keys: a non-text key's lowercase name such as \"f1\", ");
    out.push_str("or the character a text key types such as \"/\".\n");
    out
}
