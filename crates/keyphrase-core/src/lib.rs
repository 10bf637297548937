//! keyphrase - keystroke-driven text expansion.
//!
//! The engine watches key-down events, keeps a short buffer of what was
//! typed, and when a trigger key follows a registered phrase key it erases
//! the key from the focused application and types the stored phrase instead.

pub mod buffer;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod guard;
pub mod keyboard;
pub mod matcher;
pub mod models;
pub mod store;
pub mod substitution;
pub mod trigger;
pub mod watch;

// Re-export common items for convenience
pub use buffer::KeyBuffer;
pub use catalog::{CatalogChanged, CatalogWatcher};
pub use classify::UnrecognizedKeyPolicy;
pub use config::{get_config_dir, EngineConfig};
pub use dispatch::{key_channel, spawn_engine, KeyGate, Offer};
pub use engine::{Engine, KeyOutcome};
pub use error::{KeyphraseError, Result};
pub use guard::{GuardToken, ReentrancyGuard};
pub use keyboard::{KeyEvent, KeyboardAction, KeyboardOutput, RecordingOutput, TriggerKey};
pub use matcher::{AmbiguityPolicy, MatchEngine, Matcher, MatcherSet};
pub use models::{PhraseEntry, PhraseKey, PhraseValue};
pub use store::{JsonPhraseStore, MemoryPhraseStore, PhraseStore};
pub use substitution::{SubstitutionExecutor, SubstitutionOutcome};
pub use watch::{watch_catalog_file, CatalogFileWatch};
