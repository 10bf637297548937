use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short identifier the user types to invoke a substitution.
pub type PhraseKey = String;

/// Text injected in place of a phrase key.
pub type PhraseValue = String;

/// One record of the phrase catalog as stored in the database file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseEntry {
    pub key: PhraseKey,
    pub value: PhraseValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl PhraseEntry {
    pub fn new(key: impl Into<PhraseKey>, value: impl Into<PhraseValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            tags: None,
            updated: Utc::now(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Replace the stored value and bump the timestamp
    pub fn update_value(&mut self, value: impl Into<PhraseValue>) {
        self.value = value.into();
        self.updated = Utc::now();
    }
}
