use serde::{Deserialize, Serialize};

/// A record of one emission kept in the bus history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Topic the message was emitted on
    pub topic: String,
    /// Emission time in milliseconds since the Unix epoch
    pub timestamp_millis: i64,
}

impl HistoryEntry {
    /// Creates a new history entry
    pub fn new(topic: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            topic: topic.into(),
            timestamp_millis,
        }
    }
}
