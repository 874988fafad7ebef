// Expose the modules
pub mod config;
pub mod domain;

// Re-export key types for easier usage
pub use config::{BusConfig, ConfigError, DEFAULT_CACHE_LIMIT, DEFAULT_HISTORY_CAPACITY};
pub use domain::models::history::HistoryEntry;
pub use domain::models::topic::{
    split_topic, PatternToken, TopicPattern, MULTI_WILDCARD, SINGLE_WILDCARD, TOPIC_SEPARATOR,
};
pub use domain::services::cache::{CacheStats, MatchCache};
pub use domain::services::ring_buffer::RingBuffer;
pub use domain::services::trie::{NodeId, Trie};
pub use domain::services::events::{
    EventBus, EventError, EventHandler, EventLogger, EventMeta, EventResult, Subscription,
};
