//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                        | Key Methods              |
// |---------------|----------------------------------------------------|--------------------------|
// | MatchCache    | Memoizes router output per exact topic             | resolve, clear           |
// | CacheStats    | Hit/miss counters for diagnostics                  |                          |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::domain::models::topic::split_topic;
use crate::domain::services::trie::{router, NodeId, Trie};

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that ran the router
    pub misses: u64,
    /// Topics currently cached
    pub entries: usize,
}

/// Cache of resolved routes keyed by exact topic string.
///
/// Entries name trie nodes rather than copying their handlers, so they stay
/// correct when handlers are unregistered. They must be dropped whenever the
/// trie gains a path, since a new path can make any topic reach more nodes.
#[derive(Debug)]
pub struct MatchCache {
    entries: HashMap<String, Arc<[NodeId]>>,
    limit: usize,
    hits: u64,
    misses: u64,
}

impl MatchCache {
    /// Creates an empty cache holding at most `limit` topics
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the nodes matching `topic`, running the router on a miss.
    ///
    /// # Arguments
    /// * `topic` - The exact topic string being emitted
    /// * `trie` - The trie the cached entries were computed against
    pub fn resolve<H>(&mut self, topic: &str, trie: &Trie<H>) -> Arc<[NodeId]> {
        if let Some(nodes) = self.entries.get(topic) {
            self.hits += 1;
            trace!(topic, matches = nodes.len(), "Match cache hit");
            return Arc::clone(nodes);
        }

        self.misses += 1;
        let nodes: Arc<[NodeId]> = router::resolve(trie, &split_topic(topic)).into();
        trace!(topic, matches = nodes.len(), "Match cache miss");

        if self.entries.len() >= self.limit {
            trace!(limit = self.limit, "Match cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(topic.to_string(), Arc::clone(&nodes));

        nodes
    }

    /// Forgets every cached topic
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached topics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
