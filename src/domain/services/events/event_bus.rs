//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | EventBus                | Topic router with wildcard patterns and history   | subscribe, emit   |
// |                         |                                                   | history           |
// | Subscription            | Handle removing one registered handler            | unsubscribe       |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::config::{BusConfig, ConfigError};
use crate::domain::models::history::HistoryEntry;
use crate::domain::models::topic::TopicPattern;
use crate::domain::services::cache::{CacheStats, MatchCache};
use crate::domain::services::ring_buffer::RingBuffer;
use crate::domain::services::trie::{NodeId, Trie};

use super::event_types::{EventError, EventMeta, EventResult};
use super::handlers::EventHandler;

/// A handler registered on a trie node
struct Registration<M> {
    id: Uuid,
    handler: Arc<dyn EventHandler<M>>,
    /// Cleared on removal so an emission already in flight skips the handler
    active: Arc<AtomicBool>,
}

impl<M> Clone for Registration<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
            active: Arc::clone(&self.active),
        }
    }
}

/// State shared between all clones of an EventBus
struct BusInner<M> {
    trie: Trie<Registration<M>>,
    cache: MatchCache,
    history: RingBuffer<HistoryEntry>,
    /// Terminal node of every live subscription
    routes: HashMap<Uuid, NodeId>,
    sequence: u64,
}

impl<M> BusInner<M> {
    fn remove(&mut self, id: Uuid) -> bool {
        let Some(node) = self.routes.remove(&id) else {
            return false;
        };

        match self.trie.unregister(node, |registration| registration.id == id) {
            Some(registration) => {
                registration.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }
}

/// In-process publish/subscribe bus routing dot-delimited topics.
///
/// Patterns may use `*` for exactly one segment and `#` for zero or more.
/// Emission is synchronous: every matching handler has run by the time
/// `emit` returns. The bus lock is never held while a handler runs, so
/// handlers may emit, subscribe or unsubscribe re-entrantly.
pub struct EventBus<M> {
    inner: Arc<Mutex<BusInner<M>>>,
    config: BusConfig,
}

impl<M> Clone for EventBus<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<M> fmt::Debug for EventBus<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventBus")
            .field("config", &self.config)
            .field("subscribers", &inner.routes.len())
            .field("history_len", &inner.history.len())
            .field("trie_nodes", &inner.trie.node_count())
            .finish()
    }
}

impl<M: 'static> Default for EventBus<M> {
    fn default() -> Self {
        Self::from_valid_config(BusConfig::default())
    }
}

impl<M: 'static> EventBus<M> {
    /// Creates a bus with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus retaining the last `capacity` emissions
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self::from_valid_config(BusConfig::default().with_history_capacity(capacity))
    }

    /// Creates a bus from an explicit configuration.
    ///
    /// # Returns
    /// * `Ok(EventBus)` - If the configuration is valid
    /// * `Err(ConfigError)` - If it is not
    pub fn with_config(config: BusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                trie: Trie::new(),
                cache: MatchCache::new(config.cache_limit),
                history: RingBuffer::new(config.history_capacity),
                routes: HashMap::new(),
                sequence: 0,
            })),
            config,
        }
    }

    /// Registers a closure for every topic matching `pattern`.
    ///
    /// # Arguments
    /// * `pattern` - Dot-delimited pattern, `*` and `#` segments are wildcards
    /// * `handler` - Called with the message and its delivery metadata
    ///
    /// # Returns
    /// A handle that removes the handler again
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> Subscription<M>
    where
        F: Fn(&M, &EventMeta) -> EventResult<()> + Send + Sync + 'static,
    {
        self.subscribe_handler(pattern, Arc::new(handler))
    }

    /// Registers a shared handler for every topic matching `pattern`.
    pub fn subscribe_handler(
        &self,
        pattern: &str,
        handler: Arc<dyn EventHandler<M>>,
    ) -> Subscription<M> {
        let pattern = TopicPattern::parse(pattern);
        let id = Uuid::new_v4();
        let active = Arc::new(AtomicBool::new(true));

        let node = {
            let mut inner = self.inner.lock();
            let node = inner.trie.add(pattern.tokens());
            inner.trie.register(
                node,
                Registration {
                    id,
                    handler,
                    active: Arc::clone(&active),
                },
            );
            inner.routes.insert(id, node);
            // Any new path may change what every cached topic reaches
            inner.cache.clear();
            node
        };

        debug!(%pattern, %node, subscription_id = %id, "Subscribed");

        Subscription {
            id,
            pattern: pattern.as_str().to_string(),
            node,
            active,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Alias of [`EventBus::subscribe`]
    pub fn on<F>(&self, pattern: &str, handler: F) -> Subscription<M>
    where
        F: Fn(&M, &EventMeta) -> EventResult<()> + Send + Sync + 'static,
    {
        self.subscribe(pattern, handler)
    }

    /// Removes a subscription by id.
    ///
    /// # Returns
    /// * `true` - If the subscription was live and has been removed
    /// * `false` - If it was unknown or already removed
    pub fn unsubscribe(&self, subscription_id: Uuid) -> bool {
        let removed = self.inner.lock().remove(subscription_id);
        if removed {
            debug!(%subscription_id, "Unsubscribed");
        }
        removed
    }

    /// Emits a message on `topic`.
    ///
    /// The emission is recorded in the history first. The handlers to call are
    /// fixed when the route is resolved: handlers subscribed while this call
    /// runs are not invoked by it, handlers unsubscribed while it runs are
    /// skipped if they have not been reached yet.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of handlers invoked
    /// * `Err(EventError::HandlerFailed)` - A handler failed; later handlers were not invoked
    pub fn emit(&self, topic: &str, message: M) -> EventResult<usize> {
        let (meta, deliveries) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            inner.sequence += 1;
            let timestamp_millis = Utc::now().timestamp_millis();
            inner.history.push(HistoryEntry::new(topic, timestamp_millis));

            let nodes = inner.cache.resolve(topic, &inner.trie);
            let deliveries: Vec<Registration<M>> = nodes
                .iter()
                .filter_map(|node| inner.trie.handlers(*node))
                .flatten()
                .cloned()
                .collect();

            let meta = EventMeta {
                topic: topic.to_string(),
                timestamp_millis,
                sequence: inner.sequence,
            };
            (meta, deliveries)
        };

        trace!(topic, sequence = meta.sequence, handlers = deliveries.len(), "Emitting");

        let mut delivered = 0;
        for registration in deliveries {
            if !registration.active.load(Ordering::Acquire) {
                continue;
            }

            if let Err(source) = registration.handler.handle_event(&message, &meta) {
                error!(topic, subscription_id = %registration.id, "Handler failed: {}", source);
                return Err(EventError::HandlerFailed {
                    topic: meta.topic,
                    subscription_id: registration.id,
                    source: Box::new(source),
                });
            }
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Alias of [`EventBus::emit`]
    pub fn publish(&self, topic: &str, message: M) -> EventResult<usize> {
        self.emit(topic, message)
    }

    /// Returns the retained emissions whose topic matches `pattern`, oldest first.
    ///
    /// Matching follows exactly the rules used by `emit`.
    pub fn history(&self, pattern: &str) -> Vec<HistoryEntry> {
        let pattern = TopicPattern::parse(pattern);

        let mut filter = Trie::new();
        let node = filter.add(pattern.tokens());
        filter.register(node, ());
        let mut verdicts = MatchCache::new(usize::MAX);

        let inner = self.inner.lock();
        let entries: Vec<HistoryEntry> = inner
            .history
            .iter()
            .filter(|entry| !verdicts.resolve(&entry.topic, &filter).is_empty())
            .cloned()
            .collect();

        debug!(%pattern, matched = entries.len(), retained = inner.history.len(), "History query");
        entries
    }

    /// Drops every retained emission
    pub fn clear_history(&self) {
        self.inner.lock().history.clear();
    }

    /// Number of retained emissions
    pub fn history_len(&self) -> usize {
        self.inner.lock().history.len()
    }

    /// Maximum number of retained emissions
    pub fn history_capacity(&self) -> usize {
        self.config.history_capacity
    }

    /// Returns the current number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().routes.len()
    }

    /// Returns the match cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.lock().cache.stats()
    }

    /// Returns the configuration the bus was built with
    pub fn config(&self) -> BusConfig {
        self.config
    }
}

/// Handle to one registered handler.
///
/// Dropping the handle leaves the handler registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<M> {
    id: Uuid,
    pattern: String,
    node: NodeId,
    active: Arc<AtomicBool>,
    bus: Weak<Mutex<BusInner<M>>>,
}

impl<M> Clone for Subscription<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            pattern: self.pattern.clone(),
            node: self.node,
            active: Arc::clone(&self.active),
            bus: Weak::clone(&self.bus),
        }
    }
}

impl<M> fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("node", &self.node)
            .field("active", &self.is_active())
            .finish()
    }
}

impl<M> Subscription<M> {
    /// Returns the subscription ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the pattern the handler was registered with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true until the handler has been removed
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Removes the handler from the bus.
    ///
    /// The trie path stays in place. Calling this again is a no-op.
    ///
    /// # Returns
    /// * `true` - If this call removed the handler
    /// * `false` - If it had already been removed
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }

        if let Some(inner) = self.bus.upgrade() {
            inner.lock().remove(self.id);
        }

        debug!(subscription_id = %self.id, pattern = %self.pattern, "Unsubscribed");
        true
    }
}
