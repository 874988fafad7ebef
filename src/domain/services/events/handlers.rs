//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | EventHandler            | Trait for event handling                          | handle_event      |
// | EventLogger             | Bounded in-memory recorder of deliveries          | get_history       |
//--------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use parking_lot::RwLock;
use tracing::debug;

use super::event_types::{EventMeta, EventResult};

/// Event handler trait for processing messages delivered by the bus.
///
/// Implemented for every `Fn(&M, &EventMeta) -> EventResult<()>` closure.
pub trait EventHandler<M>: Send + Sync {
    /// Processes a message
    fn handle_event(&self, message: &M, meta: &EventMeta) -> EventResult<()>;
}

impl<M, F> EventHandler<M> for F
where
    F: Fn(&M, &EventMeta) -> EventResult<()> + Send + Sync,
{
    fn handle_event(&self, message: &M, meta: &EventMeta) -> EventResult<()> {
        self(message, meta)
    }
}

/// A simple in-memory event logger for debugging
pub struct EventLogger<M> {
    /// Maximum number of deliveries to keep in history
    max_history: usize,
    /// Delivery history, oldest first
    history: RwLock<VecDeque<(M, EventMeta)>>,
}

impl<M: Clone> EventLogger<M> {
    /// Creates a new event logger
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            history: RwLock::new(VecDeque::with_capacity(max_history.min(1024))),
        }
    }

    /// Returns the recorded deliveries, oldest first
    pub fn get_history(&self) -> Vec<(M, EventMeta)> {
        self.history.read().iter().cloned().collect()
    }

    /// Returns the topics of the recorded deliveries, oldest first
    pub fn topics(&self) -> Vec<String> {
        self.history
            .read()
            .iter()
            .map(|(_, meta)| meta.topic.clone())
            .collect()
    }

    /// Number of recorded deliveries
    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }
}

impl<M: Clone + Send + Sync> EventHandler<M> for EventLogger<M> {
    fn handle_event(&self, message: &M, meta: &EventMeta) -> EventResult<()> {
        if self.max_history == 0 {
            return Ok(());
        }

        let mut history = self.history.write();

        // Remove oldest delivery if at capacity
        if history.len() >= self.max_history {
            history.pop_front();
        }

        debug!(topic = %meta.topic, sequence = meta.sequence, "Logging event");
        history.push_back((message.clone(), meta.clone()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(topic: &str, sequence: u64) -> EventMeta {
        EventMeta {
            topic: topic.to_string(),
            timestamp_millis: 0,
            sequence,
        }
    }

    #[test]
    fn test_logger_keeps_most_recent() {
        let logger = EventLogger::<usize>::new(2);

        for (sequence, topic) in ["a", "b", "c"].into_iter().enumerate() {
            logger
                .handle_event(&sequence, &meta(topic, sequence as u64 + 1))
                .unwrap();
        }

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.topics(), vec!["b", "c"]);
        assert_eq!(logger.get_history()[0].0, 1);
    }

    #[test]
    fn test_closure_is_a_handler() {
        let handler = |message: &u32, meta: &EventMeta| -> EventResult<()> {
            assert_eq!(*message, 7);
            assert_eq!(meta.topic, "a");
            Ok(())
        };

        assert!(EventHandler::<u32>::handle_event(&handler, &7, &meta("a", 1)).is_ok());
    }
}
