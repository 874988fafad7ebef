//--------------------------------------------------------------------------------------------------
// STRUCTS & ENUMS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | EventMeta               | Delivery metadata passed to every handler         | clone, serialize  |
// | EventError              | Error types for event processing                  | error, source     |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the event system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    /// Raised by a handler that failed to process a message
    #[error("Failed to process event: {0}")]
    ProcessingError(String),

    /// A handler failed during emission; remaining handlers were skipped
    #[error("Handler {subscription_id} failed on topic '{topic}'")]
    HandlerFailed {
        /// Topic being emitted
        topic: String,
        /// Subscription whose handler failed
        subscription_id: Uuid,
        /// Error returned by the handler
        #[source]
        source: Box<EventError>,
    },
}

/// Type alias for Result with EventError
pub type EventResult<T> = Result<T, EventError>;

/// Metadata delivered alongside every message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Topic the message was emitted on
    pub topic: String,
    /// Emission time in milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    /// Per-bus emission counter, starting at 1
    pub sequence: u64,
}
