//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the topic bus: handlers subscribe to dot-delimited patterns and are
// invoked synchronously for every emitted topic the pattern matches. Recent emissions are kept
// in a bounded history that can be queried with the same patterns.
//
// | Component                | Description                                                |
// |--------------------------|-----------------------------------------------------------|
// | EventBus                 | Routes topics to handlers, records history                 |
// | Subscription             | Handle that removes one handler                            |
// | EventHandler             | Trait for components that can handle events               |
// | EventLogger              | Bounded in-memory recorder usable as a handler             |
// | EventMeta                | Topic, timestamp and sequence delivered with each message  |
//--------------------------------------------------------------------------------------------------

mod event_types;
mod event_bus;
mod handlers;


// Re-exports
pub use event_types::{EventError, EventMeta, EventResult};
pub use event_bus::{EventBus, Subscription};
pub use handlers::{EventHandler, EventLogger};
