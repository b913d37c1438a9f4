//! Core aggregate and domain event traits.

use serde::{Serialize, de::DeserializeOwned};

/// A past-tense fact emitted by an [`Aggregate`] command.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, used for logging and metrics labels.
    fn event_type(&self) -> &'static str;
}

/// Trait for state containers driven by events.
///
/// Commands are decided against the current state and produce events;
/// events are then applied to move the state forward. Deciding never
/// mutates, applying never fails.
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Moves the state forward by one event. Deterministic and infallible.
    fn apply(&mut self, event: Self::Event);

    /// Applies `events` in order.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}
