//! Match lifecycle events and the publishing contract.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use crate::{Match, MatchId, PublishError};

/// Lifecycle event broadcast to observers.
///
/// Serialized as `{"type": "GAME_UPDATED", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchEvent {
    /// A match was created.
    GameCreated(Match),
    /// A match was started or a move was accepted.
    GameUpdated(Match),
    /// A match was deleted.
    GameRemoved(MatchId),
}

impl MatchEvent {
    /// Returns the wire name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::GameCreated(_) => "GAME_CREATED",
            MatchEvent::GameUpdated(_) => "GAME_UPDATED",
            MatchEvent::GameRemoved(_) => "GAME_REMOVED",
        }
    }

    /// Returns the id of the match the event concerns.
    pub fn match_id(&self) -> MatchId {
        match self {
            MatchEvent::GameCreated(m) | MatchEvent::GameUpdated(m) => *m.id(),
            MatchEvent::GameRemoved(id) => *id,
        }
    }
}

/// Fire-and-forget broadcast of match events.
///
/// Delivery is at most once and unacknowledged. Errors are reported to the
/// caller for logging only; they never affect the state transition.
pub trait EventPublisher: Send + Sync {
    /// Publishes an event to all current subscribers.
    fn publish(&self, event: MatchEvent) -> Result<(), PublishError>;
}

/// Publisher backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<MatchEvent>,
}

impl BroadcastPublisher {
    /// Creates a publisher buffering up to `capacity` events per subscriber.
    #[instrument]
    pub fn new(capacity: usize) -> Self {
        info!(capacity, "Creating broadcast publisher");
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventPublisher for BroadcastPublisher {
    #[instrument(skip(self, event), fields(kind = event.kind(), match_id = %event.match_id()))]
    fn publish(&self, event: MatchEvent) -> Result<(), PublishError> {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "Event broadcast"),
            // No subscribers is not a failure.
            Err(_) => debug!("No subscribers for event"),
        }
        Ok(())
    }
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, event: MatchEvent) -> Result<(), PublishError> {
        debug!(kind = event.kind(), "Dropping event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerId;
    use chrono::Utc;

    #[test]
    fn test_event_wire_format() {
        let m = Match::create(PlayerId::new("u1"), Utc::now());
        let json = serde_json::to_value(MatchEvent::GameCreated(m.clone())).expect("Serialize failed");
        assert_eq!(json["type"], "GAME_CREATED");
        assert_eq!(json["payload"]["id"], m.id().to_string());
        assert_eq!(json["payload"]["status"], "created");

        let json = serde_json::to_value(MatchEvent::GameRemoved(*m.id())).expect("Serialize failed");
        assert_eq!(json["type"], "GAME_REMOVED");
        assert_eq!(json["payload"], m.id().to_string());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let publisher = BroadcastPublisher::new(8);
        let mut rx = publisher.subscribe();
        let m = Match::create(PlayerId::new("u1"), Utc::now());

        publisher
            .publish(MatchEvent::GameUpdated(m.clone()))
            .expect("Publish failed");

        let event = rx.recv().await.expect("Receive failed");
        assert_eq!(event, MatchEvent::GameUpdated(m));
    }

    #[test]
    fn test_broadcast_without_subscribers_is_ok() {
        let publisher = BroadcastPublisher::new(8);
        let m = Match::create(PlayerId::new("u1"), Utc::now());
        assert!(publisher.publish(MatchEvent::GameCreated(m)).is_ok());
        assert_eq!(publisher.subscriber_count(), 0);
    }
}
