//! Domain events: what happened during a turn, for anyone listening.
//!
//! The conversation loop publishes events as it runs; subscribers (logging
//! sinks, tests, diagnostics) observe them without coupling to the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A turn began
    TurnStarted {
        turn_id: String,
        history_len: usize,
        timestamp: DateTime<Utc>,
    },

    /// The model answered one round
    ModelResponded {
        turn_id: String,
        round: u32,
        model: String,
        tool_calls: usize,
        tokens_used: Option<u32>,
        timestamp: DateTime<Utc>,
    },

    /// A tool call was dispatched
    ToolExecuted {
        turn_id: String,
        tool_name: String,
        call_id: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A turn produced its final reply
    TurnCompleted {
        turn_id: String,
        rounds: u32,
        round_limit_hit: bool,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Short snake_case name, used as the log field for the event.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::TurnStarted { .. } => "turn_started",
            DomainEvent::ModelResponded { .. } => "model_responded",
            DomainEvent::ToolExecuted { .. } => "tool_executed",
            DomainEvent::TurnCompleted { .. } => "turn_completed",
        }
    }
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Spawn a task that writes every event on `bus` to the `debug` log.
///
/// The task ends once the bus is dropped. Must be called inside a Tokio runtime.
pub fn spawn_log_sink(bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = serde_json::to_string(event.as_ref()).unwrap_or_default();
                    tracing::debug!(event = event.kind(), %data, "Domain event");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event log sink fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ToolExecuted {
            turn_id: "t1".into(),
            tool_name: "record_user_details".into(),
            call_id: "call_1".into(),
            success: true,
            duration_ms: 42,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::ToolExecuted { tool_name, success, .. } => {
                assert_eq!(tool_name, "record_user_details");
                assert!(success);
            }
            _ => panic!("Expected ToolExecuted event"),
        }
    }

    #[tokio::test]
    async fn log_sink_drains_events_and_stops_with_the_bus() {
        let bus = EventBus::new(16);
        let sink = spawn_log_sink(&bus);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(DomainEvent::TurnCompleted {
            turn_id: "t1".into(),
            rounds: 2,
            round_limit_hit: false,
            timestamp: Utc::now(),
        });
        drop(bus);

        tokio::time::timeout(std::time::Duration::from_secs(1), sink)
            .await
            .expect("sink should stop once the bus is gone")
            .unwrap();
    }

    #[test]
    fn event_kinds_are_snake_case() {
        let event = DomainEvent::ModelResponded {
            turn_id: "t1".into(),
            round: 1,
            model: "gpt-4o-mini".into(),
            tool_calls: 0,
            tokens_used: None,
            timestamp: Utc::now(),
        };
        assert_eq!(event.kind(), "model_responded");
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::TurnStarted {
            turn_id: "t1".into(),
            history_len: 0,
            timestamp: Utc::now(),
        });
    }
}
