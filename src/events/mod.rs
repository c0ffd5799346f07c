//! Notification fan-out for store mutations.
//!
//! Delivery is best effort: events are not persisted or replayed, and a
//! subscriber only sees events published after it subscribed.

mod ws;

pub use ws::*;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging.
const CHANNEL_CAPACITY: usize = 256;

/// Event pushed to subscribers after a successful write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurveyEvent {
    NewSurvey {
        survey_id: String,
        title: String,
        public_url: String,
    },
    NewResponse {
        survey_id: String,
        response_id: String,
    },
}

/// Broadcast hub shared by all request handlers.
#[derive(Clone)]
pub struct EventHub {
    sender: broadcast::Sender<SurveyEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish to every current subscriber. Never fails the caller.
    pub fn publish(&self, event: SurveyEvent) {
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(receivers, "Event published"),
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(?event, "No subscribers, event dropped")
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurveyEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_response(n: usize) -> SurveyEvent {
        SurveyEvent::NewResponse {
            survey_id: "s1".to_string(),
            response_id: format!("r{}", n),
        }
    }

    #[test]
    fn test_publish_without_subscribers_does_not_fail() {
        let hub = EventHub::new();
        hub.publish(new_response(1));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.publish(new_response(1));

        assert_eq!(a.recv().await.unwrap(), new_response(1));
        assert_eq!(b.recv().await.unwrap(), new_response(1));
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let hub = EventHub::new();
        let _early = hub.subscribe();
        hub.publish(new_response(1));

        let mut late = hub.subscribe();
        hub.publish(new_response(2));

        assert_eq!(late.recv().await.unwrap(), new_response(2));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_and_continues() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();
        for n in 0..CHANNEL_CAPACITY + 5 {
            hub.publish(new_response(n));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(5))
        ));
        assert_eq!(rx.recv().await.unwrap(), new_response(5));
    }

    #[test]
    fn test_event_wire_format() {
        let event = SurveyEvent::NewSurvey {
            survey_id: "abc".to_string(),
            title: "Pulse Check".to_string(),
            public_url: "http://localhost/survey/abc".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], "new_survey");
        assert_eq!(value["survey_id"], "abc");

        let value = serde_json::to_value(new_response(7)).unwrap();
        assert_eq!(value["kind"], "new_response");
        assert_eq!(value["response_id"], "r7");
    }
}
