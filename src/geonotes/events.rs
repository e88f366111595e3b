//! In-process publish/subscribe for use case side effects.
//!
//! Use cases publish an [`Event`] after their repository work has been
//! committed; delivery (mail, chat announcements) lives in subscribed
//! handlers. Handlers run synchronously, in subscription order, on the
//! publishing thread.
//!
//! A failing handler never fails the publishing use case. Its error is logged
//! and counted in the returned [`PublishReport`], and the remaining handlers
//! still run.

use crate::model::Note;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NoteAdded,
    UserRegistered,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::NoteAdded => "note_added",
            EventKind::UserRegistered => "user_registered",
        }
    }
}

/// Payload of a `user_registered` event. Carries the one-time activation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub activation_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Event {
    NoteAdded(Note),
    UserRegistered(Registration),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::NoteAdded(_) => EventKind::NoteAdded,
            Event::UserRegistered(_) => EventKind::UserRegistered,
        }
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Handler = Box<dyn Fn(&Event) -> Result<(), HandlerError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn publish(&self, event: &Event) -> PublishReport {
        let kind = event.kind();
        let mut report = PublishReport::default();

        for handler in self.handlers.get(&kind).into_iter().flatten() {
            match handler(event) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    log::warn!("Handler for {} failed: {}", kind.as_str(), e);
                    report.failed += 1;
                }
            }
        }

        log::debug!(
            "Published {} to {} handler(s), {} failed",
            kind.as_str(),
            report.delivered + report.failed,
            report.failed
        );
        report
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn registration() -> Event {
        Event::UserRegistered(Registration {
            email: "a@a.com".to_string(),
            username: "bob".to_string(),
            activation_token: "tok".to_string(),
        })
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(&registration()), PublishReport::default());
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for i in 0..3 {
            let seen = Arc::clone(&seen);
            bus.subscribe(EventKind::UserRegistered, move |_| {
                seen.lock().unwrap().push(i);
                Ok(())
            });
        }

        let report = bus.publish(&registration());
        assert_eq!(report.delivered, 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn only_matching_kind_is_delivered() {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::NoteAdded, |_| Err(HandlerError::new("never")));
        assert_eq!(bus.publish(&registration()).failed, 0);
        assert_eq!(bus.subscriber_count(EventKind::NoteAdded), 1);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let seen = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::UserRegistered, |_| {
            Err(HandlerError::new("smtp down"))
        });
        let counter = Arc::clone(&seen);
        bus.subscribe(EventKind::UserRegistered, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let report = bus.publish(&registration());
        assert_eq!(report, PublishReport { delivered: 1, failed: 1 });
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn event_serializes_with_its_name() {
        let value = serde_json::to_value(registration()).unwrap();
        assert_eq!(value["event"], "user_registered");
        assert_eq!(value["payload"]["username"], "bob");
    }
}
