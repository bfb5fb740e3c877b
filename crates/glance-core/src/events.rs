//! Host events and the queue feeding the dispatch loop
//!
//! Producers (the phone transport, the minute timer, the host asking for a
//! repaint) push into an [`EventQueue`]; one loop drains it and hands every
//! event to [`GlanceState::dispatch`](crate::state::GlanceState::dispatch)
//! in arrival order.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

use crate::message::InboundMessage;

/// Channel capacity for pending events
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Something the watchface has to react to
#[derive(Debug, Clone)]
pub enum Event {
    /// A message from the phone, stamped with its arrival time (seconds)
    Message {
        message: InboundMessage,
        received_at: i64,
    },
    /// Once per minute, carrying the current time (seconds)
    MinuteTick { now: i64 },
    /// The host needs the whole face drawn again
    Redraw,
}

impl Event {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::MinuteTick { .. } => "minute tick",
            Self::Redraw => "redraw",
        }
    }
}

/// Bounded FIFO of [`Event`]s, safe to share as a `static`.
pub struct EventQueue {
    channel: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue an event. A full queue hands the event back.
    pub fn push(&self, event: Event) -> Result<(), Event> {
        self.channel.try_send(event).map_err(|err| {
            let TrySendError::Full(event) = err;
            warn!("Event queue full, dropping {}", event.name());
            event
        })
    }

    /// Next pending event, oldest first.
    pub fn pop(&self) -> Option<Event> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
