//! Event System
//!
//! Pub/sub event bus through which a processing run reports its progress.

use std::path::PathBuf;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::diagnostics::Diagnostic;

/// Container tier a generation step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Application,
    Activity,
    Fragment,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Application => "application",
            Tier::Activity => "activity",
            Tier::Fragment => "fragment",
        }
    }
}

/// Events emitted while processing a round
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A processing round started
    RoundStarted { round: usize },
    /// A round was ignored because generation already succeeded
    RoundSkipped { round: usize },
    /// A class was accepted into a tier
    ClassProcessed { tier: Tier, class: String },
    /// A diagnostic was reported
    Diagnostic(Diagnostic),
    /// A generated source file was handed to the filer
    FileEmitted { package: String, name: String, path: Option<PathBuf> },
    /// A processing round finished
    RoundCompleted { round: usize, files: usize, errors: usize },
}

/// Subscriber handle for receiving events
#[derive(Clone)]
pub struct EventSubscription {
    receiver: Receiver<Event>,
}

impl EventSubscription {
    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Result<Event, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every event that is currently queued
    pub fn drain(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }
}

/// Event bus for publish/subscribe pattern
pub struct EventBus {
    subscribers: RwLock<Vec<Sender<Event>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> EventSubscription {
        let (sender, receiver) = unbounded();
        self.subscribers.write().push(sender);
        debug!("New event subscriber registered");
        EventSubscription { receiver }
    }

    /// Emit an event to all subscribers, returning how many received it
    pub fn emit(&self, event: Event) -> usize {
        let subscribers = self.subscribers.read();
        let delivered = subscribers
            .iter()
            .filter(|sender| sender.send(event.clone()).is_ok())
            .count();

        trace!("Event {:?} delivered to {} subscribers", event, delivered);
        delivered
    }

    /// Get the number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
