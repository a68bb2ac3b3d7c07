//! Search notifications.
//!
//! A submitted search announces itself twice: a detailed
//! [`SearchEvent::ResultsChanged`] carrying the matched sets, and the
//! payload-less [`SearchEvent::SearchChanged`] that listeners use as a cue to
//! re-read the URL parameters.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::matcher::SearchResults;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 64;

/// The parameters a search was submitted with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmittedParams {
    /// Origin as typed.
    pub origin: String,
    /// Destination as typed.
    pub destination: String,
    /// Departure date.
    pub depart: String,
    /// Return date; empty for one-way.
    pub ret: String,
    /// Adult passengers.
    pub adults: u32,
}

/// Events emitted by a search session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SearchEvent {
    /// A search was submitted and matched.
    ResultsChanged {
        /// The matched sets.
        #[serde(flatten)]
        results: SearchResults,
        /// The submitted parameters.
        params: SubmittedParams,
    },
    /// The URL search state changed.
    SearchChanged,
}

impl SearchEvent {
    /// Event name, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResultsChanged { .. } => "searchResults",
            Self::SearchChanged => "searchChanged",
        }
    }
}

/// Fan-out of [`SearchEvent`]s to any number of subscribers.
///
/// Emitting never blocks and never fails; with no subscribers the event is
/// dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SearchEvent>,
}

impl EventBus {
    /// Create a bus whose subscribers can lag by up to `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Broadcast `event`. Returns how many subscribers received it.
    pub fn emit(&self, event: SearchEvent) -> usize {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event = name, delivered, "emitted event");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
