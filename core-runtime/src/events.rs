//! Notifications published by the gallery core
//!
//! A search announces itself with [`SearchEvent::Started`] and settles with
//! exactly one of `Completed`, `NothingFound`, `Failed` or `Superseded`.
//! Favorites changes follow each toggle. Delivery uses
//! `tokio::sync::broadcast`: subscribers only see events sent after they
//! subscribed, and one that falls more than the bus capacity behind gets
//! `RecvError::Lagged` before catching up.
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SearchEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Search(SearchEvent::Started {
//!     query: "Monet".to_string(),
//! }))
//! .ok();
//!
//! assert_eq!(rx.recv().await.unwrap().description(), "Search started");
//! # }
//! ```
//!
//! `emit` fails when nobody is subscribed; publishers ignore that.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, SendError, TryRecvError},
    Receiver,
};

/// Default number of events buffered per subscriber
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Top-level event enum published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Search(SearchEvent),
    Favorites(FavoritesEvent),
}

impl CoreEvent {
    /// Short label for logs
    pub fn description(&self) -> &'static str {
        match self {
            CoreEvent::Search(e) => e.description(),
            CoreEvent::Favorites(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Search(SearchEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Search(SearchEvent::Completed { .. }) => EventSeverity::Info,
            CoreEvent::Search(SearchEvent::NothingFound { .. }) => EventSeverity::Info,
            CoreEvent::Favorites(FavoritesEvent::Loaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Lifecycle of a single search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SearchEvent {
    /// A search was issued; results and error message were cleared.
    Started { query: String },
    /// The search returned at least one artwork.
    Completed { query: String, result_count: usize },
    /// The search succeeded with zero matches.
    NothingFound { query: String },
    /// The initial search call failed.
    Failed { query: String, message: String },
    /// A newer search started before this one finished.
    Superseded { query: String },
}

impl SearchEvent {
    pub fn description(&self) -> &'static str {
        match self {
            SearchEvent::Started { .. } => "Search started",
            SearchEvent::Completed { .. } => "Search completed",
            SearchEvent::NothingFound { .. } => "Search found nothing",
            SearchEvent::Failed { .. } => "Search failed",
            SearchEvent::Superseded { .. } => "Search superseded",
        }
    }
}

/// Changes to the saved favorites list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum FavoritesEvent {
    Loaded { count: usize },
    Added { artwork_id: i64 },
    Removed { artwork_id: i64 },
}

impl FavoritesEvent {
    pub fn description(&self) -> &'static str {
        match self {
            FavoritesEvent::Loaded { .. } => "Favorites loaded",
            FavoritesEvent::Added { .. } => "Favorite added",
            FavoritesEvent::Removed { .. } => "Favorite removed",
        }
    }
}

/// Central broadcast channel for [`CoreEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// [`subscribe`](Self::subscribe) wrapped in an unfiltered [`EventStream`]
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Subscription that skips events rejected by a predicate
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let favorites = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Favorites(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Replace the predicate; the stream keeps events for which it is true
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Some(Box::new(predicate)),
            ..self
        }
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        match &self.filter {
            Some(predicate) => predicate(event),
            None => true,
        }
    }

    /// Wait for the next accepted event
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` after `n` events were overwritten unread, and
    /// `RecvError::Closed` once the bus is gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Next accepted event already buffered, or `None` if there is none yet
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(missed)) => return Some(Err(RecvError::Lagged(missed))),
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            };
            if self.accepts(&event) {
                return Some(Ok(event));
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
