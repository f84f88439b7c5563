//! Conversation state manager.
//!
//! [`ChatStore`] is a cheap-to-clone handle over one shared [`ChatState`].
//! Every operation mutates the state synchronously before and after its single
//! backend call, and never holds the lock across that call. Responses that
//! belong to a conversation the user has since left are recognized by a
//! generation counter and dropped.

mod bookings;
mod conversation;
mod send;
mod sessions;
mod trip;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join;
use tracing::error;

use crate::api::TravelApi;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::errors::AppError;
use crate::itinerary::Itinerary;
use crate::models::{BookingLedger, ConversationSummary, DisplayMessage, RouteData};

pub use trip::RouteSource;

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    // ── Session directory ────────────────────────────────────────────────────
    pub sessions: Vec<ConversationSummary>,
    pub has_more_sessions: bool,

    // ── Active conversation ──────────────────────────────────────────────────
    pub current_session_id: Option<String>,
    pub current_messages: Vec<DisplayMessage>,
    pub current_itinerary: Option<Itinerary>,

    // ── Trip view ────────────────────────────────────────────────────────────
    pub confirmed_trip: Option<Itinerary>,
    pub route_data: Option<RouteData>,

    pub bookings: BookingLedger,

    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChatState {
    /// True once an itinerary has been confirmed into a route.
    pub fn in_trip_view(&self) -> bool {
        self.route_data.is_some()
    }
}

#[derive(Default)]
struct Inner {
    view: ChatState,
    /// Bumped every time the active conversation is replaced or cleared.
    generation: u64,
    in_flight: usize,
    sessions_in_flight: usize,
    sending: bool,
}

impl Inner {
    /// Swaps the active conversation, dropping everything derived from the
    /// previous one in a single step.
    fn replace_active(&mut self, session_id: Option<String>) {
        self.generation += 1;
        self.view.current_session_id = session_id;
        self.view.current_messages.clear();
        self.view.current_itinerary = None;
        self.view.confirmed_trip = None;
        self.view.route_data = None;
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.view.is_loading = true;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.view.is_loading = self.in_flight > 0;
    }

    fn note_error(&mut self, operation: &str, err: &AppError) {
        error!("Failed to {operation}: {err}");
        self.view.error = Some(err.display_message());
    }
}

/// Shared handle to the chat state and the backend it talks to.
#[derive(Clone)]
pub struct ChatStore {
    api: Arc<dyn TravelApi>,
    inner: Arc<Mutex<Inner>>,
    page_size: usize,
}

impl ChatStore {
    pub fn new(api: Arc<dyn TravelApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner::default())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used when the store refreshes the directory on its own.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ChatState {
        self.lock().view.clone()
    }

    pub fn clear_error(&self) {
        self.lock().view.error = None;
    }

    /// Loads the first directory page and the booking ledger concurrently.
    pub async fn bootstrap(&self) -> Result<(), AppError> {
        let (sessions, bookings) =
            join(self.fetch_sessions(self.page_size), self.fetch_bookings()).await;
        sessions.and(bookings)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
