#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;
use xplorer_client::models::{
    BookingLedger, ConversationSummary, HotelBooking, HotelBookingRequest, Message, RouteData,
    SessionStart, TransportBooking, TransportBookingRequest, TripPlanRequest,
};
use xplorer_client::{AppError, ChatStore, TravelApi};

/// Scripted in-memory backend.
#[derive(Default)]
pub struct FakeApi {
    /// Newest-updated first.
    pub sessions: Mutex<Vec<ConversationSummary>>,
    pub conversations: Mutex<HashMap<String, Vec<Message>>>,
    pub replies: Mutex<VecDeque<Value>>,
    pub route: Mutex<Option<RouteData>>,
    pub ledger: Mutex<BookingLedger>,
    /// Operation names that fail with a 500.
    pub failing: Mutex<HashSet<&'static str>>,
    /// One-shot holds keyed by session id, `"list"`, `"new"` or `"plan"`.
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn store(self: &Arc<Self>) -> ChatStore {
        ChatStore::new(self.clone()).with_page_size(10)
    }

    pub fn with_sessions(self: &Arc<Self>, count: usize) -> &Arc<Self> {
        let mut sessions = self.sessions.lock().unwrap();
        for i in (0..count).rev() {
            sessions.push(summary(&format!("s{i}"), &format!("2026-10-{:02}T10:00:00", i + 1)));
        }
        drop(sessions);
        self
    }

    pub fn with_conversation(self: &Arc<Self>, id: &str, messages: Vec<Message>) -> &Arc<Self> {
        self.conversations.lock().unwrap().insert(id.to_string(), messages);
        self
    }

    pub fn reply_with(&self, output: Value) {
        self.replies.lock().unwrap().push_back(output);
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn gate(&self, session_id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(session_id.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(operation)).count()
    }

    fn record(&self, call: String, operation: &'static str) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AppError::Rejected { status: 500, detail: format!("{operation} exploded") });
        }
        Ok(())
    }

    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().remove(key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn exchange(&self, user_input: &str, submitted_data: Option<Value>) -> Message {
        let output = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({ "text": format!("echo: {user_input}") }));
        let mut exchange = message(&self.next_id("m"), user_input, output);
        exchange.submitted_data = submitted_data;
        exchange
    }
}

#[async_trait]
impl TravelApi for FakeApi {
    async fn list_sessions(
        &self,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        self.pass_gate("list").await;
        self.record(format!("list_sessions {limit} {before:?}"), "list_sessions")?;
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .filter(|s| before.map_or(true, |cursor| s.updated_at.as_str() < cursor))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Reads the history before waiting at the gate, like a response that
    /// is slow to arrive.
    async fn get_session(&self, session_id: &str) -> Result<Vec<Message>, AppError> {
        let history = self
            .conversations
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        self.pass_gate(session_id).await;
        self.record(format!("get_session {session_id}"), "get_session")?;
        Ok(history)
    }

    async fn start_session(
        &self,
        user_input: &str,
        submitted_data: Option<Value>,
    ) -> Result<SessionStart, AppError> {
        self.pass_gate("new").await;
        self.record(format!("start_session {user_input}"), "start_session")?;
        let session_id = self.next_id("s");
        let message = self.exchange(user_input, submitted_data);
        self.conversations
            .lock()
            .unwrap()
            .insert(session_id.clone(), vec![message.clone()]);
        self.sessions
            .lock()
            .unwrap()
            .insert(0, summary(&session_id, "2026-10-19T12:00:00"));
        Ok(SessionStart { session_id, message })
    }

    async fn post_message(
        &self,
        session_id: &str,
        user_input: &str,
        submitted_data: Option<Value>,
    ) -> Result<Message, AppError> {
        self.pass_gate(session_id).await;
        self.record(format!("post_message {session_id} {user_input}"), "post_message")?;
        let message = self.exchange(user_input, submitted_data);
        self.conversations
            .lock()
            .unwrap()
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        self.record(format!("delete_session {session_id}"), "delete_session")?;
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn plan_trip(&self, request: &TripPlanRequest) -> Result<RouteData, AppError> {
        self.pass_gate("plan").await;
        self.record(format!("plan_trip {}", request.place_names.join(",")), "plan_trip")?;
        Ok(self.route.lock().unwrap().clone().unwrap_or_default())
    }

    async fn book_hotel(&self, request: &HotelBookingRequest) -> Result<HotelBooking, AppError> {
        self.record(format!("book_hotel {}", request.hotel_name), "book_hotel")?;
        Ok(HotelBooking {
            booking_id: self.next_id("hb"),
            hotel_id: request.hotel_id.clone(),
            hotel_name: request.hotel_name.clone(),
            location: request.location.clone(),
            room_type: request.room_type.clone(),
            check_in_date: request.check_in_date.clone(),
            check_out_date: request.check_out_date.clone(),
            booked_at: Some("2026-10-19T12:00:00".to_string()),
        })
    }

    async fn book_transport(
        &self,
        request: &TransportBookingRequest,
    ) -> Result<TransportBooking, AppError> {
        self.record(format!("book_transport {}", request.model), "book_transport")?;
        Ok(TransportBooking {
            booking_id: self.next_id("tb"),
            agency_name: request.agency_name.clone(),
            vehicle_category: request.vehicle_category.clone(),
            vehicle_type: request.vehicle_type.clone(),
            model: request.model.clone(),
            trip_date: request.trip_date.clone(),
            booked_at: None,
        })
    }

    async fn cancel_hotel_booking(&self, booking_id: &str) -> Result<(), AppError> {
        self.record(format!("cancel_hotel_booking {booking_id}"), "cancel_hotel_booking")
    }

    async fn cancel_transport_booking(&self, booking_id: &str) -> Result<(), AppError> {
        self.record(format!("cancel_transport_booking {booking_id}"), "cancel_transport_booking")
    }

    async fn list_bookings(&self) -> Result<BookingLedger, AppError> {
        self.record("list_bookings".to_string(), "list_bookings")?;
        Ok(self.ledger.lock().unwrap().clone())
    }
}

// ── Builders ─────────────────────────────────────────────────────────────────

pub fn summary(id: &str, updated_at: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.to_string(),
        title: format!("Trip {id}"),
        created_at: updated_at.to_string(),
        updated_at: updated_at.to_string(),
        message_count: 2,
        has_itinerary: false,
    }
}

pub fn message(id: &str, user_input: &str, output: Value) -> Message {
    serde_json::from_value(json!({
        "message_id": id,
        "user_input": user_input,
        "ai_generated_output": output,
        "timestamp": "2026-10-19T09:00:00Z",
    }))
    .expect("valid message fixture")
}

pub fn hotel_request(name: &str) -> HotelBookingRequest {
    HotelBookingRequest {
        hotel_id: None,
        hotel_name: name.to_string(),
        location: "Chennai".to_string(),
        room_type: "Deluxe".to_string(),
        check_in_date: "2026-11-02".to_string(),
        check_out_date: "2026-11-04".to_string(),
    }
}

pub fn itinerary_reply(text: &str, days: &[&str]) -> Value {
    let days: Vec<Value> = days
        .iter()
        .map(|theme| json!({ "theme": theme, "activities": [format!("{theme} walk")] }))
        .collect();
    json!({ "text": text, "ui_elements": [], "itinerary": days })
}
