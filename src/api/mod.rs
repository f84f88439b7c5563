pub mod http;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    BookingLedger, ConversationSummary, HotelBooking, HotelBookingRequest, Message, RouteData,
    SessionStart, TransportBooking, TransportBookingRequest, TripPlanRequest,
};

pub use http::HttpTravelApi;

/// The trip-planning backend as seen by the chat store.
///
/// Implementations own transport concerns only; all local state handling
/// lives in [`crate::store::ChatStore`].
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// Conversations ordered newest-updated first. `before` restricts the page
    /// to conversations updated strictly earlier than that timestamp.
    async fn list_sessions(
        &self,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<ConversationSummary>, AppError>;

    /// Every stored exchange of one conversation, oldest first.
    async fn get_session(&self, session_id: &str) -> Result<Vec<Message>, AppError>;

    async fn start_session(
        &self,
        user_input: &str,
        submitted_data: Option<serde_json::Value>,
    ) -> Result<SessionStart, AppError>;

    async fn post_message(
        &self,
        session_id: &str,
        user_input: &str,
        submitted_data: Option<serde_json::Value>,
    ) -> Result<Message, AppError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;

    async fn plan_trip(&self, request: &TripPlanRequest) -> Result<RouteData, AppError>;

    async fn book_hotel(&self, request: &HotelBookingRequest) -> Result<HotelBooking, AppError>;

    async fn book_transport(
        &self,
        request: &TransportBookingRequest,
    ) -> Result<TransportBooking, AppError>;

    async fn cancel_hotel_booking(&self, booking_id: &str) -> Result<(), AppError>;

    async fn cancel_transport_booking(&self, booking_id: &str) -> Result<(), AppError>;

    async fn list_bookings(&self) -> Result<BookingLedger, AppError>;
}
