use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::TravelApi;
use crate::config::ClientConfig;
use crate::errors::AppError;
use crate::models::{
    BookingLedger, ChatRequest, ConversationDetail, ConversationSummary, HotelBooking,
    HotelBookingRequest, Message, RouteData, SessionStart, TransportBooking,
    TransportBookingRequest, TripPlanRequest,
};

/// [`TravelApi`] over the backend's JSON REST endpoints.
#[derive(Clone)]
pub struct HttpTravelApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTravelApi {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::InvalidConfig {
                key: "http client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let resp = self.authorize(request).send().await.map_err(|e| {
            error!("Request to trip backend failed: {e}");
            AppError::network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let detail = rejection_detail(&body);
        error!("Trip backend rejected request ({status}): {detail}");
        Err(AppError::Rejected { status: status.as_u16(), detail })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let resp = self.send(request).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Unexpected response shape from trip backend: {e}");
            AppError::malformed(e.to_string())
        })
    }
}

/// Backend errors carry `{"detail": ...}`; anything else is shown raw.
fn rejection_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl TravelApi for HttpTravelApi {
    async fn list_sessions(
        &self,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = before {
            query.push(("last_updated_at", cursor.to_string()));
        }
        debug!(limit, ?before, "listing sessions");
        self.send_json(self.client.get(self.url("/user/chat/sessions")).query(&query))
            .await
    }

    async fn get_session(&self, session_id: &str) -> Result<Vec<Message>, AppError> {
        let detail: ConversationDetail = self
            .send_json(self.client.get(self.url(&format!("/user/chat/sessions/{session_id}"))))
            .await?;
        Ok(detail.messages)
    }

    async fn start_session(
        &self,
        user_input: &str,
        submitted_data: Option<Value>,
    ) -> Result<SessionStart, AppError> {
        let body = ChatRequest { user_input: user_input.to_string(), submitted_data };
        self.send_json(self.client.post(self.url("/user/chat/new")).json(&body))
            .await
    }

    async fn post_message(
        &self,
        session_id: &str,
        user_input: &str,
        submitted_data: Option<Value>,
    ) -> Result<Message, AppError> {
        let body = ChatRequest { user_input: user_input.to_string(), submitted_data };
        self.send_json(
            self.client
                .post(self.url(&format!("/user/chat/{session_id}/message")))
                .json(&body),
        )
        .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        self.send(self.client.delete(self.url(&format!("/user/chat/sessions/{session_id}"))))
            .await?;
        Ok(())
    }

    async fn plan_trip(&self, request: &TripPlanRequest) -> Result<RouteData, AppError> {
        self.send_json(self.client.post(self.url("/user/trip/plan")).json(request))
            .await
    }

    async fn book_hotel(&self, request: &HotelBookingRequest) -> Result<HotelBooking, AppError> {
        self.send_json(self.client.post(self.url("/user/bookings/hotels")).json(request))
            .await
    }

    async fn book_transport(
        &self,
        request: &TransportBookingRequest,
    ) -> Result<TransportBooking, AppError> {
        self.send_json(self.client.post(self.url("/user/bookings/transport")).json(request))
            .await
    }

    async fn cancel_hotel_booking(&self, booking_id: &str) -> Result<(), AppError> {
        self.send(self.client.delete(self.url(&format!("/user/hotel-bookings/{booking_id}"))))
            .await?;
        Ok(())
    }

    async fn cancel_transport_booking(&self, booking_id: &str) -> Result<(), AppError> {
        self.send(
            self.client
                .delete(self.url(&format!("/user/transport-bookings/{booking_id}"))),
        )
        .await?;
        Ok(())
    }

    async fn list_bookings(&self) -> Result<BookingLedger, AppError> {
        self.send_json(self.client.get(self.url("/user/bookings/all")))
            .await
    }
}
