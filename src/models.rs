use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::itinerary::Itinerary;

/// Prefix of the text in synthetic error bubbles.
pub const ERROR_MARKER: &str = "⚠️";

// ── Session directory ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(alias = "convo_id")]
    pub id: String,
    #[serde(alias = "conversation_title", default)]
    pub title: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub has_itinerary: bool,
}

// ── Stored exchanges ─────────────────────────────────────────────────────────

/// One stored exchange: the user's input and the assistant's output together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub user_input: String,
    #[serde(default)]
    pub ai_generated_output: AiContent,
    #[serde(default)]
    pub submitted_data: Option<Value>,
    pub timestamp: String,
}

impl Message {
    /// Projects the exchange into its user bubble followed by its AI bubble.
    pub fn expand(&self) -> [DisplayMessage; 2] {
        [
            DisplayMessage {
                key: MessageKey::Committed { message_id: self.message_id.clone(), role: Role::User },
                role: Role::User,
                content: DisplayContent::Text(self.user_input.clone()),
                submitted_data: self.submitted_data.clone(),
                timestamp: self.timestamp.clone(),
            },
            DisplayMessage {
                key: MessageKey::Committed { message_id: self.message_id.clone(), role: Role::Ai },
                role: Role::Ai,
                content: DisplayContent::Ai(self.ai_generated_output.clone()),
                submitted_data: None,
                timestamp: self.timestamp.clone(),
            },
        ]
    }
}

/// Full history of one conversation as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDetail {
    #[serde(alias = "convo_id", default)]
    pub id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Result of starting a conversation with its first message.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStart {
    #[serde(alias = "convo_id")]
    pub session_id: String,
    #[serde(alias = "first_message")]
    pub message: Message,
}

/// Body of both "start conversation" and "post message".
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub user_input: String,
    pub submitted_data: Option<Value>,
}

// ── Assistant payload ────────────────────────────────────────────────────────

/// Assistant output: plain text, or text plus form controls and an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AiContent {
    Text(String),
    Structured {
        text: String,
        ui_elements: Vec<UiElement>,
        itinerary: Option<Itinerary>,
    },
}

impl Default for AiContent {
    fn default() -> Self {
        AiContent::Text(String::new())
    }
}

impl AiContent {
    pub fn text(&self) -> &str {
        match self {
            AiContent::Text(text) | AiContent::Structured { text, .. } => text,
        }
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self {
            AiContent::Structured { itinerary, .. } => itinerary.as_ref(),
            AiContent::Text(_) => None,
        }
    }

    pub fn ui_elements(&self) -> &[UiElement] {
        match self {
            AiContent::Structured { ui_elements, .. } => ui_elements,
            AiContent::Text(_) => &[],
        }
    }
}

impl From<Value> for AiContent {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => AiContent::Text(text),
            Value::Null => AiContent::Text(String::new()),
            Value::Object(obj) => {
                let text = obj.get("text").and_then(Value::as_str).unwrap_or_default().to_string();
                let ui_elements = match obj.get("ui_elements") {
                    Some(Value::Array(items)) => items.iter().filter_map(UiElement::from_value).collect(),
                    _ => Vec::new(),
                };
                // An itinerary that normalizes to no days counts as absent.
                let itinerary = obj
                    .get("itinerary")
                    .filter(|v| !v.is_null())
                    .map(Itinerary::normalize)
                    .filter(|it| !it.is_empty());
                AiContent::Structured { text, ui_elements, itinerary }
            }
            other => AiContent::Text(other.to_string()),
        }
    }
}

impl From<AiContent> for Value {
    fn from(content: AiContent) -> Self {
        match content {
            AiContent::Text(text) => Value::String(text),
            AiContent::Structured { text, ui_elements, itinerary } => json!({
                "text": text,
                "ui_elements": ui_elements.iter().map(UiElement::to_value).collect::<Vec<_>>(),
                "itinerary": itinerary,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiElementKind {
    DatePicker,
    Select,
    Text,
    Number,
    Other(String),
}

impl UiElementKind {
    fn parse(raw: &str) -> Self {
        match raw {
            "date_picker" | "date" => UiElementKind::DatePicker,
            "select" | "single_select" | "chips" => UiElementKind::Select,
            "text" => UiElementKind::Text,
            "number" => UiElementKind::Number,
            other => UiElementKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UiElementKind::DatePicker => "date_picker",
            UiElementKind::Select => "select",
            UiElementKind::Text => "text",
            UiElementKind::Number => "number",
            UiElementKind::Other(raw) => raw,
        }
    }
}

/// Declarative form control the assistant asks the user to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiElement {
    pub kind: UiElementKind,
    pub label: String,
    /// Key the answer is submitted under.
    pub field: String,
    pub options: Vec<String>,
}

impl UiElement {
    fn from_value(value: &Value) -> Option<UiElement> {
        let obj = value.as_object()?;
        let str_of = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str))
                .unwrap_or_default()
                .to_string()
        };
        let options = ["options", "suggested_values"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .map(|items| {
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Some(UiElement {
            kind: UiElementKind::parse(&str_of(&["type"])),
            label: str_of(&["label"]),
            field: str_of(&["field", "key"]),
            options,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "type": self.kind.as_str(),
            "label": self.label,
            "field": self.field,
            "options": self.options,
        })
    }
}

// ── Client-side chat projection ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Optimistic user bubble awaiting the backend.
    Pending(Uuid),
    /// Half of a stored exchange.
    Committed { message_id: String, role: Role },
    /// Locally synthesized error bubble.
    Notice(Uuid),
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKey::Pending(id) => write!(f, "pending-{id}"),
            MessageKey::Committed { message_id, role } => write!(f, "{message_id}_{role}"),
            MessageKey::Notice(id) => write!(f, "notice-{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayContent {
    Text(String),
    Ai(AiContent),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    pub key: MessageKey,
    pub role: Role,
    pub content: DisplayContent,
    pub submitted_data: Option<Value>,
    pub timestamp: String,
}

impl DisplayMessage {
    pub fn pending(text: impl Into<String>, submitted_data: Option<Value>) -> Self {
        Self {
            key: MessageKey::Pending(Uuid::new_v4()),
            role: Role::User,
            content: DisplayContent::Text(text.into()),
            submitted_data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error_notice(detail: &str) -> Self {
        Self {
            key: MessageKey::Notice(Uuid::new_v4()),
            role: Role::Ai,
            content: DisplayContent::Error(format!("{ERROR_MARKER} {detail}")),
            submitted_data: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn text(&self) -> &str {
        match &self.content {
            DisplayContent::Text(text) | DisplayContent::Error(text) => text,
            DisplayContent::Ai(ai) => ai.text(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.key, MessageKey::Pending(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.content, DisplayContent::Error(_))
    }
}

// ── Route planning ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TripPlanRequest {
    pub place_names: Vec<String>,
    pub hotel_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub road_time_mins: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaceDetail {
    pub fn stub(name: impl Into<String>) -> Self {
        Self { name: name.into(), extra: Map::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteData {
    pub ordered_route: Vec<String>,
    pub legs: Vec<RouteLeg>,
    pub places_detail: Vec<PlaceDetail>,
    pub hotels_detail: Vec<PlaceDetail>,
    pub transport_options: Vec<Value>,
    pub total_road_time_mins: Option<f64>,
}

impl RouteData {
    /// Route built from names alone when the planner is unreachable.
    pub fn fallback(place_names: &[String], hotel_name: Option<&str>) -> Self {
        Self {
            ordered_route: place_names.to_vec(),
            legs: Vec::new(),
            places_detail: place_names.iter().map(PlaceDetail::stub).collect(),
            hotels_detail: hotel_name.map(PlaceDetail::stub).into_iter().collect(),
            transport_options: Vec::new(),
            total_road_time_mins: None,
        }
    }
}

// ── Bookings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelBookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    pub hotel_name: String,
    pub location: String,
    pub room_type: String,
    pub check_in_date: String,
    pub check_out_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelBooking {
    pub booking_id: String,
    pub hotel_id: Option<String>,
    #[serde(alias = "name")]
    pub hotel_name: String,
    pub location: String,
    pub room_type: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub booked_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportBookingRequest {
    pub agency_name: String,
    pub vehicle_category: String,
    pub vehicle_type: String,
    pub model: String,
    pub trip_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportBooking {
    pub booking_id: String,
    #[serde(alias = "agency")]
    pub agency_name: String,
    pub vehicle_category: String,
    #[serde(alias = "type")]
    pub vehicle_type: String,
    pub model: String,
    pub trip_date: String,
    pub booked_at: Option<String>,
}

/// Confirmed bookings, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingLedger {
    pub hotels: Vec<HotelBooking>,
    pub transport: Vec<TransportBooking>,
}

impl BookingLedger {
    pub fn is_hotel_booked(&self, hotel_name: &str) -> bool {
        self.hotels.iter().any(|b| b.hotel_name == hotel_name)
    }

    pub fn is_transport_booked(&self, model: &str) -> bool {
        self.transport.iter().any(|b| b.model == model)
    }
}
