//! Day-by-day itinerary model and the normalization of the irregular shapes
//! the assistant produces.
//!
//! Two source shapes are recognized:
//! - an array of day objects, optionally carrying `day` / `day_number`;
//! - an object keyed by day (`day_1`, `Day 2`, `day3`, ...), sorted by the
//!   number embedded in the key rather than by key order.
//!
//! Anything else normalizes to an empty itinerary instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One activity, hotel or transport item: either a bare string or the
/// object the assistant produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    Detail(Map<String, Value>),
}

const LABEL_KEYS: [&str; 6] = ["name", "description", "activity", "model", "title", "place"];

impl Entry {
    fn from_value(value: &Value) -> Option<Entry> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Entry::Text(s.clone())),
            Value::Object(map) => Some(Entry::Detail(map.clone())),
            other => Some(Entry::Text(other.to_string())),
        }
    }

    /// Human-readable name of the entry.
    pub fn label(&self) -> String {
        match self {
            Entry::Text(text) => text.clone(),
            Entry::Detail(map) => LABEL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        }
    }

    /// String field of a detailed entry, `None` for bare text.
    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            Entry::Text(_) => None,
            Entry::Detail(map) => map.get(key).and_then(Value::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day_number: u32,
    pub theme: String,
    pub activities: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Entry>,
}

/// Ordered sequence of days. Serializes as a plain array of days, which
/// normalizes back to the same value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Itinerary {
    pub days: Vec<Day>,
}

impl Itinerary {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Name of the first hotel mentioned, in day order.
    pub fn first_hotel_name(&self) -> Option<String> {
        self.days
            .iter()
            .find_map(|d| d.hotel.as_ref())
            .map(Entry::label)
    }

    /// Normalizes a raw itinerary value. Unrecognized shapes yield an empty
    /// itinerary.
    pub fn normalize(value: &Value) -> Itinerary {
        let days = match value {
            Value::Array(items) => days_from_array(items),
            Value::Object(map) => match map.get("days") {
                Some(inner @ (Value::Array(_) | Value::Object(_))) => {
                    return Itinerary::normalize(inner)
                }
                _ => days_from_keyed(map),
            },
            _ => Vec::new(),
        };
        Itinerary { days }
    }
}

impl<'de> Deserialize<'de> for Itinerary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Itinerary::normalize(&value))
    }
}

// ── Shape handlers ───────────────────────────────────────────────────────────

fn days_from_array(items: &[Value]) -> Vec<Day> {
    let mut days: Vec<Day> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let obj = item.as_object()?;
            let number = explicit_day_number(obj).unwrap_or(i as u32 + 1);
            Some(build_day(obj, number))
        })
        .collect();
    // Stable: already-ordered input is untouched.
    days.sort_by_key(|d| d.day_number);
    days
}

fn days_from_keyed(map: &Map<String, Value>) -> Vec<Day> {
    let mut keyed: Vec<(Option<u32>, &Map<String, Value>)> = map
        .iter()
        .filter_map(|(key, value)| Some((number_in_key(key), value.as_object()?)))
        .collect();
    keyed.sort_by_key(|(n, _)| n.unwrap_or(0));

    keyed
        .into_iter()
        .enumerate()
        .map(|(i, (key_number, obj))| {
            let number = key_number
                .or_else(|| explicit_day_number(obj))
                .unwrap_or(i as u32 + 1);
            build_day(obj, number)
        })
        .collect()
}

fn build_day(obj: &Map<String, Value>, day_number: u32) -> Day {
    let theme = ["theme", "title"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Day {day_number}"));

    let activities = match obj.get("activities") {
        Some(Value::Array(items)) => items.iter().filter_map(Entry::from_value).collect(),
        Some(Value::String(s)) => vec![Entry::Text(s.clone())],
        _ => Vec::new(),
    };

    Day {
        day_number,
        theme,
        activities,
        hotel: first_present(obj, &["hotels", "hotel"]),
        transport: first_present(obj, &["transport", "cab"]),
    }
}

fn first_present(obj: &Map<String, Value>, keys: &[&str]) -> Option<Entry> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Entry::from_value))
}

fn explicit_day_number(obj: &Map<String, Value>) -> Option<u32> {
    ["day", "day_number"].iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).filter(|n| *n > 0),
        Value::String(s) => number_in_key(s),
        _ => None,
    })
}

/// Number formed by the digits of `key`; zero counts as absent.
fn number_in_key(key: &str) -> Option<u32> {
    let digits: String = key.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}
