//! Per-module payload adapters
//!
//! Admin forms edit a UI-friendly shape (prices in rupees, lists as comma
//! separated text); the API stores the wire shape (integer cents, arrays).
//! Each module descriptor carries the adapter pair for its resource.

use serde_json::Value;

/// Converts between the form shape and the wire shape of one resource
pub trait WireTransform: Send + Sync {
    /// Form payload → request body (before create/update)
    fn to_wire(&self, payload: Value) -> Value;
    /// List item → form/table shape (after fetch)
    fn from_wire(&self, item: Value) -> Value;
}

/// Resources whose wire shape is already what the forms edit
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl WireTransform for Passthrough {
    fn to_wire(&self, payload: Value) -> Value {
        payload
    }

    fn from_wire(&self, item: Value) -> Value {
        item
    }
}

/// Rooms: `basePriceRupees` ↔ `basePriceCents`, `amenitiesCsv` ↔ `amenities`,
/// `imagesCsv` ↔ `images`
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomsTransform;

impl RoomsTransform {
    pub const PRICE_FORM: &'static str = "basePriceRupees";
    pub const PRICE_WIRE: &'static str = "basePriceCents";
    pub const LIST_FIELDS: [(&'static str, &'static str); 2] =
        [("amenitiesCsv", "amenities"), ("imagesCsv", "images")];
}

impl WireTransform for RoomsTransform {
    fn to_wire(&self, payload: Value) -> Value {
        let Value::Object(mut obj) = payload else {
            return payload;
        };

        if let Some(price) = obj.remove(Self::PRICE_FORM)
            && let Some(rupees) = number_of(&price)
        {
            obj.insert(Self::PRICE_WIRE.into(), Value::from(rupees_to_cents(rupees)));
        }

        for (form_key, wire_key) in Self::LIST_FIELDS {
            if let Some(text) = obj.remove(form_key) {
                let items = match &text {
                    Value::String(s) => split_csv(s),
                    Value::Array(_) => string_list(&text),
                    _ => Vec::new(),
                };
                obj.insert(wire_key.into(), Value::from(items));
            }
        }

        Value::Object(obj)
    }

    fn from_wire(&self, item: Value) -> Value {
        let Value::Object(mut obj) = item else {
            return item;
        };

        if let Some(cents) = obj.remove(Self::PRICE_WIRE)
            && let Some(cents) = number_of(&cents)
        {
            obj.insert(Self::PRICE_FORM.into(), Value::from(cents_to_rupees(cents)));
        }

        for (form_key, wire_key) in Self::LIST_FIELDS {
            if let Some(list) = obj.remove(wire_key) {
                obj.insert(form_key.into(), Value::from(string_list(&list).join(", ")));
            }
        }

        Value::Object(obj)
    }
}

/// `round(rupees * 100)`
pub fn rupees_to_cents(rupees: f64) -> i64 {
    (rupees * 100.0).round() as i64
}

/// Cents back to rupees, rounded to two decimals
pub fn cents_to_rupees(cents: f64) -> f64 {
    cents.round() / 100.0
}

/// Split comma separated text, trimming entries and dropping empty ones
pub fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => split_csv(s),
        _ => Vec::new(),
    }
}

/// Numbers arrive as JSON numbers from the API but as text from form inputs
fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
