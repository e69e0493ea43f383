//! Admin module registry
//!
//! One static descriptor per manageable resource. The generic admin CRUD
//! view renders its table from `columns`, its form from `fields`, talks to
//! `endpoints`, and shapes payloads through `transform`. Per-resource quirks
//! (PATCH updates, soft delete) are data on the descriptor, not branches on
//! the module key.

pub mod transform;

use serde::Serialize;
use serde_json::{Map, Value};

pub use transform::{Passthrough, RoomsTransform, WireTransform};

/// Input widget of a form field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Select {
        options: &'static [&'static str],
    },
    Checkbox,
    Date,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

/// REST paths; update/delete take the record id as a trailing segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    pub list: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

impl Endpoints {
    /// Same base path for every operation
    pub const fn rest(base: &'static str) -> Self {
        Self {
            list: base,
            create: base,
            update: base,
            delete: base,
        }
    }

    pub fn update_path(&self, id: &str) -> String {
        format!("{}/{}", self.update.trim_end_matches('/'), id)
    }

    pub fn delete_path(&self, id: &str) -> String {
        format!("{}/{}", self.delete.trim_end_matches('/'), id)
    }
}

/// HTTP verb used for edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateMethod {
    Put,
    /// Partial update; required where soft delete rides on the update route
    Patch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeleteMode {
    /// `DELETE {delete}/{id}`
    Hard,
    /// `PATCH {update}/{id}` with `{"isDeleted": true}`
    SoftFlag,
}

#[derive(Clone, Copy, Serialize)]
pub struct ModuleDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub endpoints: Endpoints,
    pub columns: &'static [Column],
    pub fields: &'static [FieldSpec],
    pub update_method: UpdateMethod,
    pub delete_mode: DeleteMode,
    #[serde(skip)]
    pub transform: &'static dyn WireTransform,
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("key", &self.key)
            .field("endpoints", &self.endpoints)
            .field("update_method", &self.update_method)
            .field("delete_mode", &self.delete_mode)
            .finish_non_exhaustive()
    }
}

impl ModuleDescriptor {
    pub fn to_wire(&self, payload: Value) -> Value {
        self.transform.to_wire(payload)
    }

    pub fn from_wire(&self, item: Value) -> Value {
        self.transform.from_wire(item)
    }

    /// Synthetic record shown when the list endpoint is unreachable
    pub fn demo_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("id".into(), Value::from("demo-1"));
        for field in self.fields {
            let value = match field.kind {
                FieldKind::Text => Value::from(format!("Demo {}", field.label)),
                FieldKind::Number { min, .. } => Value::from(min.unwrap_or(0.0)),
                FieldKind::Select { options } => {
                    options.first().map(|o| Value::from(*o)).unwrap_or(Value::Null)
                }
                FieldKind::Checkbox => Value::Bool(false),
                FieldKind::Date | FieldKind::Password => continue,
            };
            record.insert(field.name.into(), value);
        }
        for column in self.columns {
            record
                .entry(column.key)
                .or_insert_with(|| Value::from("Demo"));
        }
        Value::Object(record)
    }
}

// ── Descriptor table ────────────────────────────────────────────────

const fn text(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required,
        kind: FieldKind::Text,
    }
}

const fn number(
    name: &'static str,
    label: &'static str,
    min: Option<f64>,
    max: Option<f64>,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: true,
        kind: FieldKind::Number { min, max },
    }
}

const fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: true,
        kind: FieldKind::Select { options },
    }
}

const fn checkbox(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: false,
        kind: FieldKind::Checkbox,
    }
}

const fn date(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required,
        kind: FieldKind::Date,
    }
}

const fn col(key: &'static str, label: &'static str) -> Column {
    Column { key, label }
}

const fn module(
    key: &'static str,
    name: &'static str,
    base: &'static str,
    columns: &'static [Column],
    fields: &'static [FieldSpec],
) -> ModuleDescriptor {
    ModuleDescriptor {
        key,
        name,
        endpoints: Endpoints::rest(base),
        columns,
        fields,
        update_method: UpdateMethod::Put,
        delete_mode: DeleteMode::Hard,
        transform: &Passthrough,
    }
}

pub static MODULES: [ModuleDescriptor; 12] = [
    module(
        "users",
        "Users",
        "/api/users",
        &[col("name", "Name"), col("email", "Email"), col("role", "Role")],
        &[
            text("name", "Name", true),
            text("email", "Email", true),
            select("role", "Role", &["admin", "staff", "guest"]),
            FieldSpec {
                name: "password",
                label: "Password",
                required: false,
                kind: FieldKind::Password,
            },
            checkbox("active", "Active"),
        ],
    ),
    ModuleDescriptor {
        update_method: UpdateMethod::Patch,
        delete_mode: DeleteMode::SoftFlag,
        transform: &RoomsTransform,
        ..module(
            "rooms",
            "Rooms",
            "/api/rooms",
            &[
                col("roomId", "Room ID"),
                col("roomType", "Type"),
                col("basePriceRupees", "Base price (Rs)"),
                col("active", "Active"),
            ],
            &[
                text("roomId", "Room ID", true),
                select(
                    "roomType",
                    "Room type",
                    &["Standard", "Deluxe", "Family", "Tree House", "Safari Tent"],
                ),
                number("basePriceRupees", "Base price (Rs)", Some(0.0), None),
                number("capacityAdults", "Adults", Some(1.0), Some(10.0)),
                number("capacityChildren", "Children", Some(0.0), Some(10.0)),
                text("amenitiesCsv", "Amenities (comma separated)", false),
                text("imagesCsv", "Image URLs (comma separated)", false),
                checkbox("active", "Active"),
            ],
        )
    },
    module(
        "reservations",
        "Reservations",
        "/api/reservations",
        &[
            col("reservationNumber", "Reservation #"),
            col("email", "Guest email"),
            col("checkIn", "Check-in"),
            col("status", "Status"),
        ],
        &[
            text("email", "Guest email", true),
            date("checkIn", "Check-in", true),
            date("checkOut", "Check-out", true),
            select("status", "Status", &["booked", "pending", "cancelled"]),
            number("totalAmount", "Total amount", Some(0.0), None),
        ],
    ),
    module(
        "payments",
        "Payments",
        "/api/payments",
        &[
            col("reservationId", "Reservation"),
            col("amount", "Amount"),
            col("status", "Status"),
        ],
        &[
            text("reservationId", "Reservation ID", true),
            number("amount", "Amount", Some(0.0), None),
            select("method", "Method", &["card", "cash", "bank_transfer"]),
            select("status", "Status", &["pending", "paid", "refunded", "failed"]),
            date("paidAt", "Paid on", false),
        ],
    ),
    module(
        "offers",
        "Offers",
        "/api/offers",
        &[col("title", "Title"), col("discount", "Discount %"), col("active", "Active")],
        &[
            text("title", "Title", true),
            text("description", "Description", false),
            number("discount", "Discount %", Some(0.0), Some(100.0)),
            date("validUntil", "Valid until", false),
            checkbox("active", "Active"),
        ],
    ),
    module(
        "notifications",
        "Notifications",
        "/api/notifications",
        &[col("title", "Title"), col("audience", "Audience")],
        &[
            text("title", "Title", true),
            text("message", "Message", true),
            select("audience", "Audience", &["all", "guests", "staff"]),
            date("sendAt", "Send on", false),
        ],
    ),
    module(
        "animals",
        "Wildlife",
        "/api/animals",
        &[col("name", "Name"), col("species", "Species"), col("habitat", "Habitat")],
        &[
            text("name", "Name", true),
            text("species", "Species", true),
            text("habitat", "Habitat", false),
            number("sightingProbability", "Sighting chance %", Some(0.0), Some(100.0)),
        ],
    ),
    module(
        "chatbot",
        "Chatbot answers",
        "/api/chatbot",
        &[col("question", "Question"), col("category", "Category")],
        &[
            text("question", "Question", true),
            text("answer", "Answer", true),
            select("category", "Category", &["booking", "safari", "general"]),
            checkbox("active", "Active"),
        ],
    ),
    module(
        "reviews",
        "Reviews",
        "/api/reviews",
        &[col("guestName", "Guest"), col("rating", "Rating"), col("approved", "Approved")],
        &[
            text("guestName", "Guest", true),
            number("rating", "Rating", Some(1.0), Some(5.0)),
            text("comment", "Comment", false),
            checkbox("approved", "Approved"),
        ],
    ),
    module(
        "merch",
        "Merchandise",
        "/api/merch",
        &[col("name", "Name"), col("price", "Price"), col("stock", "Stock")],
        &[
            text("name", "Name", true),
            number("price", "Price", Some(0.0), None),
            number("stock", "Stock", Some(0.0), None),
            select("category", "Category", &["apparel", "souvenirs", "books"]),
        ],
    ),
    module(
        "packages",
        "Packages",
        "/api/packages",
        &[
            col("name", "Name"),
            col("roomId", "Room"),
            col("pricePerNight", "Price / night"),
        ],
        &[
            text("name", "Name", true),
            text("roomId", "Room ID", true),
            number("pricePerNight", "Price / night", Some(0.0), None),
            number("adultsIncluded", "Adults included", Some(1.0), Some(10.0)),
            checkbox("available", "Available"),
        ],
    ),
    module(
        "menu",
        "Restaurant menu",
        "/api/menu",
        &[col("name", "Dish"), col("category", "Category"), col("price", "Price")],
        &[
            text("name", "Dish", true),
            select("category", "Category", &["breakfast", "lunch", "dinner", "drinks"]),
            number("price", "Price", Some(0.0), None),
            checkbox("vegetarian", "Vegetarian"),
        ],
    ),
];

/// Look up a descriptor by module key
pub fn find_module(key: &str) -> Option<&'static ModuleDescriptor> {
    MODULES.iter().find(|m| m.key == key)
}

/// Form payload → wire body for the given module; unknown keys pass through
pub fn transform_out(key: &str, payload: Value) -> Value {
    match find_module(key) {
        Some(module) => module.to_wire(payload),
        None => payload,
    }
}

/// Wire item → form/table shape for the given module; unknown keys pass through
pub fn transform_in(key: &str, item: Value) -> Value {
    match find_module(key) {
        Some(module) => module.from_wire(item),
        None => item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_registry_keys_unique_and_complete() {
        let keys: HashSet<_> = MODULES.iter().map(|m| m.key).collect();
        assert_eq!(keys.len(), MODULES.len());
        for key in [
            "users",
            "rooms",
            "reservations",
            "payments",
            "offers",
            "notifications",
            "animals",
            "chatbot",
            "reviews",
            "merch",
            "packages",
            "menu",
        ] {
            assert!(find_module(key).is_some(), "missing module {key}");
        }
        assert!(find_module("spa").is_none());
    }

    #[test]
    fn test_only_rooms_patch_and_soft_delete() {
        for module in &MODULES {
            let rooms = module.key == "rooms";
            assert_eq!(module.update_method == UpdateMethod::Patch, rooms);
            assert_eq!(module.delete_mode == DeleteMode::SoftFlag, rooms);
        }
    }

    #[test]
    fn test_endpoint_paths() {
        let rooms = find_module("rooms").unwrap();
        assert_eq!(rooms.endpoints.list, "/api/rooms");
        assert_eq!(rooms.endpoints.update_path("R1"), "/api/rooms/R1");
        assert_eq!(rooms.endpoints.delete_path("R1"), "/api/rooms/R1");
    }

    #[test]
    fn test_transform_dispatch_by_key() {
        let out = transform_out("rooms", json!({ "basePriceRupees": 1.5 }));
        assert_eq!(out, json!({ "basePriceCents": 150 }));

        let payload = json!({ "basePriceRupees": 1.5 });
        assert_eq!(transform_out("menu", payload.clone()), payload);
        assert_eq!(transform_in("unknown", payload.clone()), payload);
    }

    #[test]
    fn test_demo_record_covers_columns() {
        for module in &MODULES {
            let demo = module.demo_record();
            assert_eq!(demo["id"], "demo-1");
            for column in module.columns {
                assert!(demo.get(column.key).is_some(), "{}: {}", module.key, column.key);
            }
        }
        let users = find_module("users").unwrap().demo_record();
        assert!(users.get("password").is_none());
        assert_eq!(users["role"], "admin");
    }

    #[test]
    fn test_descriptor_serializes_field_kinds() {
        let rooms = find_module("rooms").unwrap();
        let json = serde_json::to_value(rooms).unwrap();
        assert_eq!(json["fields"][1]["type"], "select");
        assert_eq!(json["fields"][2]["type"], "number");
        assert_eq!(json["fields"][2]["min"], 0.0);
        assert!(json.get("transform").is_none());
    }
}
