//! Room and Room Package Models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Image stored on the blob host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Stored {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ImageRef {
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Stored { url, .. } => url,
        }
    }
}

/// Room entity. `room_id` is the business key used by packages and
/// reservations; the database id is never referenced across resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "room_id")]
    pub room_id: String,
    pub room_type: String,
    pub bed_label: Option<String>,
    pub size_sqm: Option<f64>,
    pub capacity_adults: u32,
    pub capacity_children: u32,
    pub features: BTreeMap<String, bool>,
    pub perks: BTreeMap<String, bool>,
    pub active: bool,
    pub available_count: u32,
    pub image_gallery: Vec<ImageRef>,
}

impl Room {
    /// Names of the features switched on
    pub fn enabled_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter_map(|(name, on)| on.then_some(name.as_str()))
            .collect()
    }

    /// Whether the room can take a new booking
    pub fn is_bookable(&self) -> bool {
        self.active && self.available_count > 0
    }
}

/// Package offered on the reservation form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomPackage {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "room_id")]
    pub room_id: String,
    pub room_type: Option<String>,
    pub price_per_night: f64,
    pub adults_included: u32,
    pub description: Option<String>,
    pub available: bool,
}
