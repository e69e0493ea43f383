//! Promotion Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    /// Case-insensitive match against the canonical names
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        [Self::Percentage, Self::Fixed]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    #[default]
    Active,
    Inactive,
}

impl PromotionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        [Self::Active, Self::Inactive]
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
    }
}

/// The three promotion shelves shown on the guest site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionCategory {
    #[serde(rename = "Room Package Promotions")]
    RoomPackage,
    #[serde(rename = "Safari Package Promotions")]
    SafariPackage,
    #[serde(rename = "Seasonal Promotions")]
    Seasonal,
}

impl PromotionCategory {
    pub const ALL: [PromotionCategory; 3] = [Self::RoomPackage, Self::SafariPackage, Self::Seasonal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomPackage => "Room Package Promotions",
            Self::SafariPackage => "Safari Package Promotions",
            Self::Seasonal => "Seasonal Promotions",
        }
    }

    /// Exact match only; categories are picked from a fixed list
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// Promotion as stored by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub promotion_id: String,
    pub title: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: u32,
    #[serde(deserialize_with = "crate::util::api_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "crate::util::api_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: PromotionStatus,
    pub promotion_category: PromotionCategory,
}

/// Promotion form state (create form or edit modal)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionDraft {
    pub promotion_id: String,
    pub title: String,
    pub description: String,
    pub discount_type: String,
    pub discount_value: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub promotion_category: String,
}

impl PromotionDraft {
    /// Fresh create form seeded with the id handed out by the sequence endpoint
    pub fn with_id(promotion_id: impl Into<String>) -> Self {
        Self {
            promotion_id: promotion_id.into(),
            status: PromotionStatus::Active.as_str().to_string(),
            ..Default::default()
        }
    }
}

impl From<&Promotion> for PromotionDraft {
    fn from(p: &Promotion) -> Self {
        Self {
            promotion_id: p.promotion_id.clone(),
            title: p.title.clone(),
            description: p.description.clone(),
            discount_type: p.discount_type.as_str().to_string(),
            discount_value: p.discount_value.to_string(),
            start_date: Some(p.start_date),
            end_date: Some(p.end_date),
            status: p.status.as_str().to_string(),
            promotion_category: p.promotion_category.as_str().to_string(),
        }
    }
}

/// Normalized body for create (with id) and update (without id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<String>,
    pub title: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PromotionStatus,
    pub promotion_category: PromotionCategory,
}
