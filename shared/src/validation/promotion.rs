//! Promotion intake rules

use chrono::NaiveDate;

use super::{ALPHANUMERIC_PATTERN, FieldErrors, parse_whole_number, word_count};
use crate::models::promotion::{
    DiscountType, PromotionCategory, PromotionDraft, PromotionPayload, PromotionStatus,
};

pub const TITLE_MIN_WORDS: usize = 3;
pub const TITLE_MAX_LEN: usize = 120;
pub const DESCRIPTION_MIN_WORDS: usize = 5;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const MAX_PERCENTAGE: i64 = 100;

/// Whether the payload is for a POST (id in body) or a PUT (id in path)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionField {
    PromotionId,
    Title,
    Description,
    DiscountType,
    DiscountValue,
    StartDate,
    EndDate,
    Status,
    PromotionCategory,
}

impl PromotionField {
    pub const ALL: [PromotionField; 9] = [
        Self::PromotionId,
        Self::Title,
        Self::Description,
        Self::DiscountType,
        Self::DiscountValue,
        Self::StartDate,
        Self::EndDate,
        Self::Status,
        Self::PromotionCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromotionId => "promotion_id",
            Self::Title => "title",
            Self::Description => "description",
            Self::DiscountType => "discount_type",
            Self::DiscountValue => "discount_value",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Status => "status",
            Self::PromotionCategory => "promotion_category",
        }
    }

    /// Fields whose messages may change when this one is edited
    pub fn related(&self) -> &'static [PromotionField] {
        match self {
            Self::StartDate | Self::EndDate => &[Self::StartDate, Self::EndDate],
            // the percentage cap depends on the type
            Self::DiscountType | Self::DiscountValue => &[Self::DiscountType, Self::DiscountValue],
            Self::PromotionId => &[Self::PromotionId],
            Self::Title => &[Self::Title],
            Self::Description => &[Self::Description],
            Self::Status => &[Self::Status],
            Self::PromotionCategory => &[Self::PromotionCategory],
        }
    }
}

pub fn validate_promotion_field(
    draft: &PromotionDraft,
    field: PromotionField,
    today: NaiveDate,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for related in field.related() {
        if let Some(message) = field_message(draft, *related, today) {
            errors.insert(related.as_str(), message);
        }
    }
    errors
}

/// Full validation producing the normalized payload.
///
/// Strings are trimmed, `discount_type` is lower-cased and
/// `discount_value` becomes a number. On update the id is left out of the
/// body because it is immutable and travels in the path.
pub fn validate_promotion(
    draft: &PromotionDraft,
    mode: PromotionMode,
    today: NaiveDate,
) -> Result<PromotionPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in PromotionField::ALL {
        if let Some(message) = field_message(draft, field, today) {
            errors.insert(field.as_str(), message);
        }
    }

    let parsed = (
        DiscountType::parse(&draft.discount_type),
        parse_whole_number(&draft.discount_value).and_then(|v| u32::try_from(v).ok()),
        draft.start_date,
        draft.end_date,
        parse_status(&draft.status),
        PromotionCategory::parse(draft.promotion_category.trim()),
    );
    match parsed {
        (
            Some(discount_type),
            Some(discount_value),
            Some(start_date),
            Some(end_date),
            Some(status),
            Some(promotion_category),
        ) if errors.is_empty() => Ok(PromotionPayload {
            promotion_id: match mode {
                PromotionMode::Create => Some(draft.promotion_id.trim().to_string()),
                PromotionMode::Update => None,
            },
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            discount_type,
            discount_value,
            start_date,
            end_date,
            status,
            promotion_category,
        }),
        _ => Err(errors),
    }
}

/// Blank status means a new, active promotion
fn parse_status(value: &str) -> Option<PromotionStatus> {
    if value.trim().is_empty() {
        Some(PromotionStatus::Active)
    } else {
        PromotionStatus::parse(value)
    }
}

fn field_message(draft: &PromotionDraft, field: PromotionField, today: NaiveDate) -> Option<String> {
    match field {
        PromotionField::PromotionId => {
            let id = draft.promotion_id.trim();
            if id.is_empty() {
                Some("Promotion ID is required".to_string())
            } else if !ALPHANUMERIC_PATTERN.is_match(id) {
                Some("Promotion ID can only contain letters and numbers".to_string())
            } else {
                None
            }
        }
        PromotionField::Title => text_message(
            &draft.title,
            "Title",
            TITLE_MIN_WORDS,
            TITLE_MAX_LEN,
        ),
        PromotionField::Description => text_message(
            &draft.description,
            "Description",
            DESCRIPTION_MIN_WORDS,
            DESCRIPTION_MAX_LEN,
        ),
        PromotionField::DiscountType => {
            if draft.discount_type.trim().is_empty() {
                Some("Discount type is required".to_string())
            } else if DiscountType::parse(&draft.discount_type).is_none() {
                Some("Discount type must be percentage or fixed".to_string())
            } else {
                None
            }
        }
        PromotionField::DiscountValue => {
            let raw = draft.discount_value.trim();
            if raw.is_empty() {
                return Some("Discount value is required".to_string());
            }
            let Some(value) = parse_whole_number(raw) else {
                return Some("Discount value must be a whole number".to_string());
            };
            if value <= 0 {
                Some("Discount value must be greater than 0".to_string())
            } else if DiscountType::parse(&draft.discount_type) == Some(DiscountType::Percentage)
                && value > MAX_PERCENTAGE
            {
                Some("Percentage discount cannot exceed 100".to_string())
            } else if u32::try_from(value).is_err() {
                Some("Discount value is too large".to_string())
            } else {
                None
            }
        }
        PromotionField::StartDate => match (draft.start_date, draft.end_date) {
            (None, _) => Some("Start date is required".to_string()),
            (Some(start), _) if start < today => {
                Some("Start date cannot be in the past".to_string())
            }
            (Some(start), Some(end)) if start > end => {
                Some("Start date must be on or before the end date".to_string())
            }
            _ => None,
        },
        PromotionField::EndDate => match (draft.start_date, draft.end_date) {
            (_, None) => Some("End date is required".to_string()),
            (_, Some(end)) if end < today => Some("End date cannot be in the past".to_string()),
            (Some(start), Some(end)) if end < start => {
                Some("End date must be on or after the start date".to_string())
            }
            _ => None,
        },
        PromotionField::Status => parse_status(&draft.status)
            .is_none()
            .then(|| "Status must be active or inactive".to_string()),
        PromotionField::PromotionCategory => {
            let category = draft.promotion_category.trim();
            if category.is_empty() {
                Some("Promotion category is required".to_string())
            } else if PromotionCategory::parse(category).is_none() {
                Some("Please select a valid promotion category".to_string())
            } else {
                None
            }
        }
    }
}

fn text_message(value: &str, label: &str, min_words: usize, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(format!("{label} is required"))
    } else if word_count(trimmed) < min_words {
        Some(format!("{label} must contain at least {min_words} words"))
    } else if trimmed.chars().count() > max_len {
        Some(format!("{label} must be {max_len} characters or less"))
    } else {
        None
    }
}
