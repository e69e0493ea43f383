//! Request types for the admin reservation list
//!
//! Filters, pagination and ordering for `GET /api/reservations/admin`,
//! plus the page shape that endpoint answers with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PaymentStatus, Reservation, ReservationStatus};

/// Page number used when none is given (1-based)
pub const DEFAULT_PAGE: u32 = 1;
/// Rows per page used when none is given
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size the API accepts
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query builder for the admin reservation list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminReservationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub email: Option<String>,
    pub reservation_number: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub room_id: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub sort: Option<(String, SortOrder)>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AdminReservationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.clamp(1, MAX_LIMIT));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email);
        self
    }

    pub fn reservation_number(mut self, number: impl Into<String>) -> Self {
        self.reservation_number = non_blank(number);
        self
    }

    /// Stays overlapping `[from, to]`
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn room_id(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = non_blank(room_id);
        self
    }

    pub fn amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.amount_min = min.filter(|v| v.is_finite());
        self.amount_max = max.filter(|v| v.is_finite());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = non_blank(field).map(|field| (field, order));
        self
    }

    /// Query-string pairs in a stable order; unset filters are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.unwrap_or(DEFAULT_PAGE).to_string()),
            ("limit".to_string(), self.limit.unwrap_or(DEFAULT_LIMIT).to_string()),
        ];
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };
        push("email", self.email.clone());
        push("reservationNumber", self.reservation_number.clone());
        push("from", self.from.map(|d| d.to_string()));
        push("to", self.to.map(|d| d.to_string()));
        push("status", self.status.map(|s| s.as_str().to_string()));
        push("paymentStatus", self.payment_status.map(|s| s.as_str().to_string()));
        push("roomId", self.room_id.clone());
        push("amountMin", self.amount_min.map(|v| v.to_string()));
        push("amountMax", self.amount_max.map(|v| v.to_string()));
        push(
            "sort",
            self.sort
                .as_ref()
                .map(|(field, order)| format!("{field}:{}", order.as_str())),
        );
        pairs
    }
}

/// One page of the admin reservation list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReservationPage {
    pub items: Vec<Reservation>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl ReservationPage {
    /// Read `{ data | reservations, total, page, limit }`. Missing counters
    /// fall back to the request values; records that do not parse are
    /// skipped.
    pub fn from_body(body: &Value, query: &AdminReservationQuery) -> Self {
        let items: Vec<Reservation> = ["data", "reservations"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_array))
            .or_else(|| body.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|item| Reservation::from_wire(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        let counter = |key: &str| body.get(key).and_then(Value::as_u64);
        Self {
            total: counter("total").unwrap_or(items.len() as u64),
            page: counter("page")
                .map(|p| p as u32)
                .unwrap_or(query.page.unwrap_or(DEFAULT_PAGE)),
            limit: counter("limit")
                .map(|l| l as u32)
                .unwrap_or(query.limit.unwrap_or(DEFAULT_LIMIT)),
            items,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as u64)
    }
}
