//! Reservation Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Package id used for reservations priced by hand in the back office
pub const ADMIN_RESERVATION_PACKAGE_ID: &str = "admin-reservation";

/// Expected arrival time of day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrivalWindow {
    #[default]
    Unknown,
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Booked,
    #[default]
    Pending,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    PartiallyPaid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially_paid",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Lkr,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Lkr => "LKR",
        }
    }
}

/// Guest contact block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Ad-hoc room and price used instead of a predefined package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPackage {
    pub room_id: String,
    pub price_per_night: f64,
    pub adults_included: u32,
}

/// Reservation form state as typed by a guest or an admin.
///
/// Numeric inputs stay textual until validation so that "must be a whole
/// number" can be reported per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub package_id: String,
    pub room_type: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms_wanted: String,
    pub adults: String,
    pub children: String,
    pub travelling_with_pet: bool,
    pub safari_requested: bool,
    pub arrival_window: ArrivalWindow,
    pub currency: Currency,
    pub custom_room_id: String,
    pub custom_price_per_night: String,
    pub custom_adults_included: String,
}

impl ReservationDraft {
    pub fn is_admin_reservation(&self) -> bool {
        self.package_id.trim() == ADMIN_RESERVATION_PACKAGE_ID
    }
}

/// A draft that passed every field rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedReservation {
    pub guest: Guest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_reservation: Option<AdminPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms_wanted: u32,
    pub adults: u32,
    pub children: u32,
    pub travelling_with_pet: bool,
    pub safari_requested: bool,
    pub arrival_window: ArrivalWindow,
    pub currency: Currency,
}

impl ValidatedReservation {
    /// Number of nights between check-in and check-out
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Body of `POST /api/reservations/reserve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(flatten)]
    pub reservation: ValidatedReservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    pub idempotency_key: String,
}

/// Reservation as stored by the API.
///
/// The document store does not enforce a schema, so every field decodes
/// leniently: a missing, `null` or mistyped value reads as its default.
/// Decode through [`Reservation::from_wire`] so Mongo's `_id` is honoured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    #[serde(deserialize_with = "crate::util::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub reservation_number: Option<String>,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub guest: Guest,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub package_id: Option<String>,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub admin_reservation: Option<AdminPackage>,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub room_type: Option<String>,
    #[serde(deserialize_with = "crate::util::lenient_date")]
    pub check_in: Option<NaiveDate>,
    #[serde(deserialize_with = "crate::util::lenient_date")]
    pub check_out: Option<NaiveDate>,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub rooms_wanted: u32,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub adults: u32,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub children: u32,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub travelling_with_pet: bool,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub safari_requested: bool,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub arrival_window: ArrivalWindow,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub status: ReservationStatus,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub currency: Currency,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub payment_status: PaymentStatus,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub total_amount: f64,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub idempotency_key: Option<String>,
    #[serde(deserialize_with = "crate::util::lenient")]
    pub created_at: Option<String>,
}

impl Reservation {
    /// Decode a record as the API returns it. `_id` (a string or
    /// `{"$oid": ..}`) replaces any plain `id`. Only a record that is not a
    /// JSON object fails.
    pub fn from_wire(mut record: Value) -> serde_json::Result<Self> {
        if let Some(obj) = record.as_object_mut()
            && let Some(mongo_id) = obj.remove("_id")
        {
            let id = match mongo_id {
                Value::String(id) => Some(id),
                Value::Object(oid) => oid.get("$oid").and_then(Value::as_str).map(str::to_string),
                _ => None,
            };
            if let Some(id) = id {
                obj.insert("id".to_string(), Value::String(id));
            }
        }
        serde_json::from_value(record)
    }
}

/// Partial update sent by the admin edit dialog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms_wanted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_window: Option<ArrivalWindow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ArrivalWindow::LateNight).unwrap(),
            "\"late-night\""
        );
        assert_eq!(serde_json::to_string(&Currency::Lkr).unwrap(), "\"LKR\"");
        assert_eq!(
            serde_json::to_string(&PaymentStatus::PartiallyPaid).unwrap(),
            "\"partially_paid\""
        );
        let status: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, ReservationStatus::Cancelled);
    }

    #[test]
    fn test_reservation_accepts_mongo_id_and_missing_fields() {
        let json = serde_json::json!({
            "_id": "65f0c0ffee",
            "guest": { "firstName": "Nimal", "lastName": "Perera", "email": "nimal@example.lk" },
            "checkIn": "2026-01-10T00:00:00.000Z",
            "checkOut": "2026-01-12",
            "status": "booked",
            "totalAmount": 240.0
        });
        let reservation = Reservation::from_wire(json).unwrap();
        assert_eq!(reservation.id, "65f0c0ffee");
        assert_eq!(reservation.status, ReservationStatus::Booked);
        assert_eq!(reservation.payment_status, PaymentStatus::Pending);
        assert_eq!(reservation.rooms_wanted, 0);
        assert_eq!(reservation.check_in, NaiveDate::from_ymd_opt(2026, 1, 10));
        assert_eq!(reservation.check_out, NaiveDate::from_ymd_opt(2026, 1, 12));
    }

    #[test]
    fn test_reservation_tolerates_loose_documents() {
        let json = serde_json::json!({
            "_id": { "$oid": "66f1c0ffee" },
            "id": "legacy-7",
            "reservationNumber": 2001,
            "status": "on-hold",
            "paymentStatus": "awaiting_bank_transfer",
            "totalAmount": null,
            "adults": "2",
            "safariRequested": true
        });
        let reservation = Reservation::from_wire(json).unwrap();
        assert_eq!(reservation.id, "66f1c0ffee");
        assert_eq!(reservation.reservation_number, None);
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.payment_status, PaymentStatus::Pending);
        assert_eq!(reservation.total_amount, 0.0);
        assert_eq!(reservation.adults, 0);
        assert!(reservation.safari_requested);

        let plain = Reservation::from_wire(serde_json::json!({ "id": "r-9" })).unwrap();
        assert_eq!(plain.id, "r-9");
        assert!(Reservation::from_wire(serde_json::json!(["not", "a", "record"])).is_err());
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = ReservationUpdate {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "cancelled" }));
    }
}
