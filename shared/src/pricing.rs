//! Stay pricing
//!
//! All arithmetic is done in `Decimal`, then converted to `f64` rounded to
//! 2 decimal places (half-up) for the request body.

use rust_decimal::prelude::*;
use serde::Serialize;

use crate::models::{RoomPackage, ValidatedReservation};

const DECIMAL_PLACES: u32 = 2;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Price breakdown shown before submit and sent as `totalAmount`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub nights: i64,
    pub rooms: u32,
    pub nightly_rate: f64,
    pub total: f64,
}

/// `nights × rooms × nightly rate`. Returns `None` when the stay is empty or
/// the rate is not a usable amount.
pub fn quote(nights: i64, rooms: u32, nightly_rate: f64) -> Option<Quote> {
    if nights <= 0 || rooms == 0 || !nightly_rate.is_finite() || nightly_rate < 0.0 {
        return None;
    }
    let total = Decimal::from(nights) * Decimal::from(rooms) * to_decimal(nightly_rate);
    Some(Quote {
        nights,
        rooms,
        nightly_rate: to_f64(to_decimal(nightly_rate)),
        total: to_f64(total),
    })
}

/// Nightly rate for a validated reservation: the admin's custom price when
/// present, otherwise the selected package's price
pub fn nightly_rate_for(reservation: &ValidatedReservation, package: Option<&RoomPackage>) -> Option<f64> {
    match (&reservation.admin_reservation, package) {
        (Some(admin), _) => Some(admin.price_per_night),
        (None, Some(package)) if reservation.package_id.as_deref() == Some(package.id.as_str()) => {
            Some(package.price_per_night)
        }
        _ => None,
    }
}

/// Quote for a validated reservation, if a rate is known
pub fn quote_reservation(reservation: &ValidatedReservation, package: Option<&RoomPackage>) -> Option<Quote> {
    let rate = nightly_rate_for(reservation, package)?;
    quote(reservation.nights(), reservation.rooms_wanted, rate)
}
