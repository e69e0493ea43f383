//! Reservation intake rules

use chrono::NaiveDate;

use super::{
    EMAIL_PATTERN, FieldErrors, PHONE_PATTERN, check_int_range, check_name, normalize_phone,
    parse_whole_number,
};
use crate::models::reservation::{
    ADMIN_RESERVATION_PACKAGE_ID, AdminPackage, Guest, ReservationDraft, ValidatedReservation,
};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;
pub const MAX_ROOMS: i64 = 10;
pub const MAX_ADULTS: i64 = 20;
pub const MAX_CHILDREN: i64 = 20;
pub const MAX_GUESTS: i64 = 40;
pub const MAX_PRICE_PER_NIGHT: f64 = 10_000.0;
pub const MAX_ADULTS_INCLUDED: i64 = 10;

const TOTAL_GUESTS_MESSAGE: &str = "Total guests cannot exceed 40";

/// Fields of the reservation form that carry their own validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationField {
    FirstName,
    LastName,
    Email,
    Phone,
    Country,
    CheckIn,
    CheckOut,
    RoomsWanted,
    Adults,
    Children,
    CustomRoomId,
    CustomPricePerNight,
    CustomAdultsIncluded,
}

impl ReservationField {
    pub const ALL: [ReservationField; 13] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Country,
        Self::CheckIn,
        Self::CheckOut,
        Self::RoomsWanted,
        Self::Adults,
        Self::Children,
        Self::CustomRoomId,
        Self::CustomPricePerNight,
        Self::CustomAdultsIncluded,
    ];

    /// Key used in error maps and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Country => "country",
            Self::CheckIn => "checkIn",
            Self::CheckOut => "checkOut",
            Self::RoomsWanted => "roomsWanted",
            Self::Adults => "adults",
            Self::Children => "children",
            Self::CustomRoomId => "customRoomId",
            Self::CustomPricePerNight => "customPricePerNight",
            Self::CustomAdultsIncluded => "customAdultsIncluded",
        }
    }

    /// Fields whose messages may change when this one is edited
    pub fn related(&self) -> &'static [ReservationField] {
        match self {
            Self::Adults | Self::Children => &[Self::Adults, Self::Children],
            Self::CheckIn | Self::CheckOut => &[Self::CheckIn, Self::CheckOut],
            Self::FirstName => &[Self::FirstName],
            Self::LastName => &[Self::LastName],
            Self::Email => &[Self::Email],
            Self::Phone => &[Self::Phone],
            Self::Country => &[Self::Country],
            Self::RoomsWanted => &[Self::RoomsWanted],
            Self::CustomRoomId => &[Self::CustomRoomId],
            Self::CustomPricePerNight => &[Self::CustomPricePerNight],
            Self::CustomAdultsIncluded => &[Self::CustomAdultsIncluded],
        }
    }

    fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Self::CustomRoomId | Self::CustomPricePerNight | Self::CustomAdultsIncluded
        )
    }
}

/// Validate one field on change/blur.
///
/// The returned map covers every field in [`ReservationField::related`], so a
/// guest-count change reports the 40-guest limit on both `adults` and
/// `children`. Feed it to [`FieldErrors::refresh`] to update form state.
pub fn validate_reservation_field(
    draft: &ReservationDraft,
    field: ReservationField,
    today: NaiveDate,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for related in field.related() {
        if related.is_admin_only() && !draft.is_admin_reservation() {
            continue;
        }
        if let Some(message) = field_message(draft, *related, today) {
            errors.insert(related.as_str(), message);
        }
    }
    errors
}

/// Full-submit validation: every rule, all messages, no partial result.
pub fn validate_reservation(
    draft: &ReservationDraft,
    today: NaiveDate,
) -> Result<ValidatedReservation, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in ReservationField::ALL {
        if field.is_admin_only() && !draft.is_admin_reservation() {
            continue;
        }
        if let Some(message) = field_message(draft, field, today) {
            errors.insert(field.as_str(), message);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // Every value below was proven parseable by `field_message`.
    let count = |value: &str| parse_whole_number(value).unwrap_or_default().max(0) as u32;
    let optional = |value: &str| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    let admin_reservation = draft.is_admin_reservation().then(|| AdminPackage {
        room_id: draft.custom_room_id.trim().to_string(),
        price_per_night: draft
            .custom_price_per_night
            .trim()
            .parse()
            .unwrap_or_default(),
        adults_included: count(&draft.custom_adults_included),
    });

    let (Some(check_in), Some(check_out)) = (draft.check_in, draft.check_out) else {
        errors.insert(ReservationField::CheckIn.as_str(), "Check-in date is required");
        return Err(errors);
    };

    Ok(ValidatedReservation {
        guest: Guest {
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: optional(&draft.phone).map(|p| normalize_phone(&p)),
            country: optional(&draft.country),
        },
        package_id: if draft.is_admin_reservation() {
            Some(ADMIN_RESERVATION_PACKAGE_ID.to_string())
        } else {
            optional(&draft.package_id)
        },
        admin_reservation,
        room_type: optional(&draft.room_type),
        check_in,
        check_out,
        rooms_wanted: count(&draft.rooms_wanted),
        adults: count(&draft.adults),
        children: count(&draft.children),
        travelling_with_pet: draft.travelling_with_pet,
        safari_requested: draft.safari_requested,
        arrival_window: draft.arrival_window,
        currency: draft.currency,
    })
}

fn field_message(
    draft: &ReservationDraft,
    field: ReservationField,
    today: NaiveDate,
) -> Option<String> {
    match field {
        ReservationField::FirstName => required_name(&draft.first_name, "First name"),
        ReservationField::LastName => required_name(&draft.last_name, "Last name"),
        ReservationField::Email => email_message(&draft.email),
        ReservationField::Phone => {
            let phone = normalize_phone(&draft.phone);
            if phone.is_empty() || PHONE_PATTERN.is_match(&phone) {
                None
            } else {
                Some("Please enter a valid phone number".to_string())
            }
        }
        ReservationField::Country => {
            if draft.country.trim().is_empty() {
                None
            } else {
                check_name(&draft.country, "Country", NAME_MIN_LEN, NAME_MAX_LEN)
            }
        }
        ReservationField::CheckIn => match draft.check_in {
            None => Some("Check-in date is required".to_string()),
            Some(date) if date < today => Some("Check-in date cannot be in the past".to_string()),
            Some(_) => None,
        },
        ReservationField::CheckOut => match (draft.check_in, draft.check_out) {
            (_, None) => Some("Check-out date is required".to_string()),
            (_, Some(out)) if out < today => {
                Some("Check-out date cannot be in the past".to_string())
            }
            (Some(check_in), Some(out)) if out <= check_in => {
                Some("Check-out date must be after check-in date".to_string())
            }
            _ => None,
        },
        ReservationField::RoomsWanted => {
            check_int_range(&draft.rooms_wanted, "Rooms", 1, MAX_ROOMS).err()
        }
        ReservationField::Adults => guest_count_message(draft, &draft.adults, "Adults", 1, MAX_ADULTS),
        ReservationField::Children => {
            guest_count_message(draft, &draft.children, "Children", 0, MAX_CHILDREN)
        }
        ReservationField::CustomRoomId => {
            let room_id = draft.custom_room_id.trim();
            if room_id.is_empty() {
                Some("Room ID is required".to_string())
            } else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&room_id.chars().count()) {
                Some("Room ID must be between 2 and 50 characters".to_string())
            } else {
                None
            }
        }
        ReservationField::CustomPricePerNight => {
            let raw = draft.custom_price_per_night.trim();
            if raw.is_empty() {
                return Some("Price per night is required".to_string());
            }
            match raw.parse::<f64>() {
                Ok(price) if !price.is_finite() || price <= 0.0 => {
                    Some("Price per night must be greater than 0".to_string())
                }
                Ok(price) if price > MAX_PRICE_PER_NIGHT => {
                    Some("Price per night cannot exceed 10000".to_string())
                }
                Ok(_) => None,
                Err(_) => Some("Price per night must be a number".to_string()),
            }
        }
        ReservationField::CustomAdultsIncluded => {
            if draft.custom_adults_included.trim().is_empty() {
                return Some("Adults included is required".to_string());
            }
            check_int_range(
                &draft.custom_adults_included,
                "Adults included",
                1,
                MAX_ADULTS_INCLUDED,
            )
            .err()
        }
    }
}

fn required_name(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{label} is required"));
    }
    check_name(value, label, NAME_MIN_LEN, NAME_MAX_LEN)
}

fn email_message(value: &str) -> Option<String> {
    let email = value.trim();
    if email.is_empty() {
        Some("Email is required".to_string())
    } else if email.chars().count() > EMAIL_MAX_LEN {
        Some("Email must be less than 100 characters".to_string())
    } else if !EMAIL_PATTERN.is_match(email) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

/// Children may be left blank (zero); adults may not.
fn guest_count(value: &str, min: i64) -> Option<i64> {
    if value.trim().is_empty() && min == 0 {
        return Some(0);
    }
    parse_whole_number(value)
}

fn guest_count_message(
    draft: &ReservationDraft,
    value: &str,
    label: &str,
    min: i64,
    max: i64,
) -> Option<String> {
    let blank = value.trim().is_empty();
    if blank && min > 0 {
        return Some(format!("{label} is required"));
    }
    if !blank && let Err(message) = check_int_range(value, label, min, max) {
        return Some(message);
    }
    match (guest_count(&draft.adults, 1), guest_count(&draft.children, 0)) {
        // a sum that overflows is over the limit too
        (Some(adults), Some(children))
            if adults.checked_add(children).is_none_or(|total| total > MAX_GUESTS) =>
        {
            Some(TOTAL_GUESTS_MESSAGE.to_string())
        }
        _ => None,
    }
}
