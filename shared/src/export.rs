//! CSV export for admin tables and reports

use csv::WriterBuilder;
use thiserror::Error;

use crate::models::{Reservation, ReservationAnalytics};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Flush(String),
    #[error("csv output is not UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub const RESERVATION_HEADERS: [&str; 12] = [
    "Reservation #",
    "First name",
    "Last name",
    "Email",
    "Check-in",
    "Check-out",
    "Rooms",
    "Adults",
    "Children",
    "Status",
    "Payment",
    "Total",
];

/// Render a header row plus data rows. Cells starting with a formula
/// trigger (`=`, `+`, `-`, `@`) are prefixed with `'`.
pub fn to_csv<H, R>(headers: &[H], rows: &[R]) -> Result<String, ExportError>
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let mut wtr = WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    wtr.write_record(headers.iter().map(|h| h.as_ref()))?;
    for row in rows {
        wtr.write_record(row.as_ref().iter().map(|cell| harden(cell)))?;
    }
    let buf = wtr.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(buf)?)
}

fn harden(cell: &str) -> String {
    match cell.trim_start().chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

fn reservation_row(r: &Reservation) -> Vec<String> {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    vec![
        r.reservation_number.clone().unwrap_or_else(|| r.id.clone()),
        r.guest.first_name.clone(),
        r.guest.last_name.clone(),
        r.guest.email.clone(),
        date(r.check_in),
        date(r.check_out),
        r.rooms_wanted.to_string(),
        r.adults.to_string(),
        r.children.to_string(),
        r.status.as_str().to_string(),
        r.payment_status.as_str().to_string(),
        format!("{:.2} {}", r.total_amount, r.currency.as_str()),
    ]
}

/// Reservations table export
pub fn reservations_csv(reservations: &[Reservation]) -> Result<String, ExportError> {
    let rows: Vec<Vec<String>> = reservations.iter().map(reservation_row).collect();
    to_csv(&RESERVATION_HEADERS, &rows)
}

/// Analytics report export (metric, value)
pub fn analytics_csv(analytics: &ReservationAnalytics) -> Result<String, ExportError> {
    let rows: Vec<Vec<String>> = analytics
        .report_rows()
        .into_iter()
        .map(|(metric, value)| vec![metric, value])
        .collect();
    to_csv(&["Metric", "Value"], &rows)
}
