//! Reservation analytics (admin dashboard and report export)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Today,
    Weekly,
    Monthly,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Aggregates computed by the API. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationAnalytics {
    pub total_reservations: u64,
    pub total_revenue: f64,
    pub average_stay_nights: f64,
    pub occupancy_rate: f64,
    pub by_status: BTreeMap<String, u64>,
    pub by_payment_status: BTreeMap<String, u64>,
    pub by_room: BTreeMap<String, u64>,
}

impl ReservationAnalytics {
    /// Rows for the tabular report (metric, value)
    pub fn report_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Total reservations".to_string(), self.total_reservations.to_string()),
            ("Total revenue".to_string(), format!("{:.2}", self.total_revenue)),
            (
                "Average stay (nights)".to_string(),
                format!("{:.1}", self.average_stay_nights),
            ),
            ("Occupancy rate".to_string(), format!("{:.1}%", self.occupancy_rate)),
        ];
        rows.extend(
            self.by_status
                .iter()
                .map(|(status, n)| (format!("Status: {status}"), n.to_string())),
        );
        rows.extend(
            self.by_payment_status
                .iter()
                .map(|(status, n)| (format!("Payment: {status}"), n.to_string())),
        );
        rows
    }
}
