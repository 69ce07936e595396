use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blood_group::BloodGroup;

/// Identifier wrapper for registered donors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorId(pub String);

/// Identifier wrapper for blood requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalised donor snapshot consumed by the engine.
///
/// Built once at the record boundary so the engine never has to reconcile
/// alternate field names or blood group encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    pub name: String,
    pub blood_group: Option<BloodGroup>,
    pub city: Option<String>,
    pub last_donation: Option<DateTime<Utc>>,
    pub rating: Option<f32>,
    pub total_donations: u32,
    pub average_response_minutes: Option<u32>,
    pub last_active: Option<DateTime<Utc>>,
    pub coordinates: Option<Coordinates>,
    pub is_blocked: bool,
}

impl Donor {
    /// Bare donor with only the mandatory identity fields populated.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: DonorId(id.into()),
            name: name.into(),
            blood_group: None,
            city: None,
            last_donation: None,
            rating: None,
            total_donations: 0,
            average_response_minutes: None,
            last_active: None,
            coordinates: None,
            is_blocked: false,
        }
    }
}

/// How quickly the patient needs blood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "IMMEDIATE")]
    Immediate,
    #[serde(rename = "WITHIN_24H")]
    Within24h,
    #[default]
    #[serde(rename = "SCHEDULED")]
    Scheduled,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Urgency::Immediate => "IMMEDIATE",
            Urgency::Within24h => "WITHIN_24H",
            Urgency::Scheduled => "SCHEDULED",
        }
    }
}

/// Normalised blood request. `blood_group` is the group the patient needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: RequestId,
    pub blood_group: Option<BloodGroup>,
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub urgency: Urgency,
}

impl BloodRequest {
    pub fn new(id: impl Into<String>, blood_group: BloodGroup) -> Self {
        Self {
            id: RequestId(id.into()),
            blood_group: Some(blood_group),
            city: None,
            coordinates: None,
            urgency: Urgency::default(),
        }
    }
}

pub(crate) fn same_city(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
