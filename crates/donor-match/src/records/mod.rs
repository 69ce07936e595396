//! Boundary between loosely shaped donor/request documents and the engine's
//! canonical types.
//!
//! Upstream documents use camelCase keys, several alias spellings for the same
//! field, and two blood group encodings (`A+` and `A_POSITIVE`). Everything is
//! reconciled here, once, so nothing downstream branches on field names.

mod import;
mod normalizer;
mod parser;

pub use import::{DonorImportError, DonorImporter};

use serde::{Deserialize, Serialize};

use crate::matching::{BloodRequest, Coordinates, Donor, DonorId, RequestId};
use normalizer::{
    lenient_coordinates, lenient_count, lenient_flag, lenient_rating, lenient_text,
    normalize_optional, parse_blood_group, parse_timestamp, parse_urgency,
};

/// Coordinates as stored upstream; `lng` and `lon` are both seen in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesRecord {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "lng", alias = "longitude")]
    pub lon: f64,
}

impl CoordinatesRecord {
    fn into_coordinates(self) -> Option<Coordinates> {
        let valid = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);
        valid.then_some(Coordinates {
            lat: self.lat,
            lon: self.lon,
        })
    }
}

/// Donor document as stored by the profile service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    #[serde(default, alias = "uid", alias = "donorId", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(
        default,
        alias = "blood_group",
        alias = "bloodType",
        deserialize_with = "lenient_text"
    )]
    pub blood_group: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, alias = "last_donation_date", deserialize_with = "lenient_text")]
    pub last_donation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f32>,
    #[serde(
        default,
        alias = "donationCount",
        alias = "total_donations",
        deserialize_with = "lenient_count"
    )]
    pub total_donations: Option<u32>,
    /// Whole minutes; fractional values are floored.
    #[serde(default, alias = "average_response_time", deserialize_with = "lenient_count")]
    pub average_response_time: Option<u32>,
    #[serde(default, alias = "last_active_date", deserialize_with = "lenient_text")]
    pub last_active_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinates")]
    pub coordinates: Option<CoordinatesRecord>,
    #[serde(default, alias = "is_blocked", deserialize_with = "lenient_flag")]
    pub is_blocked: bool,
}

impl DonorRecord {
    /// Normalise into the engine's donor type. `fallback_id` is used when the
    /// document carries no identifier of its own.
    pub fn into_donor(self, fallback_id: &str) -> Donor {
        let id = normalize_optional(self.id.as_deref()).unwrap_or_else(|| fallback_id.to_string());
        let name = normalize_optional(self.full_name.as_deref()).unwrap_or_else(|| id.clone());

        Donor {
            blood_group: parse_blood_group(&id, self.blood_group.as_deref()),
            city: normalize_optional(self.city.as_deref()),
            last_donation: parse_timestamp(&id, "lastDonationDate", self.last_donation_date.as_deref()),
            rating: self.rating.filter(|rating| rating.is_finite()),
            total_donations: self.total_donations.unwrap_or(0),
            average_response_minutes: self.average_response_time,
            last_active: parse_timestamp(&id, "lastActiveDate", self.last_active_date.as_deref()),
            coordinates: self.coordinates.and_then(CoordinatesRecord::into_coordinates),
            is_blocked: self.is_blocked,
            id: DonorId(id),
            name,
        }
    }
}

/// Blood request document as submitted by a requester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestRecord {
    #[serde(default, alias = "requestId")]
    pub id: Option<String>,
    #[serde(default, alias = "blood_group", alias = "bloodType")]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub coordinates: Option<CoordinatesRecord>,
    #[serde(default)]
    pub urgency: Option<String>,
}

impl BloodRequestRecord {
    pub fn into_request(self, fallback_id: &str) -> BloodRequest {
        let id = normalize_optional(self.id.as_deref()).unwrap_or_else(|| fallback_id.to_string());

        BloodRequest {
            blood_group: parse_blood_group(&id, self.blood_group.as_deref()),
            city: normalize_optional(self.city.as_deref()),
            coordinates: self.coordinates.and_then(CoordinatesRecord::into_coordinates),
            urgency: parse_urgency(self.urgency.as_deref()),
            id: RequestId(id),
        }
    }
}

/// Normalise a batch of donor documents, numbering anonymous ones by position.
pub fn donors_from_records(records: Vec<DonorRecord>) -> Vec<Donor> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_donor(&format!("donor-{:04}", index + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MatchPayload;
    use crate::matching::{BloodGroup, Urgency};
    use serde_json::json;

    #[test]
    fn donor_aliases_normalise_to_one_shape() {
        let legacy: DonorRecord = serde_json::from_value(json!({
            "uid": "u-17",
            "name": "Asha Patil",
            "bloodGroup": "O_NEGATIVE",
            "city": "  Pune ",
            "lastDonationDate": "2026-01-10",
            "rating": 4.6,
            "donationCount": 12,
            "averageResponseTime": 25,
            "coordinates": { "lat": 18.52, "lng": 73.85 }
        }))
        .expect("legacy record");
        let current: DonorRecord = serde_json::from_value(json!({
            "id": "u-17",
            "fullName": "Asha Patil",
            "bloodGroup": "O-",
            "city": "Pune",
            "lastDonationDate": "2026-01-10T00:00:00Z",
            "rating": 4.6,
            "totalDonations": 12,
            "averageResponseTime": 25,
            "coordinates": { "lat": 18.52, "lon": 73.85 }
        }))
        .expect("current record");

        let legacy = legacy.into_donor("unused");
        let current = current.into_donor("unused");

        assert_eq!(legacy, current);
        assert_eq!(legacy.blood_group, Some(BloodGroup::ONegative));
        assert_eq!(legacy.city.as_deref(), Some("Pune"));
        assert_eq!(legacy.total_donations, 12);
    }

    #[test]
    fn bad_fields_degrade_to_missing() {
        let record: DonorRecord = serde_json::from_value(json!({
            "bloodGroup": "Z+",
            "city": "",
            "lastDonationDate": "not a date",
            "coordinates": { "lat": 123.0, "lon": 0.0 }
        }))
        .expect("record");

        let donor = record.into_donor("donor-0003");
        assert_eq!(donor.id.0, "donor-0003");
        assert_eq!(donor.name, "donor-0003");
        assert_eq!(donor.blood_group, None);
        assert_eq!(donor.city, None);
        assert_eq!(donor.last_donation, None);
        assert_eq!(donor.coordinates, None);
        assert!(!donor.is_blocked);
    }

    #[test]
    fn one_malformed_donor_does_not_reject_the_batch() {
        let payload: MatchPayload = serde_json::from_value(json!({
            "donors": [
                {
                    "id": "d-1",
                    "bloodGroup": "O-",
                    "city": "Pune",
                    "totalDonations": 4,
                    "averageResponseTime": 40
                },
                {
                    "id": "d-2",
                    "bloodGroup": "A+",
                    "city": "Pune",
                    "rating": "4.2",
                    "totalDonations": "3",
                    "averageResponseTime": 22.5,
                    "isBlocked": null,
                    "coordinates": "18.52,73.85"
                },
                {
                    "id": "d-3",
                    "bloodGroup": "B+",
                    "totalDonations": -2,
                    "averageResponseTime": "fast",
                    "isBlocked": "yes",
                    "lastActiveDate": 20260101
                }
            ],
            "request": { "bloodGroup": "AB+", "city": "Pune" }
        }))
        .expect("payload deserializes despite bad fields");

        let (donors, _) = payload.into_parts().expect("request present");
        assert_eq!(donors.len(), 3);

        assert_eq!(donors[0].total_donations, 4);
        assert_eq!(donors[0].average_response_minutes, Some(40));

        let lenient = &donors[1];
        assert_eq!(lenient.id.0, "d-2");
        assert_eq!(lenient.rating, Some(4.2));
        assert_eq!(lenient.total_donations, 3);
        assert_eq!(lenient.average_response_minutes, Some(22));
        assert!(!lenient.is_blocked);
        assert_eq!(lenient.coordinates, None);

        let degraded = &donors[2];
        assert_eq!(degraded.total_donations, 0);
        assert_eq!(degraded.average_response_minutes, None);
        assert!(degraded.is_blocked);
        assert_eq!(degraded.last_active, None);
    }

    #[test]
    fn request_record_normalises_urgency_and_group() {
        let record: BloodRequestRecord = serde_json::from_value(json!({
            "requestId": "r-9",
            "bloodGroup": "AB_POSITIVE",
            "city": "Pune",
            "urgency": "IMMEDIATE"
        }))
        .expect("request");

        let request = record.into_request("unused");
        assert_eq!(request.id.0, "r-9");
        assert_eq!(request.blood_group, Some(BloodGroup::AbPositive));
        assert_eq!(request.urgency, Urgency::Immediate);
    }

    #[test]
    fn batch_numbers_anonymous_records() {
        let donors = donors_from_records(vec![DonorRecord::default(), DonorRecord::default()]);
        let ids: Vec<&str> = donors.iter().map(|donor| donor.id.0.as_str()).collect();
        assert_eq!(ids, vec!["donor-0001", "donor-0002"]);
    }
}
