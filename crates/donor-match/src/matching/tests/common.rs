use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::matching::{
    BloodGroup, BloodRequest, Coordinates, Donor, FixedClock, MatchingEngine, Urgency,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn engine() -> MatchingEngine {
    MatchingEngine::new(Arc::new(FixedClock(now())))
}

pub(super) fn donor(id: &str, group: BloodGroup, city: &str) -> Donor {
    let mut donor = Donor::new(id, format!("Donor {id}"));
    donor.blood_group = Some(group);
    donor.city = Some(city.to_string());
    donor
}

pub(super) fn request(group: BloodGroup, city: &str, urgency: Urgency) -> BloodRequest {
    let mut request = BloodRequest::new("req-1", group);
    request.city = Some(city.to_string());
    request.urgency = urgency;
    request
}

pub(super) fn at(lat: f64, lon: f64) -> Option<Coordinates> {
    Some(Coordinates { lat, lon })
}
