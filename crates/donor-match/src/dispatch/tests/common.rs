use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::DispatchConfig;
use crate::dispatch::directory::{
    DirectoryError, DonorDirectory, DonorNotification, DonorNotifier, NotifyError,
};
use crate::dispatch::{matching_router, DispatchService};
use crate::matching::{
    domain::same_city, BloodGroup, BloodRequest, Donor, FixedClock, MatchingEngine, Urgency,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
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

pub(super) fn roster() -> Vec<Donor> {
    let mut veteran = donor("pune-veteran", BloodGroup::ONegative, "Pune");
    veteran.rating = Some(4.9);
    veteran.total_donations = 14;

    let mut cooling = donor("pune-cooling", BloodGroup::OPositive, "Pune");
    cooling.last_donation = Some(now() - Duration::days(20));

    let mut blocked = donor("pune-blocked", BloodGroup::ONegative, "Pune");
    blocked.is_blocked = true;

    let regular = donor("pune-regular", BloodGroup::APositive, "Pune");
    let mumbai = donor("mumbai-b", BloodGroup::BPositive, "Mumbai");
    let mut mumbai_o = donor("mumbai-o", BloodGroup::ONegative, "Mumbai");
    mumbai_o.total_donations = 2;

    vec![veteran, cooling, blocked, regular, mumbai, mumbai_o]
}

pub(super) fn blood_request(group: BloodGroup, city: &str) -> BloodRequest {
    let mut request = BloodRequest::new("req-test", group);
    request.city = Some(city.to_string());
    request.urgency = Urgency::Immediate;
    request
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    donors: Arc<Mutex<Vec<Donor>>>,
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl MemoryDirectory {
    pub(super) fn with(donors: Vec<Donor>) -> Self {
        Self {
            donors: Arc::new(Mutex::new(donors)),
            calls: Arc::default(),
        }
    }

    pub(super) fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().expect("directory mutex poisoned").clone()
    }
}

impl DonorDirectory for MemoryDirectory {
    fn candidates(&self, city: Option<&str>) -> Result<Vec<Donor>, DirectoryError> {
        self.calls
            .lock()
            .expect("directory mutex poisoned")
            .push(city.map(str::to_string));
        let guard = self.donors.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|donor| !donor.is_blocked)
            .filter(|donor| match (city, donor.city.as_deref()) {
                (Some(wanted), Some(actual)) => same_city(wanted, actual),
                _ => true,
            })
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableDirectory;

impl DonorDirectory for UnavailableDirectory {
    fn candidates(&self, _city: Option<&str>) -> Result<Vec<Donor>, DirectoryError> {
        Err(DirectoryError::Unavailable("document store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DonorNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl DonorNotifier for MemoryNotifier {
    fn notify(&self, notification: DonorNotification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Rejects notifications addressed to one donor.
pub(super) struct FlakyNotifier {
    pub(super) unreachable: String,
}

impl DonorNotifier for FlakyNotifier {
    fn notify(&self, notification: DonorNotification) -> Result<(), NotifyError> {
        if notification.donor_id.0 == self.unreachable {
            Err(NotifyError::Transport("sms gateway timeout".to_string()))
        } else {
            Ok(())
        }
    }
}

pub(super) fn build_service(
    config: DispatchConfig,
) -> (
    DispatchService<MemoryDirectory, MemoryNotifier>,
    MemoryDirectory,
    MemoryNotifier,
) {
    let directory = MemoryDirectory::with(roster());
    let notifier = MemoryNotifier::default();
    let service = DispatchService::new(
        Arc::new(directory.clone()),
        Arc::new(notifier.clone()),
        engine(),
        config,
    );
    (service, directory, notifier)
}

pub(super) fn router_with_service(
    service: DispatchService<MemoryDirectory, MemoryNotifier>,
) -> axum::Router {
    matching_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
