use chrono::{DateTime, NaiveDate, Utc};
use donor_match::dispatch::{
    DirectoryError, DonorDirectory, DonorNotification, DonorNotifier, NotifyError,
};
use donor_match::matching::Donor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Roster held in memory, seeded from a CSV export at startup.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDonorDirectory {
    donors: Arc<Mutex<Vec<Donor>>>,
}

impl InMemoryDonorDirectory {
    pub(crate) fn seeded(donors: Vec<Donor>) -> Self {
        Self {
            donors: Arc::new(Mutex::new(donors)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.donors.lock().expect("directory mutex poisoned").len()
    }
}

impl DonorDirectory for InMemoryDonorDirectory {
    fn candidates(&self, city: Option<&str>) -> Result<Vec<Donor>, DirectoryError> {
        let wanted = city.map(str::to_lowercase);
        let guard = self.donors.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|donor| !donor.is_blocked)
            .filter(|donor| match (&wanted, &donor.city) {
                (Some(wanted), Some(actual)) => actual.to_lowercase() == *wanted,
                _ => true,
            })
            .cloned()
            .collect())
    }
}

/// Notifier that logs each outbound request and keeps it for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl DonorNotifier for LoggingNotifier {
    fn notify(&self, notification: DonorNotification) -> Result<(), NotifyError> {
        info!(
            donor_id = %notification.donor_id.0,
            request_id = %notification.request_id.0,
            rank = notification.rank,
            score = notification.score,
            "donor notified"
        );
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<DonorNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Noon UTC on `date`, so whole-day arithmetic is unaffected by the hour.
pub(crate) fn as_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .map(|moment| moment.and_utc())
        .unwrap_or_else(Utc::now)
}
