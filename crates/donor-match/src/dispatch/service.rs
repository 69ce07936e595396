use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::directory::{DirectoryError, DonorDirectory, DonorNotification, DonorNotifier};
use crate::config::DispatchConfig;
use crate::matching::eligibility::blood_groups_compatible;
use crate::matching::{
    BloodGroup, BloodRequest, Donor, DonorId, Ineligibility, LocalityRule, MatchingEngine,
    RequestId, ScoredDonor,
};
use crate::records::{donors_from_records, BloodRequestRecord, DonorRecord};

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_request_id() -> String {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:06}")
}

/// Caller-supplied donors plus the request to match them against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPayload {
    #[serde(default)]
    pub donors: Vec<DonorRecord>,
    #[serde(default)]
    pub request: Option<BloodRequestRecord>,
}

impl MatchPayload {
    /// Normalise both sides. A missing request is a caller error, not bad data.
    pub fn into_parts(self) -> Result<(Vec<Donor>, BloodRequest), DispatchError> {
        let request = self
            .request
            .ok_or(DispatchError::MissingRequest)?
            .into_request(&next_request_id());
        Ok((donors_from_records(self.donors), request))
    }
}

/// Donor left out of an eligibility check, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDonor {
    pub donor_id: DonorId,
    #[serde(flatten)]
    pub reason: Ineligibility,
    pub summary: String,
}

/// Outcome of dispatching one blood request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub request_id: RequestId,
    pub blood_group: Option<BloodGroup>,
    pub candidate_count: usize,
    pub compatible_donor_count: usize,
    pub eligible_donor_count: usize,
    /// True when the city-restricted search came up empty and all cities were searched.
    pub widened: bool,
    pub ranked: Vec<ScoredDonor>,
    pub notified: Vec<DonorId>,
    pub failed_notifications: Vec<DonorId>,
}

/// Service composing the donor directory, the matching engine and the notifier.
pub struct DispatchService<D, N> {
    directory: Arc<D>,
    notifier: Arc<N>,
    engine: Arc<MatchingEngine>,
    config: DispatchConfig,
}

impl<D, N> DispatchService<D, N>
where
    D: DonorDirectory + 'static,
    N: DonorNotifier + 'static,
{
    pub fn new(
        directory: Arc<D>,
        notifier: Arc<N>,
        engine: MatchingEngine,
        config: DispatchConfig,
    ) -> Self {
        Self {
            directory,
            notifier,
            engine: Arc::new(engine),
            config,
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Find, rank and notify donors for a request.
    pub fn dispatch(&self, request: &BloodRequest) -> Result<DispatchReport, DispatchError> {
        let local = self.directory.candidates(request.city.as_deref())?;
        let widen = self.config.widen_search
            && request.city.is_some()
            && self.engine.filter_eligible(&local, request).is_empty();

        let (candidates, locality) = if widen {
            debug!(request_id = %request.id.0, "no eligible donors in city, widening search");
            (self.directory.candidates(None)?, LocalityRule::AnyCity)
        } else {
            (local, LocalityRule::SameCity)
        };

        let compatible_donor_count = candidates
            .iter()
            .filter(|donor| blood_groups_compatible(donor, request))
            .count();

        let eligible = self.engine.filter_eligible_with(&candidates, request, locality);
        let eligible_donor_count = eligible.len();
        let ranked = self.engine.rank(eligible, request);

        let mut notified = Vec::new();
        let mut failed_notifications = Vec::new();
        for (position, entry) in ranked.iter().take(self.config.notify_limit).enumerate() {
            let notification = DonorNotification {
                donor_id: entry.donor.id.clone(),
                request_id: request.id.clone(),
                blood_group: request.blood_group,
                urgency: request.urgency,
                rank: position + 1,
                score: entry.score,
                priority: entry.priority,
            };
            match self.notifier.notify(notification) {
                Ok(()) => notified.push(entry.donor.id.clone()),
                Err(err) => {
                    warn!(donor_id = %entry.donor.id.0, %err, "donor notification failed");
                    failed_notifications.push(entry.donor.id.clone());
                }
            }
        }

        info!(
            request_id = %request.id.0,
            candidates = candidates.len(),
            compatible = compatible_donor_count,
            eligible = eligible_donor_count,
            notified = notified.len(),
            widened = widen,
            "dispatched blood request"
        );

        Ok(DispatchReport {
            request_id: request.id.clone(),
            blood_group: request.blood_group,
            candidate_count: candidates.len(),
            compatible_donor_count,
            eligible_donor_count,
            widened: widen,
            ranked,
            notified,
            failed_notifications,
        })
    }

    /// Rank caller-supplied donors without touching the directory or notifier.
    pub fn rank_payload(
        &self,
        payload: MatchPayload,
    ) -> Result<(BloodRequest, Vec<ScoredDonor>), DispatchError> {
        let (donors, request) = payload.into_parts()?;
        let eligible = self.engine.filter_eligible(&donors, &request);
        let ranked = self.engine.rank(eligible, &request);
        Ok((request, ranked))
    }

    /// Split caller-supplied donors into eligible and excluded, preserving
    /// their order. Each exclusion carries the first rule the donor failed.
    pub fn eligible_payload(
        &self,
        payload: MatchPayload,
    ) -> Result<(BloodRequest, Vec<Donor>, Vec<ExcludedDonor>), DispatchError> {
        let (donors, request) = payload.into_parts()?;
        let mut eligible = Vec::new();
        let mut excluded = Vec::new();

        for donor in donors {
            match self.engine.check(&donor, &request) {
                Ok(()) => eligible.push(donor),
                Err(reason) => excluded.push(ExcludedDonor {
                    summary: reason.summary(),
                    donor_id: donor.id,
                    reason,
                }),
            }
        }

        Ok((request, eligible, excluded))
    }
}

/// Error raised by the dispatch service.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("a blood request is required to match donors")]
    MissingRequest,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::MissingRequest => StatusCode::BAD_REQUEST,
            DispatchError::Directory(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
