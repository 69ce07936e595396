//! Donor eligibility and priority scoring.
//!
//! Everything in this module is a pure computation over the supplied donor and
//! request snapshots. The only ambient input is "now", read once per call from
//! the engine's [`Clock`].

pub mod blood_group;
pub mod clock;
pub mod domain;
pub mod eligibility;
pub mod geo;
pub mod scoring;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use blood_group::{is_compatible, is_compatible_label, BloodGroup, UnknownBloodGroup};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{BloodRequest, Coordinates, Donor, DonorId, RequestId, Urgency};
pub use eligibility::{
    check_eligibility, next_eligible_date, Ineligibility, LocalityRule, DONATION_COOLDOWN_DAYS,
};
pub use geo::haversine_km;
pub use scoring::{PriorityLevel, ScoreBreakdown, ScoreComponent, ScoreSignal, ScoredDonor};

/// Stateless evaluator combining the eligibility filter and the priority scorer.
#[derive(Clone)]
pub struct MatchingEngine {
    clock: Arc<dyn Clock>,
}

impl MatchingEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Engine reading the wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Donors that may be asked to give for `request`, in input order.
    pub fn filter_eligible<'a>(&self, donors: &'a [Donor], request: &BloodRequest) -> Vec<&'a Donor> {
        self.filter_eligible_with(donors, request, LocalityRule::SameCity)
    }

    /// Same as [`Self::filter_eligible`] with an explicit locality rule.
    pub fn filter_eligible_with<'a>(
        &self,
        donors: &'a [Donor],
        request: &BloodRequest,
        locality: LocalityRule,
    ) -> Vec<&'a Donor> {
        eligibility::filter(donors, request, self.clock.now(), locality)
    }

    pub fn check(&self, donor: &Donor, request: &BloodRequest) -> Result<(), Ineligibility> {
        check_eligibility(donor, request, self.clock.now(), LocalityRule::SameCity)
    }

    pub fn score(&self, donor: &Donor, request: &BloodRequest) -> u32 {
        self.score_breakdown(donor, request).total
    }

    pub fn score_breakdown(&self, donor: &Donor, request: &BloodRequest) -> ScoreBreakdown {
        scoring::rules::score_donor(donor, request, self.clock.now())
    }

    /// Score every donor and sort descending. Ties keep their input order.
    pub fn rank<'a, I>(&self, donors: I, request: &BloodRequest) -> Vec<ScoredDonor>
    where
        I: IntoIterator<Item = &'a Donor>,
    {
        let now = self.clock.now();
        let mut ranked: Vec<ScoredDonor> = donors
            .into_iter()
            .map(|donor| {
                let score = scoring::rules::score_donor(donor, request, now).total;
                ScoredDonor::new(donor.clone(), score)
            })
            .collect();

        ranked.sort_by(|left, right| right.score.cmp(&left.score));
        ranked
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine").finish_non_exhaustive()
    }
}
