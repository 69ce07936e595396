use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::blood_group::is_compatible;
use super::clock::days_since;
use super::domain::{same_city, BloodRequest, Donor};

/// Minimum whole days between two donations.
pub const DONATION_COOLDOWN_DAYS: i64 = 90;

/// How strictly the donor's city must match the request's city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalityRule {
    /// Both cities present and unequal excludes the donor.
    #[default]
    SameCity,
    /// City is ignored. Used when a dispatcher widens a search that came up empty.
    AnyCity,
}

/// First rule a donor failed, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ineligibility {
    IncompatibleBloodGroup,
    CoolingDown { days_remaining: i64 },
    Blocked,
    DifferentCity,
}

impl Ineligibility {
    pub fn summary(&self) -> String {
        match self {
            Ineligibility::IncompatibleBloodGroup => "blood group cannot supply request".to_string(),
            Ineligibility::CoolingDown { days_remaining } => {
                format!("in donation cooldown for {days_remaining} more day(s)")
            }
            Ineligibility::Blocked => "donor is blocked".to_string(),
            Ineligibility::DifferentCity => "donor is in a different city".to_string(),
        }
    }
}

pub(crate) fn blood_groups_compatible(donor: &Donor, request: &BloodRequest) -> bool {
    match (donor.blood_group, request.blood_group) {
        (Some(donor_group), Some(requested)) => is_compatible(donor_group, requested),
        _ => false,
    }
}

pub(crate) fn cooldown_cleared(donor: &Donor, now: DateTime<Utc>) -> bool {
    donor
        .last_donation
        .map(|last| days_since(last, now) >= DONATION_COOLDOWN_DAYS)
        .unwrap_or(true)
}

/// Date on which the donor leaves cooldown, if they have ever donated.
pub fn next_eligible_date(donor: &Donor) -> Option<DateTime<Utc>> {
    donor
        .last_donation
        .map(|last| last + Duration::days(DONATION_COOLDOWN_DAYS))
}

/// Evaluate the hard eligibility rules for one donor against one request.
pub fn check_eligibility(
    donor: &Donor,
    request: &BloodRequest,
    now: DateTime<Utc>,
    locality: LocalityRule,
) -> Result<(), Ineligibility> {
    if !blood_groups_compatible(donor, request) {
        return Err(Ineligibility::IncompatibleBloodGroup);
    }

    if let Some(last) = donor.last_donation {
        let elapsed = days_since(last, now);
        if elapsed < DONATION_COOLDOWN_DAYS {
            return Err(Ineligibility::CoolingDown {
                days_remaining: DONATION_COOLDOWN_DAYS - elapsed,
            });
        }
    }

    if donor.is_blocked {
        return Err(Ineligibility::Blocked);
    }

    if locality == LocalityRule::SameCity {
        if let (Some(donor_city), Some(request_city)) = (&donor.city, &request.city) {
            if !same_city(donor_city, request_city) {
                return Err(Ineligibility::DifferentCity);
            }
        }
    }

    Ok(())
}

pub(crate) fn filter<'a>(
    donors: &'a [Donor],
    request: &BloodRequest,
    now: DateTime<Utc>,
    locality: LocalityRule,
) -> Vec<&'a Donor> {
    donors
        .iter()
        .filter(|donor| check_eligibility(donor, request, now, locality).is_ok())
        .collect()
}
