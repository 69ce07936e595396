use chrono::{DateTime, Utc};

use super::super::clock::days_since;
use super::super::domain::{same_city, BloodRequest, Donor, Urgency};
use super::super::eligibility::{blood_groups_compatible, cooldown_cleared};
use super::{ScoreBreakdown, ScoreComponent, ScoreSignal};

const LOCALITY_POINTS: u32 = 30;
const COMPATIBILITY_POINTS: u32 = 25;
const COOLDOWN_POINTS: u32 = 20;

fn rating_points(rating: f32) -> u32 {
    if rating >= 4.5 {
        15
    } else if rating >= 4.0 {
        12
    } else if rating >= 3.5 {
        8
    } else if rating >= 3.0 {
        5
    } else {
        0
    }
}

fn experience_points(total_donations: u32) -> u32 {
    match total_donations {
        10.. => 10,
        5..=9 => 7,
        1..=4 => 5,
        0 => 0,
    }
}

fn responsiveness_points(minutes: u32) -> u32 {
    match minutes {
        0..=30 => 8,
        31..=60 => 5,
        61..=120 => 3,
        _ => 0,
    }
}

fn activity_points(days_idle: i64) -> u32 {
    if days_idle <= 7 {
        5
    } else if days_idle <= 30 {
        3
    } else {
        0
    }
}

fn proximity_points(distance_km: f64) -> u32 {
    if distance_km <= 5.0 {
        8
    } else if distance_km <= 10.0 {
        5
    } else if distance_km <= 20.0 {
        2
    } else {
        0
    }
}

/// `floor(total * 1.2)` in integer arithmetic.
fn apply_urgency(total: u32, urgency: Urgency) -> u32 {
    match urgency {
        Urgency::Immediate => total.saturating_mul(6) / 5,
        Urgency::Within24h | Urgency::Scheduled => total,
    }
}

pub(crate) fn score_donor(
    donor: &Donor,
    request: &BloodRequest,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    if donor.blood_group.is_none() || request.blood_group.is_none() {
        return ScoreBreakdown::empty();
    }

    let mut components = Vec::new();
    let mut push = |signal: ScoreSignal, points: u32, notes: String| {
        if points > 0 {
            components.push(ScoreComponent {
                signal,
                points,
                notes,
            });
        }
    };

    if let (Some(donor_city), Some(request_city)) = (&donor.city, &request.city) {
        if same_city(donor_city, request_city) {
            push(
                ScoreSignal::Locality,
                LOCALITY_POINTS,
                format!("located in {request_city}"),
            );
        }
    }

    if blood_groups_compatible(donor, request) {
        push(
            ScoreSignal::Compatibility,
            COMPATIBILITY_POINTS,
            "blood group can supply request".to_string(),
        );
    }

    if cooldown_cleared(donor, now) {
        let notes = match donor.last_donation {
            Some(last) => format!("last donated {} days ago", days_since(last, now)),
            None => "no recorded donations".to_string(),
        };
        push(ScoreSignal::CooldownCleared, COOLDOWN_POINTS, notes);
    }

    if let Some(rating) = donor.rating {
        push(
            ScoreSignal::Rating,
            rating_points(rating),
            format!("rated {rating:.1}"),
        );
    }

    push(
        ScoreSignal::Experience,
        experience_points(donor.total_donations),
        format!("{} verified donation(s)", donor.total_donations),
    );

    if let Some(minutes) = donor.average_response_minutes {
        push(
            ScoreSignal::Responsiveness,
            responsiveness_points(minutes),
            format!("responds in {minutes} min on average"),
        );
    }

    if let Some(active) = donor.last_active {
        let idle = days_since(active, now);
        push(
            ScoreSignal::RecentActivity,
            activity_points(idle),
            format!("active {idle} day(s) ago"),
        );
    }

    if let (Some(from), Some(to)) = (donor.coordinates, request.coordinates) {
        let distance = from.distance_km(to);
        push(
            ScoreSignal::Proximity,
            proximity_points(distance),
            format!("{distance:.1} km away"),
        );
    }

    let raw_total: u32 = components.iter().map(|component| component.points).sum();
    let total = apply_urgency(raw_total, request.urgency);

    ScoreBreakdown {
        components,
        raw_total,
        urgency_applied: total != raw_total,
        total,
    }
}
