use std::sync::Arc;

use super::common::*;
use crate::config::DispatchConfig;
use crate::dispatch::{DispatchError, DispatchService, MatchPayload};
use crate::matching::{BloodGroup, PriorityLevel};
use crate::records::{BloodRequestRecord, DonorRecord};

fn ids(list: &[crate::matching::DonorId]) -> Vec<&str> {
    list.iter().map(|id| id.0.as_str()).collect()
}

#[test]
fn dispatch_ranks_local_donors_and_notifies_in_order() {
    let (service, directory, notifier) = build_service(DispatchConfig::default());
    let request = blood_request(BloodGroup::AbPositive, "Pune");

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert!(!report.widened);
    assert_eq!(report.candidate_count, 3);
    assert_eq!(report.compatible_donor_count, 3);
    assert_eq!(report.eligible_donor_count, 2);
    let ranked: Vec<(&str, u32)> = report
        .ranked
        .iter()
        .map(|entry| (entry.donor.id.0.as_str(), entry.score))
        .collect();
    assert_eq!(ranked, vec![("pune-veteran", 120), ("pune-regular", 90)]);
    assert_eq!(ids(&report.notified), vec!["pune-veteran", "pune-regular"]);
    assert!(report.failed_notifications.is_empty());
    assert_eq!(directory.calls(), vec![Some("Pune".to_string())]);

    let events = notifier.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].rank, 1);
    assert_eq!(events[0].priority, PriorityLevel::Highest);
    assert_eq!(events[1].donor_id.0, "pune-regular");
}

#[test]
fn dispatch_widens_to_all_cities_when_city_is_empty() {
    let (service, directory, _) = build_service(DispatchConfig::default());
    let request = blood_request(BloodGroup::BPositive, "Nashik");

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert!(report.widened);
    assert_eq!(
        directory.calls(),
        vec![Some("Nashik".to_string()), None]
    );
    assert_eq!(report.compatible_donor_count, 4);
    let ranked: Vec<(&str, u32)> = report
        .ranked
        .iter()
        .map(|entry| (entry.donor.id.0.as_str(), entry.score))
        .collect();
    assert_eq!(
        ranked,
        vec![("pune-veteran", 84), ("mumbai-o", 60), ("mumbai-b", 54)]
    );
}

#[test]
fn dispatch_respects_disabled_widening() {
    let config = DispatchConfig {
        widen_search: false,
        ..DispatchConfig::default()
    };
    let (service, directory, notifier) = build_service(config);
    let request = blood_request(BloodGroup::BPositive, "Nashik");

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert!(!report.widened);
    assert!(report.ranked.is_empty());
    assert_eq!(directory.calls().len(), 1);
    assert!(notifier.events().is_empty());
}

#[test]
fn dispatch_caps_notifications_at_limit() {
    let config = DispatchConfig {
        notify_limit: 1,
        ..DispatchConfig::default()
    };
    let (service, _, notifier) = build_service(config);
    let request = blood_request(BloodGroup::AbPositive, "Pune");

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert_eq!(report.ranked.len(), 2);
    assert_eq!(ids(&report.notified), vec!["pune-veteran"]);
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].score, 120);
}

#[test]
fn failed_notification_does_not_abort_dispatch() {
    let service = DispatchService::new(
        Arc::new(MemoryDirectory::with(roster())),
        Arc::new(FlakyNotifier {
            unreachable: "pune-veteran".to_string(),
        }),
        engine(),
        DispatchConfig::default(),
    );
    let request = blood_request(BloodGroup::AbPositive, "Pune");

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert_eq!(ids(&report.failed_notifications), vec!["pune-veteran"]);
    assert_eq!(ids(&report.notified), vec!["pune-regular"]);
}

#[test]
fn directory_outage_is_reported() {
    let service = DispatchService::new(
        Arc::new(UnavailableDirectory),
        Arc::new(MemoryNotifier::default()),
        engine(),
        DispatchConfig::default(),
    );
    let request = blood_request(BloodGroup::AbPositive, "Pune");

    match service.dispatch(&request) {
        Err(DispatchError::Directory(_)) => {}
        other => panic!("expected directory error, got {other:?}"),
    }
}

#[test]
fn request_without_blood_group_matches_nobody() {
    let (service, _, notifier) = build_service(DispatchConfig::default());
    let mut request = blood_request(BloodGroup::AbPositive, "Pune");
    request.blood_group = None;

    let report = service.dispatch(&request).expect("dispatch succeeds");

    assert_eq!(report.compatible_donor_count, 0);
    assert!(report.ranked.is_empty());
    assert!(notifier.events().is_empty());
}

#[test]
fn payload_without_request_fails_fast() {
    let (service, _, _) = build_service(DispatchConfig::default());
    let payload = MatchPayload {
        donors: vec![DonorRecord::default()],
        request: None,
    };

    match service.rank_payload(payload) {
        Err(DispatchError::MissingRequest) => {}
        other => panic!("expected missing request, got {other:?}"),
    }
}

#[test]
fn payload_ranking_filters_before_scoring() {
    let (service, _, _) = build_service(DispatchConfig::default());
    let payload = MatchPayload {
        donors: vec![
            DonorRecord {
                id: Some("a-plus".to_string()),
                blood_group: Some("A+".to_string()),
                city: Some("Delhi".to_string()),
                ..DonorRecord::default()
            },
            DonorRecord {
                id: Some("b-pos".to_string()),
                blood_group: Some("B_POSITIVE".to_string()),
                city: Some("delhi".to_string()),
                ..DonorRecord::default()
            },
        ],
        request: Some(BloodRequestRecord {
            blood_group: Some("B+".to_string()),
            city: Some("Delhi".to_string()),
            ..BloodRequestRecord::default()
        }),
    };

    let (request, ranked) = service.rank_payload(payload).expect("ranking succeeds");

    assert_eq!(request.blood_group, Some(BloodGroup::BPositive));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].donor.id.0, "b-pos");
    assert_eq!(ranked[0].score, 75);
}
