use crate::matching::{is_compatible, is_compatible_label, BloodGroup};

use BloodGroup::*;

#[test]
fn every_group_supplies_itself() {
    for group in BloodGroup::ALL {
        assert!(is_compatible(group, group), "{group} should supply itself");
    }
}

#[test]
fn o_negative_supplies_every_group() {
    for requested in BloodGroup::ALL {
        assert!(is_compatible(ONegative, requested));
    }
}

#[test]
fn ab_positive_receives_from_every_group() {
    for donor in BloodGroup::ALL {
        assert!(is_compatible(donor, AbPositive));
    }
}

#[test]
fn matrix_matches_transfusion_table() {
    let expected: [(BloodGroup, &[BloodGroup]); 8] = [
        (ONegative, &[ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative, AbPositive]),
        (OPositive, &[OPositive, APositive, BPositive, AbPositive]),
        (ANegative, &[ANegative, APositive, AbNegative, AbPositive]),
        (APositive, &[APositive, AbPositive]),
        (BNegative, &[BNegative, BPositive, AbNegative, AbPositive]),
        (BPositive, &[BPositive, AbPositive]),
        (AbNegative, &[AbNegative, AbPositive]),
        (AbPositive, &[AbPositive]),
    ];

    for (donor, recipients) in expected {
        for requested in BloodGroup::ALL {
            assert_eq!(
                is_compatible(donor, requested),
                recipients.contains(&requested),
                "{donor} -> {requested}"
            );
        }
    }
}

#[test]
fn ab_positive_cannot_supply_a_positive() {
    assert!(!is_compatible(AbPositive, APositive));
    assert!(!is_compatible_label("AB+", "A+"));
}

#[test]
fn both_encodings_parse_to_the_same_group() {
    assert_eq!("A_POSITIVE".parse::<BloodGroup>(), Ok(APositive));
    assert_eq!("a+".parse::<BloodGroup>(), Ok(APositive));
    assert_eq!(" ab_negative ".parse::<BloodGroup>(), Ok(AbNegative));
    assert_eq!("O\u{2212}".parse::<BloodGroup>(), Ok(ONegative));
    assert!(is_compatible_label("O_NEGATIVE", "AB+"));
}

#[test]
fn unknown_labels_never_match() {
    assert!("C+".parse::<BloodGroup>().is_err());
    assert!(!is_compatible_label("C+", "AB+"));
    assert!(!is_compatible_label("O-", ""));
}

#[test]
fn donor_and_recipient_listings_follow_the_matrix() {
    assert_eq!(AbPositive.recipient_groups(), vec![AbPositive]);
    assert_eq!(ONegative.recipient_groups().len(), 8);
    assert_eq!(BloodGroup::donor_groups_for(ONegative), vec![ONegative]);
    assert_eq!(
        BloodGroup::donor_groups_for(BNegative),
        vec![ONegative, BNegative]
    );
}

#[test]
fn serializes_as_shorthand() {
    let json = serde_json::to_string(&AbNegative).expect("serialize");
    assert_eq!(json, "\"AB-\"");
    let parsed: BloodGroup = serde_json::from_str("\"B_POSITIVE\"").expect("deserialize");
    assert_eq!(parsed, BPositive);
}
