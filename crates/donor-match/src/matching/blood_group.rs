use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The eight canonical ABO/Rh groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

const O_NEG: usize = BloodGroup::ONegative as usize;
const O_POS: usize = BloodGroup::OPositive as usize;
const A_NEG: usize = BloodGroup::ANegative as usize;
const A_POS: usize = BloodGroup::APositive as usize;
const B_NEG: usize = BloodGroup::BNegative as usize;
const B_POS: usize = BloodGroup::BPositive as usize;
const AB_NEG: usize = BloodGroup::AbNegative as usize;
const AB_POS: usize = BloodGroup::AbPositive as usize;

/// `SUPPLY[donor][recipient]`.
static SUPPLY: [[bool; 8]; 8] = build_matrix();

const fn build_matrix() -> [[bool; 8]; 8] {
    let mut matrix = [[false; 8]; 8];

    let mut recipient = 0;
    while recipient < 8 {
        matrix[O_NEG][recipient] = true;
        recipient += 1;
    }

    matrix[O_POS][O_POS] = true;
    matrix[O_POS][A_POS] = true;
    matrix[O_POS][B_POS] = true;
    matrix[O_POS][AB_POS] = true;

    matrix[A_NEG][A_NEG] = true;
    matrix[A_NEG][A_POS] = true;
    matrix[A_NEG][AB_NEG] = true;
    matrix[A_NEG][AB_POS] = true;

    matrix[A_POS][A_POS] = true;
    matrix[A_POS][AB_POS] = true;

    matrix[B_NEG][B_NEG] = true;
    matrix[B_NEG][B_POS] = true;
    matrix[B_NEG][AB_NEG] = true;
    matrix[B_NEG][AB_POS] = true;

    matrix[B_POS][B_POS] = true;
    matrix[B_POS][AB_POS] = true;

    matrix[AB_NEG][AB_NEG] = true;
    matrix[AB_NEG][AB_POS] = true;

    matrix[AB_POS][AB_POS] = true;

    matrix
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::ONegative,
        BloodGroup::OPositive,
        BloodGroup::ANegative,
        BloodGroup::APositive,
        BloodGroup::BNegative,
        BloodGroup::BPositive,
        BloodGroup::AbNegative,
        BloodGroup::AbPositive,
    ];

    /// Shorthand label such as `AB-`.
    pub const fn label(self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    /// Whether a donor of this group may supply a patient of `recipient`.
    pub fn can_supply(self, recipient: BloodGroup) -> bool {
        SUPPLY[self as usize][recipient as usize]
    }

    /// Groups this donor group may supply, in canonical order.
    pub fn recipient_groups(self) -> Vec<BloodGroup> {
        Self::ALL
            .into_iter()
            .filter(|recipient| self.can_supply(*recipient))
            .collect()
    }

    /// Donor groups able to supply `recipient`, in canonical order.
    pub fn donor_groups_for(recipient: BloodGroup) -> Vec<BloodGroup> {
        Self::ALL
            .into_iter()
            .filter(|donor| donor.can_supply(recipient))
            .collect()
    }
}

/// Compatibility check over the canonical enumeration.
pub fn is_compatible(donor: BloodGroup, requested: BloodGroup) -> bool {
    donor.can_supply(requested)
}

/// Compatibility check over external labels. Unknown labels never match.
pub fn is_compatible_label(donor: &str, requested: &str) -> bool {
    match (donor.parse::<BloodGroup>(), requested.parse::<BloodGroup>()) {
        (Ok(donor), Ok(requested)) => is_compatible(donor, requested),
        _ => false,
    }
}

/// Raised when a label is neither shorthand (`A+`) nor enum style (`A_POSITIVE`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised blood group '{0}'")]
pub struct UnknownBloodGroup(pub String);

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let cleaned: String = value
            .trim()
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| match ch {
                '\u{2212}' | '\u{2013}' => '-',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        let group = match cleaned.as_str() {
            "A+" | "A_POSITIVE" | "A_POS" => BloodGroup::APositive,
            "A-" | "A_NEGATIVE" | "A_NEG" => BloodGroup::ANegative,
            "B+" | "B_POSITIVE" | "B_POS" => BloodGroup::BPositive,
            "B-" | "B_NEGATIVE" | "B_NEG" => BloodGroup::BNegative,
            "AB+" | "AB_POSITIVE" | "AB_POS" => BloodGroup::AbPositive,
            "AB-" | "AB_NEGATIVE" | "AB_NEG" => BloodGroup::AbNegative,
            "O+" | "O_POSITIVE" | "O_POS" => BloodGroup::OPositive,
            "O-" | "O_NEGATIVE" | "O_NEG" => BloodGroup::ONegative,
            _ => return Err(UnknownBloodGroup(value.to_string())),
        };
        Ok(group)
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BloodGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BloodGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
