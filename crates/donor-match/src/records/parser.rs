use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::normalizer::{parse_count, parse_flag};
use super::{CoordinatesRecord, DonorRecord};

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<DonorRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<DonorRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct DonorRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    blood_group: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_donation_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_donations: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    average_response_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_active_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lat: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lon: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_blocked: Option<String>,
}

impl DonorRow {
    fn into_record(self) -> DonorRecord {
        let coordinates = match (parse_number(&self.lat), parse_number(&self.lon)) {
            (Some(lat), Some(lon)) => Some(CoordinatesRecord { lat, lon }),
            _ => None,
        };

        DonorRecord {
            id: self.id,
            full_name: self.name,
            blood_group: self.blood_group,
            city: self.city,
            last_donation_date: self.last_donation_date,
            rating: parse_number(&self.rating),
            total_donations: self.total_donations.as_deref().and_then(parse_count),
            average_response_time: self
                .average_response_time
                .as_deref()
                .and_then(parse_count),
            last_active_date: self.last_active_date,
            coordinates,
            is_blocked: self.is_blocked.as_deref().map(parse_flag).unwrap_or(false),
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|raw| raw.trim().parse().ok())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
