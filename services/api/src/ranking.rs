use crate::infra::{as_of, parse_date};
use chrono::{NaiveDate, Utc};
use clap::{Args, ValueEnum};
use donor_match::error::AppError;
use donor_match::matching::{
    BloodGroup, BloodRequest, Coordinates, FixedClock, MatchingEngine, ScoredDonor, Urgency,
};
use donor_match::records::DonorImporter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Donor roster CSV export
    #[arg(long)]
    pub(crate) donors: PathBuf,
    /// Blood group the patient needs (A+, A_POSITIVE, ...)
    #[arg(long, value_parser = parse_blood_group)]
    pub(crate) blood_group: BloodGroup,
    /// Restrict candidates to this city (case-insensitive)
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long, value_enum, default_value_t = UrgencyArg::Scheduled)]
    pub(crate) urgency: UrgencyArg,
    /// Request latitude, used together with --lon for proximity scoring
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lon: Option<f64>,
    /// Evaluate cooldowns and activity as of this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) on: Option<NaiveDate>,
    /// Emit the ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum UrgencyArg {
    Immediate,
    #[value(name = "within-24h", alias = "within_24h")]
    Within24h,
    Scheduled,
}

impl From<UrgencyArg> for Urgency {
    fn from(value: UrgencyArg) -> Self {
        match value {
            UrgencyArg::Immediate => Urgency::Immediate,
            UrgencyArg::Within24h => Urgency::Within24h,
            UrgencyArg::Scheduled => Urgency::Scheduled,
        }
    }
}

fn parse_blood_group(raw: &str) -> Result<BloodGroup, String> {
    raw.parse::<BloodGroup>().map_err(|err| err.to_string())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let donors = DonorImporter::from_path(&args.donors)?;
    let request = build_request(&args);
    let today = args.on.unwrap_or_else(|| Utc::now().date_naive());
    let engine = MatchingEngine::new(Arc::new(FixedClock(as_of(today))));

    let eligible = engine.filter_eligible(&donors, &request);
    let ranked = engine.rank(eligible, &request);

    if args.json {
        let rendered = serde_json::to_string_pretty(&ranked)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        println!("{rendered}");
    } else {
        println!("{}", render_ranking(&request, donors.len(), &ranked, today));
    }
    Ok(())
}

fn build_request(args: &RankArgs) -> BloodRequest {
    let mut request = BloodRequest::new("cli-request", args.blood_group);
    request.city = args.city.clone();
    request.urgency = args.urgency.into();
    request.coordinates = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    };
    request
}

fn render_ranking(
    request: &BloodRequest,
    roster_size: usize,
    ranked: &[ScoredDonor],
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let group = request
        .blood_group
        .map(BloodGroup::label)
        .unwrap_or("unknown");
    out.push_str(&format!(
        "Request: {group} in {} ({}) as of {today}\n",
        request.city.as_deref().unwrap_or("any city"),
        request.urgency.label()
    ));
    out.push_str(&format!(
        "Eligible donors: {} of {roster_size}\n",
        ranked.len()
    ));

    if ranked.is_empty() {
        out.push_str("No eligible donors found.");
        return out;
    }

    out.push_str(&format!(
        "\n{:>4}  {:<12} {:<24} {:<5} {:>5}  {}\n",
        "#", "Donor", "Name", "Group", "Score", "Priority"
    ));
    for (position, entry) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<12} {:<24} {:<5} {:>5}  {}\n",
            position + 1,
            entry.donor.id.0,
            entry.donor.name,
            entry.donor.blood_group.map(BloodGroup::label).unwrap_or("-"),
            entry.score,
            entry.priority.label()
        ));
    }
    out.truncate(out.trim_end().len());
    out
}

pub(crate) fn run_matrix() {
    println!("{}", render_matrix());
}

fn render_matrix() -> String {
    let mut out = String::from("Donor \\ Recipient");
    for recipient in BloodGroup::ALL {
        out.push_str(&format!(" {:>4}", recipient.label()));
    }
    for donor in BloodGroup::ALL {
        out.push('\n');
        out.push_str(&format!("{:<17}", donor.label()));
        for recipient in BloodGroup::ALL {
            let mark = if donor.can_supply(recipient) { "x" } else { "." };
            out.push_str(&format!(" {mark:>4}"));
        }
    }
    out
}
