use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::directory::{DonorDirectory, DonorNotifier};
use super::service::{
    next_request_id, DispatchError, DispatchReport, DispatchService, ExcludedDonor, MatchPayload,
};
use crate::error::AppError;
use crate::matching::{is_compatible_label, BloodRequest, Donor, ScoredDonor};
use crate::records::BloodRequestRecord;

/// Router builder exposing the matching engine and request dispatch over HTTP.
pub fn matching_router<D, N>(service: Arc<DispatchService<D, N>>) -> Router
where
    D: DonorDirectory + 'static,
    N: DonorNotifier + 'static,
{
    Router::new()
        .route("/api/v1/matching/compatibility", post(compatibility_handler))
        .route("/api/v1/matching/eligible", post(eligible_handler::<D, N>))
        .route("/api/v1/matching/rank", post(rank_handler::<D, N>))
        .route("/api/v1/requests/dispatch", post(dispatch_handler::<D, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompatibilityQuery {
    pub(crate) donor_blood_group: String,
    pub(crate) requested_blood_group: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibleResponse {
    pub(crate) request: BloodRequest,
    pub(crate) count: usize,
    pub(crate) eligible: Vec<Donor>,
    pub(crate) excluded: Vec<ExcludedDonor>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) request: BloodRequest,
    pub(crate) ranked: Vec<ScoredDonor>,
}

pub(crate) async fn compatibility_handler(
    Json(query): Json<CompatibilityQuery>,
) -> Json<serde_json::Value> {
    let compatible = is_compatible_label(&query.donor_blood_group, &query.requested_blood_group);
    Json(json!({
        "donor_blood_group": query.donor_blood_group,
        "requested_blood_group": query.requested_blood_group,
        "compatible": compatible,
    }))
}

pub(crate) async fn eligible_handler<D, N>(
    State(service): State<Arc<DispatchService<D, N>>>,
    Json(payload): Json<MatchPayload>,
) -> Result<Json<EligibleResponse>, AppError>
where
    D: DonorDirectory + 'static,
    N: DonorNotifier + 'static,
{
    let (request, eligible, excluded) = service.eligible_payload(payload)?;
    Ok(Json(EligibleResponse {
        request,
        count: eligible.len(),
        eligible,
        excluded,
    }))
}

pub(crate) async fn rank_handler<D, N>(
    State(service): State<Arc<DispatchService<D, N>>>,
    Json(payload): Json<MatchPayload>,
) -> Result<Json<RankResponse>, AppError>
where
    D: DonorDirectory + 'static,
    N: DonorNotifier + 'static,
{
    let (request, ranked) = service.rank_payload(payload)?;
    Ok(Json(RankResponse { request, ranked }))
}

pub(crate) async fn dispatch_handler<D, N>(
    State(service): State<Arc<DispatchService<D, N>>>,
    Json(record): Json<Option<BloodRequestRecord>>,
) -> Result<Json<DispatchReport>, AppError>
where
    D: DonorDirectory + 'static,
    N: DonorNotifier + 'static,
{
    let request = record
        .ok_or(DispatchError::MissingRequest)?
        .into_request(&next_request_id());
    let report = service.dispatch(&request)?;
    Ok(Json(report))
}
