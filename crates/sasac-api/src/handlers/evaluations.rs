use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Deserialize;

use sasac_core::{AdvisorId, CandidateId};

use super::StatusResponse;
use crate::error::ApiError;
use crate::SharedState;

/// One advisor's questionnaire answers for one candidate, keyed by item id.
#[derive(Debug, Deserialize)]
pub struct EvaluationSubmission {
    pub advisor_id: AdvisorId,
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub ratings: BTreeMap<String, i8>,
}

pub async fn submit_evaluation(
    State(state): State<SharedState>,
    Json(submission): Json<EvaluationSubmission>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.directory.upsert_evaluation(
        submission.advisor_id,
        submission.candidate_id,
        &submission.ratings,
    )?;
    Ok(Json(StatusResponse { status: "recorded" }))
}

/// Drop every evaluation and invalidate the stored allocation result. Both
/// happen under the run gate so an in-flight run cannot leave a stale result
/// behind.
pub async fn clear_evaluations(State(state): State<SharedState>) -> Json<StatusResponse> {
    state
        .allocation
        .invalidate_with(|| state.directory.clear_evaluations());
    Json(StatusResponse { status: "cleared" })
}
