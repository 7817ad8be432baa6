use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use sasac_core::allocation::{AllocationResult, CandidateRef};
use sasac_core::report::{self, CandidateScoreLine};
use sasac_core::store::RunStatus;
use sasac_core::CandidateId;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: RunStatus,
}

/// Trigger a full allocation run over the current directory snapshot.
pub async fn run_allocation(State(state): State<SharedState>) -> Json<RunResponse> {
    let status = state.allocation.run_with(|| state.directory.snapshot());
    Json(RunResponse { status })
}

/// The latest stored result, or 404 when no run has completed.
pub async fn latest_result(
    State(state): State<SharedState>,
) -> Result<Json<AllocationResult>, ApiError> {
    state
        .allocation
        .latest()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no allocation result available".into()))
}

#[derive(Debug, Serialize)]
pub struct CandidateBreakdown {
    pub candidate_id: CandidateId,
    pub name: String,
    pub scores: Vec<CandidateScoreLine>,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub processed_at: DateTime<Utc>,
    /// Every scored candidate with their per-advisor score lines, sorted by
    /// score descending.
    pub candidates: Vec<CandidateBreakdown>,
    pub unallocated: Vec<CandidateRef>,
    pub not_evaluated: Vec<CandidateRef>,
}

/// Per-candidate explanation of how each pair score was derived.
pub async fn score_breakdown(
    State(state): State<SharedState>,
) -> Result<Json<BreakdownResponse>, ApiError> {
    let result = state
        .allocation
        .latest()
        .ok_or_else(|| ApiError::NotFound("no allocation result available".into()))?;

    let advisors = state.directory.advisors();
    let candidates = state.directory.candidates();
    let names: HashMap<CandidateId, &str> = candidates
        .iter()
        .map(|candidate| (candidate.id, candidate.name.as_str()))
        .collect();

    let grouped = report::scores_by_candidate(&result, &advisors);
    let not_evaluated = report::not_evaluated(&candidates, &result);

    let candidate_breakdowns = grouped
        .into_iter()
        .map(|(candidate_id, scores)| CandidateBreakdown {
            candidate_id,
            name: names
                .get(&candidate_id)
                .map(|name| (*name).to_string())
                .unwrap_or_default(),
            scores,
        })
        .collect();

    Ok(Json(BreakdownResponse {
        processed_at: result.processed_at,
        candidates: candidate_breakdowns,
        unallocated: result.unallocated,
        not_evaluated,
    }))
}
