use axum::{extract::State, Json};

use sasac_core::{Advisor, Candidate};

use crate::SharedState;

pub async fn list_advisors(State(state): State<SharedState>) -> Json<Vec<Advisor>> {
    Json(state.directory.advisors())
}

pub async fn list_candidates(State(state): State<SharedState>) -> Json<Vec<Candidate>> {
    Json(state.directory.candidates())
}
