use std::collections::BTreeMap;

use axum::{extract::State, Json};

use crate::directory::WeightUpdate;
use crate::error::ApiError;
use crate::SharedState;

pub async fn get_weights(State(state): State<SharedState>) -> Json<BTreeMap<String, f64>> {
    Json(state.directory.weight_entries())
}

/// Apply a weight update and echo the resulting entries back.
pub async fn update_weights(
    State(state): State<SharedState>,
    Json(update): Json<WeightUpdate>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    state.directory.apply_weight_update(&update)?;
    Ok(Json(state.directory.weight_entries()))
}
