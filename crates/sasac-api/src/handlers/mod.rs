pub mod allocation;
pub mod config;
pub mod evaluations;
pub mod health;
pub mod listings;

use serde::Serialize;

/// Minimal acknowledgement body shared by the mutation endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
