use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocation::{run, AllocationResult, AllocationSnapshot, RunOutcome};

/// Caller-facing status of a run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Processed,
    /// Informational: no evaluations were submitted, nothing was computed and
    /// the previous result (if any) is still in place.
    NoEvaluations,
}

/// Single-slot holder of the latest [`AllocationResult`].
///
/// Runs serialize on `gate`, so readers observe either the full previous
/// result or the full new one, never a mix. Clearing evaluations goes through
/// the same gate so an in-flight run can never resurrect a result that
/// references deleted evaluations.
#[derive(Debug, Default)]
pub struct AllocationService {
    gate: Mutex<()>,
    latest: RwLock<Option<AllocationResult>>,
}

impl AllocationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one allocation run. The snapshot closure runs inside the gate
    /// so its view of the input is consistent with the stored result.
    pub fn run_with<F>(&self, snapshot_fn: F) -> RunStatus
    where
        F: FnOnce() -> AllocationSnapshot,
    {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = snapshot_fn();

        match run(&snapshot) {
            RunOutcome::NoEvaluations => {
                info!("allocation requested with no evaluations; previous result kept");
                RunStatus::NoEvaluations
            }
            RunOutcome::Completed(result) => {
                *self
                    .latest
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(result);
                RunStatus::Processed
            }
        }
    }

    /// The latest stored result, or `None` when no run has completed since
    /// startup or the last invalidation.
    pub fn latest(&self) -> Option<AllocationResult> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run the supplied clearing action and discard the stored result, both
    /// under the run gate.
    pub fn invalidate_with<F>(&self, clear_fn: F)
    where
        F: FnOnce(),
    {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        clear_fn();
        *self
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        info!("evaluations cleared; stored allocation result invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightConfig;
    use crate::{Advisor, Candidate, Evaluation};
    use std::collections::BTreeSet;

    fn snapshot_with_one_evaluation() -> AllocationSnapshot {
        AllocationSnapshot {
            advisors: vec![Advisor {
                id: 1,
                name: "Dr. Okafor".into(),
                capacity: 1,
                evaluates_credentials: true,
                evaluates_interview: true,
                evaluates_affinity: false,
            }],
            candidates: vec![Candidate {
                id: 10,
                name: "Ana".into(),
                preferred_advisors: BTreeSet::new(),
            }],
            evaluations: vec![Evaluation {
                advisor_id: 1,
                candidate_id: 10,
                ratings: [Some(2), Some(2), Some(1), Some(1), None, None],
            }],
            config: WeightConfig::default(),
        }
    }

    #[test]
    fn starts_with_no_result() {
        let service = AllocationService::new();
        assert!(service.latest().is_none());
    }

    #[test]
    fn successful_run_replaces_the_stored_result() {
        let service = AllocationService::new();
        let status = service.run_with(snapshot_with_one_evaluation);

        assert_eq!(status, RunStatus::Processed);
        let result = service.latest().expect("result should be stored");
        assert_eq!(result.allocations[&1].len(), 1);
    }

    #[test]
    fn empty_run_keeps_the_previous_result() {
        let service = AllocationService::new();
        service.run_with(snapshot_with_one_evaluation);
        let before = service.latest();

        let status = service.run_with(AllocationSnapshot::default);

        assert_eq!(status, RunStatus::NoEvaluations);
        assert_eq!(service.latest(), before);
    }

    #[test]
    fn invalidation_discards_the_stored_result() {
        let service = AllocationService::new();
        service.run_with(snapshot_with_one_evaluation);
        assert!(service.latest().is_some());

        let mut cleared = false;
        service.invalidate_with(|| cleared = true);

        assert!(cleared);
        assert!(service.latest().is_none());
    }
}
