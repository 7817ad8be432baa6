use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationResult, CandidateRef, ScoreBreakdown};
use crate::{Advisor, AdvisorId, Candidate, CandidateId};

/// One line of a candidate's score history: how one advisor's pair score was
/// derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScoreLine {
    pub advisor_id: AdvisorId,
    pub advisor_name: String,
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Regroup the full score set by candidate, each list sorted by score
/// descending. Pure transformation, re-derivable from a stored result at any
/// time.
pub fn scores_by_candidate(
    result: &AllocationResult,
    advisors: &[Advisor],
) -> BTreeMap<CandidateId, Vec<CandidateScoreLine>> {
    let advisor_names: HashMap<AdvisorId, &str> = advisors
        .iter()
        .map(|advisor| (advisor.id, advisor.name.as_str()))
        .collect();

    let mut grouped: BTreeMap<CandidateId, Vec<CandidateScoreLine>> = BTreeMap::new();
    for pair in &result.scores {
        let Some(advisor_name) = advisor_names.get(&pair.advisor_id) else {
            continue;
        };
        grouped
            .entry(pair.candidate_id)
            .or_default()
            .push(CandidateScoreLine {
                advisor_id: pair.advisor_id,
                advisor_name: (*advisor_name).to_string(),
                final_score: pair.final_score,
                breakdown: pair.breakdown.clone(),
            });
    }

    for lines in grouped.values_mut() {
        lines.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
    }

    grouped
}

/// Candidate ids that took part in the run, allocated or not.
pub fn evaluated_candidates(result: &AllocationResult) -> BTreeSet<CandidateId> {
    let mut evaluated: BTreeSet<CandidateId> = result
        .allocations
        .values()
        .flatten()
        .map(|allocated| allocated.candidate_id)
        .collect();
    evaluated.extend(result.unallocated.iter().map(|candidate| candidate.id));
    evaluated
}

/// Candidates with no evaluation at all. A separate report bucket, excluded
/// from both the allocated and unallocated sets.
pub fn not_evaluated(candidates: &[Candidate], result: &AllocationResult) -> Vec<CandidateRef> {
    let evaluated = evaluated_candidates(result);
    candidates
        .iter()
        .filter(|candidate| !evaluated.contains(&candidate.id))
        .map(|candidate| CandidateRef {
            id: candidate.id,
            name: candidate.name.clone(),
        })
        .collect()
}
