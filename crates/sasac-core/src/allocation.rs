use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WeightConfig;
use crate::scoring::{affinity_index, preparation_indices};
use crate::{Advisor, AdvisorId, Candidate, CandidateId, Evaluation};

/// Read-only input of one allocation run. Candidate preference declarations
/// travel inside each [`Candidate`] record.
#[derive(Debug, Clone, Default)]
pub struct AllocationSnapshot {
    pub advisors: Vec<Advisor>,
    pub candidates: Vec<Candidate>,
    pub evaluations: Vec<Evaluation>,
    pub config: WeightConfig,
}

/// How one pair's final score was derived. `preference_bonus` is the amount
/// actually added, 0.0 when the candidate did not list the advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub preparation_index: f64,
    pub affinity_index: f64,
    pub preparation_weight: f64,
    pub affinity_weight: f64,
    pub preference_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    pub advisor_id: AdvisorId,
    pub candidate_id: CandidateId,
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedCandidate {
    pub candidate_id: CandidateId,
    pub name: String,
    /// Final score rounded to two decimals for presentation.
    pub score: f64,
    /// Whether the preference bonus contributed to the score.
    pub preferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRef {
    pub id: CandidateId,
    pub name: String,
}

/// Outcome of one full run, replacing the previous result wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Every capacitated advisor appears here, empty list included.
    pub allocations: BTreeMap<AdvisorId, Vec<AllocatedCandidate>>,
    /// Candidates with at least one evaluation that received no slot.
    pub unallocated: Vec<CandidateRef>,
    /// Full score set, sorted by final score descending, kept regardless of
    /// allocation outcome so the report can explain every pair.
    pub scores: Vec<ScoredPair>,
    pub config: WeightConfig,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(AllocationResult),
    /// No evaluations exist; nothing was computed and any prior result must
    /// be left untouched by the caller.
    NoEvaluations,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score every eligible (advisor, candidate) pair and greedily assign
/// candidates to advisor slots by descending final score.
pub fn run(snapshot: &AllocationSnapshot) -> RunOutcome {
    if snapshot.evaluations.is_empty() {
        return RunOutcome::NoEvaluations;
    }

    let advisor_by_id: HashMap<AdvisorId, &Advisor> = snapshot
        .advisors
        .iter()
        .map(|advisor| (advisor.id, advisor))
        .collect();
    let candidate_by_id: HashMap<CandidateId, &Candidate> = snapshot
        .candidates
        .iter()
        .map(|candidate| (candidate.id, candidate))
        .collect();

    let config = &snapshot.config;
    let preparation = preparation_indices(&snapshot.advisors, &snapshot.evaluations, config);

    let mut scores = Vec::new();
    for evaluation in &snapshot.evaluations {
        let Some(advisor) = advisor_by_id.get(&evaluation.advisor_id) else {
            continue;
        };
        if advisor.capacity == 0 {
            continue;
        }
        let Some(&preparation_index) = preparation.get(&evaluation.candidate_id) else {
            // No credentials reviewer rated this candidate; the pair is
            // excluded from scoring, not an error.
            continue;
        };
        let Some(candidate) = candidate_by_id.get(&evaluation.candidate_id) else {
            continue;
        };

        let affinity = affinity_index(advisor, evaluation, config);
        let preference_bonus = if candidate.preferred_advisors.contains(&advisor.id) {
            config.preference_bonus
        } else {
            0.0
        };
        let final_score = config.preparation_weight * preparation_index
            + config.affinity_weight * affinity
            + preference_bonus;

        scores.push(ScoredPair {
            advisor_id: advisor.id,
            candidate_id: candidate.id,
            final_score,
            breakdown: ScoreBreakdown {
                preparation_index,
                affinity_index: affinity,
                preparation_weight: config.preparation_weight,
                affinity_weight: config.affinity_weight,
                preference_bonus,
            },
        });
    }

    // Stable sort: exact ties keep evaluation submission order.
    scores.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });

    let mut remaining: BTreeMap<AdvisorId, u32> = snapshot
        .advisors
        .iter()
        .filter(|advisor| advisor.capacity > 0)
        .map(|advisor| (advisor.id, advisor.capacity))
        .collect();
    let mut allocations: BTreeMap<AdvisorId, Vec<AllocatedCandidate>> =
        remaining.keys().map(|id| (*id, Vec::new())).collect();
    let mut allocated: HashSet<CandidateId> = HashSet::new();

    for pair in &scores {
        let Some(slots) = remaining.get_mut(&pair.advisor_id) else {
            continue;
        };
        if *slots == 0 || allocated.contains(&pair.candidate_id) {
            continue;
        }
        let Some(candidate) = candidate_by_id.get(&pair.candidate_id) else {
            continue;
        };

        allocations
            .entry(pair.advisor_id)
            .or_default()
            .push(AllocatedCandidate {
                candidate_id: pair.candidate_id,
                name: candidate.name.clone(),
                score: round2(pair.final_score),
                preferred: pair.breakdown.preference_bonus > 0.0,
            });
        *slots -= 1;
        allocated.insert(pair.candidate_id);
    }

    // Any evaluation record counts as "evaluated", even one submitted by an
    // uncapacitated advisor.
    let evaluated: BTreeSet<CandidateId> = snapshot
        .evaluations
        .iter()
        .map(|evaluation| evaluation.candidate_id)
        .collect();
    let unallocated: Vec<CandidateRef> = evaluated
        .iter()
        .filter(|id| !allocated.contains(id))
        .filter_map(|id| {
            candidate_by_id.get(id).map(|candidate| CandidateRef {
                id: candidate.id,
                name: candidate.name.clone(),
            })
        })
        .collect();

    info!(
        scored_pairs = scores.len(),
        allocated = allocated.len(),
        unallocated = unallocated.len(),
        "allocation run completed"
    );

    RunOutcome::Completed(AllocationResult {
        allocations,
        unallocated,
        scores,
        config: config.clone(),
        processed_at: Utc::now(),
    })
}
