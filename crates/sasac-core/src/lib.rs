pub mod allocation;
pub mod config;
pub mod questionnaire;
pub mod report;
pub mod scoring;
pub mod store;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use questionnaire::{Section, ITEMS, ITEM_COUNT};

pub type AdvisorId = i64;
pub type CandidateId = i64;

/// Discrete rating scale used on every questionnaire item.
pub const RATING_MIN: i8 = -2;
pub const RATING_MAX: i8 = 2;

// Read models consumed at allocation time. Storage of these records is an
// external concern; the engine only ever sees run-time snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisor {
    pub id: AdvisorId,
    pub name: String,
    /// Number of supervision slots. An advisor with capacity 0 may still
    /// evaluate but never receives allocations.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub evaluates_credentials: bool,
    #[serde(default)]
    pub evaluates_interview: bool,
    #[serde(default)]
    pub evaluates_affinity: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// Advisors this candidate declared as preferred, if any.
    #[serde(default)]
    pub preferred_advisors: BTreeSet<AdvisorId>,
}

/// One advisor's questionnaire answers for one candidate. Ratings are indexed
/// by position in [`questionnaire::ITEMS`]; unanswered items stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub advisor_id: AdvisorId,
    pub candidate_id: CandidateId,
    pub ratings: [Option<i8>; ITEM_COUNT],
}

impl Evaluation {
    pub fn new(advisor_id: AdvisorId, candidate_id: CandidateId) -> Self {
        Self {
            advisor_id,
            candidate_id,
            ratings: [None; ITEM_COUNT],
        }
    }

    /// Drop ratings for every section the advisor holds no capability for.
    /// Submissions only ever carry answers for sections the advisor is
    /// entitled to grade.
    pub fn restrict_to_capabilities(&mut self, advisor: &Advisor) {
        for (idx, item) in ITEMS.iter().enumerate() {
            let held = match item.section {
                Section::Credentials => advisor.evaluates_credentials,
                Section::Interview => advisor.evaluates_interview,
                Section::Affinity => advisor.evaluates_affinity,
            };
            if !held {
                self.ratings[idx] = None;
            }
        }
    }

    /// Overwrite the stored answers for the advisor's held sections with the
    /// resubmitted ones, leaving other sections untouched.
    pub fn apply_resubmission(&mut self, advisor: &Advisor, submitted: &Evaluation) {
        for (idx, item) in ITEMS.iter().enumerate() {
            let held = match item.section {
                Section::Credentials => advisor.evaluates_credentials,
                Section::Interview => advisor.evaluates_interview,
                Section::Affinity => advisor.evaluates_affinity,
            };
            if held {
                self.ratings[idx] = submitted.ratings[idx];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview_only_advisor() -> Advisor {
        Advisor {
            id: 1,
            name: "Dr. Reed".into(),
            capacity: 1,
            evaluates_credentials: false,
            evaluates_interview: true,
            evaluates_affinity: false,
        }
    }

    #[test]
    fn restricts_ratings_to_held_sections() {
        let mut evaluation = Evaluation::new(1, 10);
        evaluation.ratings = [Some(2), Some(2), Some(1), Some(1), Some(0), Some(0)];

        evaluation.restrict_to_capabilities(&interview_only_advisor());

        assert_eq!(
            evaluation.ratings,
            [None, None, Some(1), Some(1), None, None]
        );
    }

    #[test]
    fn resubmission_only_touches_held_sections() {
        let advisor = interview_only_advisor();
        let mut stored = Evaluation::new(1, 10);
        stored.ratings = [Some(2), None, Some(-1), Some(-1), None, None];

        let mut submitted = Evaluation::new(1, 10);
        submitted.ratings[2] = Some(2);
        submitted.ratings[3] = Some(1);

        stored.apply_resubmission(&advisor, &submitted);

        assert_eq!(
            stored.ratings,
            [Some(2), None, Some(2), Some(1), None, None]
        );
    }
}
