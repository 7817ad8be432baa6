use std::collections::{HashMap, HashSet};

use crate::config::WeightConfig;
use crate::questionnaire::{section_items, Section};
use crate::{Advisor, AdvisorId, CandidateId, Evaluation};

/// Pooled preparation index per candidate.
///
/// Only ratings submitted by advisors holding the credentials capability
/// count. For each Credentials item with at least one rating, the arithmetic
/// mean across all qualifying advisors is weighted by the item's configured
/// weight; items nobody answered are excluded from both numerator and
/// denominator. Candidates with no qualifying ratings have no entry.
pub fn preparation_indices(
    advisors: &[Advisor],
    evaluations: &[Evaluation],
    config: &WeightConfig,
) -> HashMap<CandidateId, f64> {
    let credential_reviewers: HashSet<AdvisorId> = advisors
        .iter()
        .filter(|advisor| advisor.evaluates_credentials)
        .map(|advisor| advisor.id)
        .collect();

    let mut pooled: HashMap<CandidateId, [Vec<i8>; 6]> = HashMap::new();
    for evaluation in evaluations {
        if !credential_reviewers.contains(&evaluation.advisor_id) {
            continue;
        }
        for (idx, _) in section_items(Section::Credentials) {
            if let Some(rating) = evaluation.ratings[idx] {
                pooled.entry(evaluation.candidate_id).or_default()[idx].push(rating);
            }
        }
    }

    let mut indices = HashMap::new();
    for (candidate_id, per_item) in pooled {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (idx, _) in section_items(Section::Credentials) {
            let ratings = &per_item[idx];
            if ratings.is_empty() {
                continue;
            }
            let mean =
                ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
            weighted_sum += mean * config.item_weights[idx];
            weight_sum += config.item_weights[idx];
        }
        let index = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            0.0
        };
        indices.insert(candidate_id, index);
    }

    indices
}

/// Affinity index for one (advisor, candidate) evaluation.
///
/// Inspects only the sections the advisor holds capability for (Interview
/// and/or Affinity); unanswered items never dilute the denominator. 0.0 when
/// nothing applies.
pub fn affinity_index(advisor: &Advisor, evaluation: &Evaluation, config: &WeightConfig) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for section in [Section::Interview, Section::Affinity] {
        let held = match section {
            Section::Interview => advisor.evaluates_interview,
            Section::Affinity => advisor.evaluates_affinity,
            Section::Credentials => false,
        };
        if !held {
            continue;
        }
        for (idx, _) in section_items(section) {
            if let Some(rating) = evaluation.ratings[idx] {
                weighted_sum += f64::from(rating) * config.item_weights[idx];
                weight_sum += config.item_weights[idx];
            }
        }
    }

    if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisor(id: AdvisorId, credentials: bool, interview: bool, affinity: bool) -> Advisor {
        Advisor {
            id,
            name: format!("Advisor {id}"),
            capacity: 1,
            evaluates_credentials: credentials,
            evaluates_interview: interview,
            evaluates_affinity: affinity,
        }
    }

    fn evaluation(
        advisor_id: AdvisorId,
        candidate_id: CandidateId,
        ratings: [Option<i8>; 6],
    ) -> Evaluation {
        Evaluation {
            advisor_id,
            candidate_id,
            ratings,
        }
    }

    #[test]
    fn pools_credentials_ratings_across_reviewers() {
        let advisors = vec![advisor(1, true, false, false), advisor(2, true, false, false)];
        let evaluations = vec![
            evaluation(1, 10, [Some(2), Some(0), None, None, None, None]),
            evaluation(2, 10, [Some(0), Some(2), None, None, None, None]),
        ];

        let indices = preparation_indices(&advisors, &evaluations, &WeightConfig::default());

        // Both items average to 1.0, so the weighted mean is 1.0.
        assert_eq!(indices.get(&10), Some(&1.0));
    }

    #[test]
    fn ignores_ratings_from_non_credential_reviewers() {
        let advisors = vec![advisor(1, false, true, true)];
        let evaluations = vec![evaluation(1, 10, [Some(2), Some(2), None, None, None, None])];

        let indices = preparation_indices(&advisors, &evaluations, &WeightConfig::default());

        assert!(indices.is_empty());
    }

    #[test]
    fn unanswered_items_do_not_dilute_the_mean() {
        let advisors = vec![advisor(1, true, false, false)];
        let mut config = WeightConfig::default();
        assert!(config.set_item_weight("c2", 10.0));

        let evaluations = vec![evaluation(1, 10, [Some(2), None, None, None, None, None])];
        let indices = preparation_indices(&advisors, &evaluations, &config);

        // c2 has no ratings, so its weight of 10 never enters the denominator.
        assert_eq!(indices.get(&10), Some(&2.0));
    }

    #[test]
    fn preparation_index_is_invariant_to_evaluation_order() {
        let advisors = vec![advisor(1, true, false, false), advisor(2, true, false, false)];
        let forward = vec![
            evaluation(1, 10, [Some(2), Some(1), None, None, None, None]),
            evaluation(2, 10, [Some(-1), Some(0), None, None, None, None]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let config = WeightConfig::default();
        assert_eq!(
            preparation_indices(&advisors, &forward, &config),
            preparation_indices(&advisors, &reversed, &config)
        );
    }

    #[test]
    fn zero_item_weights_yield_zero_index_not_absence() {
        let advisors = vec![advisor(1, true, false, false)];
        let mut config = WeightConfig::default();
        assert!(config.set_item_weight("c1", 0.0));
        assert!(config.set_item_weight("c2", 0.0));

        let evaluations = vec![evaluation(1, 10, [Some(2), Some(2), None, None, None, None])];
        let indices = preparation_indices(&advisors, &evaluations, &config);

        assert_eq!(indices.get(&10), Some(&0.0));
    }

    #[test]
    fn affinity_is_zero_without_interview_or_affinity_capability() {
        let reviewer = advisor(1, true, false, false);
        let full = evaluation(1, 10, [None, None, Some(2), Some(2), Some(2), Some(2)]);

        let index = affinity_index(&reviewer, &full, &WeightConfig::default());
        assert_eq!(index, 0.0);
    }

    #[test]
    fn affinity_only_counts_held_sections() {
        let reviewer = advisor(1, false, true, false);
        let full = evaluation(1, 10, [None, None, Some(1), Some(1), Some(-2), Some(-2)]);

        let index = affinity_index(&reviewer, &full, &WeightConfig::default());
        assert_eq!(index, 1.0);
    }

    #[test]
    fn affinity_combines_both_sections_when_held() {
        let reviewer = advisor(1, false, true, true);
        let mut config = WeightConfig::default();
        assert!(config.set_item_weight("a1", 3.0));

        let full = evaluation(1, 10, [None, None, Some(2), None, Some(-1), None]);
        let index = affinity_index(&reviewer, &full, &config);

        // (2*1 + -1*3) / (1 + 3)
        assert!((index - (-0.25)).abs() < 1e-9);
    }

    #[test]
    fn affinity_is_zero_when_nothing_was_answered() {
        let reviewer = advisor(1, false, true, true);
        let empty = evaluation(1, 10, [None; 6]);

        assert_eq!(affinity_index(&reviewer, &empty, &WeightConfig::default()), 0.0);
    }
}
