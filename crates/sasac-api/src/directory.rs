use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use thiserror::Error;

use sasac_core::allocation::AllocationSnapshot;
use sasac_core::config::WeightConfig;
use sasac_core::questionnaire::item_index;
use sasac_core::{Advisor, AdvisorId, Candidate, CandidateId, Evaluation, RATING_MAX, RATING_MIN};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("advisor not found: {0}")]
    AdvisorNotFound(AdvisorId),
    #[error("candidate not found: {0}")]
    CandidateNotFound(CandidateId),
    #[error("advisor {0} holds no evaluation capability")]
    NoCapabilities(AdvisorId),
    #[error("unknown questionnaire item: {0}")]
    UnknownItem(String),
    #[error("rating {value} for item {item} is outside the {RATING_MIN}..={RATING_MAX} scale")]
    RatingOutOfScale { item: String, value: i8 },
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Boot-time snapshot of the advisor/candidate directories and weight
/// entries, normally provided by the surrounding admin tooling.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub advisors: Vec<Advisor>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

/// Weight changes accepted from the admin surface. Setting
/// `preparation_weight` keeps the affinity weight complementary.
#[derive(Debug, Default, Deserialize)]
pub struct WeightUpdate {
    pub preparation_weight: Option<f64>,
    pub preference_bonus: Option<f64>,
    #[serde(default)]
    pub item_weights: BTreeMap<String, f64>,
}

#[derive(Debug, Default)]
struct DirectoryData {
    advisors: Vec<Advisor>,
    candidates: Vec<Candidate>,
    evaluations: Vec<Evaluation>,
    config: WeightConfig,
}

/// In-memory stand-in for the external persistence collaborator. Evaluations
/// are unique per (advisor, candidate) and keep first-submission order, which
/// is the tie-break order the engine's stable sort relies on.
#[derive(Debug, Default)]
pub struct Directory {
    inner: RwLock<DirectoryData>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: SeedFile) -> Self {
        Self {
            inner: RwLock::new(DirectoryData {
                advisors: seed.advisors,
                candidates: seed.candidates,
                evaluations: Vec::new(),
                config: WeightConfig::from_entries(&seed.weights),
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = fs::read_to_string(path)?;
        let seed: SeedFile = serde_json::from_str(&raw)?;
        Ok(Self::seeded(seed))
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        let data = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        AllocationSnapshot {
            advisors: data.advisors.clone(),
            candidates: data.candidates.clone(),
            evaluations: data.evaluations.clone(),
            config: data.config.clone(),
        }
    }

    pub fn advisors(&self) -> Vec<Advisor> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .advisors
            .clone()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .candidates
            .clone()
    }

    pub fn weight_entries(&self) -> BTreeMap<String, f64> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .config
            .to_entries()
    }

    pub fn apply_weight_update(&self, update: &WeightUpdate) -> Result<(), DirectoryError> {
        for item_id in update.item_weights.keys() {
            if item_index(item_id).is_none() {
                return Err(DirectoryError::UnknownItem(item_id.clone()));
            }
        }

        let mut data = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(weight) = update.preparation_weight {
            data.config.set_preparation_weight(weight);
        }
        if let Some(bonus) = update.preference_bonus {
            data.config.preference_bonus = bonus;
        }
        for (item_id, weight) in &update.item_weights {
            data.config.set_item_weight(item_id, *weight);
        }
        Ok(())
    }

    /// Record one advisor's answers for one candidate. A resubmission updates
    /// the existing record in place; a second row is never created.
    pub fn upsert_evaluation(
        &self,
        advisor_id: AdvisorId,
        candidate_id: CandidateId,
        ratings: &BTreeMap<String, i8>,
    ) -> Result<(), DirectoryError> {
        let mut data = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let advisor = data
            .advisors
            .iter()
            .find(|advisor| advisor.id == advisor_id)
            .cloned()
            .ok_or(DirectoryError::AdvisorNotFound(advisor_id))?;
        if !(advisor.evaluates_credentials
            || advisor.evaluates_interview
            || advisor.evaluates_affinity)
        {
            return Err(DirectoryError::NoCapabilities(advisor_id));
        }
        if !data
            .candidates
            .iter()
            .any(|candidate| candidate.id == candidate_id)
        {
            return Err(DirectoryError::CandidateNotFound(candidate_id));
        }

        let mut submitted = Evaluation::new(advisor_id, candidate_id);
        for (item_id, value) in ratings {
            let idx = item_index(item_id)
                .ok_or_else(|| DirectoryError::UnknownItem(item_id.clone()))?;
            if !(RATING_MIN..=RATING_MAX).contains(value) {
                return Err(DirectoryError::RatingOutOfScale {
                    item: item_id.clone(),
                    value: *value,
                });
            }
            submitted.ratings[idx] = Some(*value);
        }
        submitted.restrict_to_capabilities(&advisor);

        match data
            .evaluations
            .iter_mut()
            .find(|e| e.advisor_id == advisor_id && e.candidate_id == candidate_id)
        {
            Some(existing) => existing.apply_resubmission(&advisor, &submitted),
            None => data.evaluations.push(submitted),
        }
        Ok(())
    }

    pub fn clear_evaluations(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .evaluations
            .clear();
    }
}
