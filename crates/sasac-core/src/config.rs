use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::questionnaire::{item_index, ITEMS, ITEM_COUNT};

pub const KEY_PREPARATION_WEIGHT: &str = "preparation_weight";
pub const KEY_AFFINITY_WEIGHT: &str = "affinity_weight";
pub const KEY_PREFERENCE_BONUS: &str = "preference_bonus";

const DEFAULT_GENERAL_WEIGHT: f64 = 0.5;
const DEFAULT_PREFERENCE_BONUS: f64 = 0.5;
const DEFAULT_ITEM_WEIGHT: f64 = 1.0;

/// Weights applied during an allocation run. The general weights are
/// presented as complementary percentages in the admin surface but both are
/// stored independently; item weights are keyed by questionnaire item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub preparation_weight: f64,
    pub affinity_weight: f64,
    /// Amount added to the final score when the candidate listed the advisor
    /// among their preferences.
    pub preference_bonus: f64,
    pub item_weights: [f64; ITEM_COUNT],
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            preparation_weight: DEFAULT_GENERAL_WEIGHT,
            affinity_weight: DEFAULT_GENERAL_WEIGHT,
            preference_bonus: DEFAULT_PREFERENCE_BONUS,
            item_weights: [DEFAULT_ITEM_WEIGHT; ITEM_COUNT],
        }
    }
}

impl WeightConfig {
    /// Build a configuration from a key/value mapping. Absent keys fall back
    /// to their documented defaults; unknown keys are ignored.
    pub fn from_entries(entries: &BTreeMap<String, f64>) -> Self {
        let mut config = Self::default();

        if let Some(value) = entries.get(KEY_PREPARATION_WEIGHT) {
            config.preparation_weight = *value;
        }
        if let Some(value) = entries.get(KEY_AFFINITY_WEIGHT) {
            config.affinity_weight = *value;
        }
        if let Some(value) = entries.get(KEY_PREFERENCE_BONUS) {
            config.preference_bonus = *value;
        }
        for (idx, item) in ITEMS.iter().enumerate() {
            if let Some(value) = entries.get(item.id) {
                config.item_weights[idx] = *value;
            }
        }

        config
    }

    pub fn to_entries(&self) -> BTreeMap<String, f64> {
        let mut entries = BTreeMap::new();
        entries.insert(KEY_PREPARATION_WEIGHT.into(), self.preparation_weight);
        entries.insert(KEY_AFFINITY_WEIGHT.into(), self.affinity_weight);
        entries.insert(KEY_PREFERENCE_BONUS.into(), self.preference_bonus);
        for (idx, item) in ITEMS.iter().enumerate() {
            entries.insert(item.id.into(), self.item_weights[idx]);
        }
        entries
    }

    /// Set the general preparation weight, keeping the affinity weight
    /// complementary (affinity = 1 − preparation).
    pub fn set_preparation_weight(&mut self, weight: f64) {
        self.preparation_weight = weight;
        self.affinity_weight = 1.0 - weight;
    }

    /// Update a single item weight by id. Returns `false` for unknown ids.
    pub fn set_item_weight(&mut self, item_id: &str, weight: f64) -> bool {
        match item_index(item_id) {
            Some(idx) => {
                self.item_weights[idx] = weight;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = WeightConfig::default();
        assert_eq!(config.preparation_weight, 0.5);
        assert_eq!(config.affinity_weight, 0.5);
        assert_eq!(config.preference_bonus, 0.5);
        assert!(config.item_weights.iter().all(|w| *w == 1.0));
    }

    #[test]
    fn absent_keys_fall_back_to_defaults() {
        let mut entries = BTreeMap::new();
        entries.insert("preparation_weight".to_string(), 0.7);
        entries.insert("c2".to_string(), 2.0);

        let config = WeightConfig::from_entries(&entries);

        assert_eq!(config.preparation_weight, 0.7);
        assert_eq!(config.affinity_weight, 0.5);
        assert_eq!(config.preference_bonus, 0.5);
        assert_eq!(config.item_weights[1], 2.0);
        assert_eq!(config.item_weights[0], 1.0);
    }

    #[test]
    fn entries_round_trip() {
        let mut config = WeightConfig::default();
        config.set_preparation_weight(0.8);
        config.preference_bonus = 0.25;
        assert!(config.set_item_weight("a1", 1.5));

        let rebuilt = WeightConfig::from_entries(&config.to_entries());
        assert_eq!(rebuilt, config);
    }

    #[test]
    fn general_weights_stay_complementary_through_setter() {
        let mut config = WeightConfig::default();
        config.set_preparation_weight(0.65);
        assert!((config.preparation_weight + config.affinity_weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_item_id_is_rejected() {
        let mut config = WeightConfig::default();
        assert!(!config.set_item_weight("z9", 3.0));
        assert!(config.item_weights.iter().all(|w| *w == 1.0));
    }
}
