use serde::{Deserialize, Serialize};

/// The three fixed questionnaire sections. Credentials feeds the pooled
/// preparation index; Interview and Affinity feed the per-pair affinity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Credentials,
    Interview,
    Affinity,
}

#[derive(Debug, Clone, Copy)]
pub struct Item {
    /// Stable identifier, also the weight-configuration key for the item.
    pub id: &'static str,
    pub section: Section,
    pub text: &'static str,
}

pub const ITEM_COUNT: usize = 6;

/// Immutable questionnaire structure, ordered by section.
pub const ITEMS: [Item; ITEM_COUNT] = [
    Item {
        id: "c1",
        section: Section::Credentials,
        text: "Academic record and prior training are adequate.",
    },
    Item {
        id: "c2",
        section: Section::Credentials,
        text: "The candidate has relevant prior research experience.",
    },
    Item {
        id: "i1",
        section: Section::Interview,
        text: "The candidate communicated clearly and objectively.",
    },
    Item {
        id: "i2",
        section: Section::Interview,
        text: "The candidate's motivation is evident and well grounded.",
    },
    Item {
        id: "a1",
        section: Section::Affinity,
        text: "Research interests align with the advisor's.",
    },
    Item {
        id: "a2",
        section: Section::Affinity,
        text: "The candidate shows strong potential for development.",
    },
];

/// Position of an item id within [`ITEMS`], or `None` for unknown ids.
pub fn item_index(id: &str) -> Option<usize> {
    ITEMS.iter().position(|item| item.id == id)
}

pub fn section_items(section: Section) -> impl Iterator<Item = (usize, &'static Item)> {
    ITEMS
        .iter()
        .enumerate()
        .filter(move |(_, item)| item.section == section)
}
