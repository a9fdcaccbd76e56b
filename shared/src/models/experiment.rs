//! Experiment Models (A/B testing)

use serde::{Deserialize, Serialize};

/// One arm of an experiment; `weight` is relative to the other arms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub weight: u32,
}

/// Experiment row from the `experiments` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub is_active: bool,
}

impl Experiment {
    pub fn total_weight(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.weight)).sum()
    }
}

/// Upsert payload for `experiment_assignments`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentAssignment {
    pub experiment_id: String,
    pub user_id: String,
    pub variant: String,
}
