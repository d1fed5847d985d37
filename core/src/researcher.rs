use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PipelineError;
use crate::models::{EstimateSource, NutritionEstimate};
use crate::openfoodfacts::{self, ProductData};

/// Remote food database reached over HTTP.
///
/// The CLI implements this with reqwest against OpenFoodFacts; mobile builds
/// bring their own HTTP stack. Implementations return an empty list when the
/// service answered but had nothing usable, and reserve errors for transport
/// failures.
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductData>, PipelineError>;
}

/// Rough single-serving numbers for meals people actually type.
///
/// Order matters: fuzzy matching takes the first hit.
const PRESETS: &[(&str, u32, u32)] = &[
    ("chicken bowl", 520, 36),
    ("burrito", 650, 28),
    ("caesar salad", 470, 18),
    ("pizza", 570, 24),
    ("burger", 610, 30),
    ("pasta", 580, 21),
    ("ramen", 540, 20),
    ("fried rice", 520, 16),
    ("sushi roll", 350, 14),
    ("sandwich", 420, 22),
    ("oatmeal", 310, 11),
    ("pancakes", 480, 12),
    ("scrambled eggs", 280, 19),
    ("protein shake", 220, 30),
    ("yogurt parfait", 300, 15),
];

/// Resolves a meal name to a nutrition estimate.
///
/// Resolution order: exact preset, fuzzy preset, remote text search. Preset
/// hits never touch the network.
pub struct NutritionResearcher {
    database: Arc<dyn FoodDatabase>,
}

impl NutritionResearcher {
    #[must_use]
    pub fn new(database: Arc<dyn FoodDatabase>) -> Self {
        Self { database }
    }

    /// Look up an estimate for a meal name. `Ok(None)` means the lookup ran
    /// but found nothing convincing.
    pub async fn lookup(&self, name: &str) -> Result<Option<NutritionEstimate>, PipelineError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(None);
        }

        if let Some(hit) = exact_preset(&normalized) {
            debug!(meal = %normalized, "exact preset hit");
            return Ok(Some(hit));
        }
        if let Some(hit) = fuzzy_preset(&normalized) {
            debug!(meal = %normalized, "fuzzy preset hit");
            return Ok(Some(hit));
        }

        let products = self
            .database
            .search(&normalized, openfoodfacts::SEARCH_LIMIT)
            .await?;
        debug!(meal = %normalized, candidates = products.len(), "remote search");
        Ok(products.iter().find_map(openfoodfacts::product_to_estimate))
    }
}

fn preset_estimate(calories: u32, protein: u32) -> NutritionEstimate {
    NutritionEstimate {
        calories,
        protein,
        source: EstimateSource::Preset,
    }
}

fn exact_preset(normalized: &str) -> Option<NutritionEstimate> {
    PRESETS
        .iter()
        .find(|(key, _, _)| *key == normalized)
        .map(|&(_, calories, protein)| preset_estimate(calories, protein))
}

/// Substring match in either direction, first table entry wins.
fn fuzzy_preset(normalized: &str) -> Option<NutritionEstimate> {
    PRESETS
        .iter()
        .find(|(key, _, _)| normalized.contains(key) || key.contains(normalized))
        .map(|&(_, calories, protein)| preset_estimate(calories, protein))
}
