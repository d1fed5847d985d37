mod goals;
mod helpers;
mod lookup;
mod meal;
mod summary;

use std::sync::Arc;

use crate::openfoodfacts::OpenFoodFactsClient;
use steady_core::error::PipelineError;
use steady_core::models::NutritionEstimate;
use steady_core::researcher::NutritionResearcher;

pub(crate) use goals::{cmd_goals_set, cmd_goals_show};
pub(crate) use lookup::{cmd_label, cmd_lookup};
pub(crate) use meal::{cmd_meal, cmd_water};
pub(crate) use summary::{cmd_history, cmd_summary};

/// Resolve a food name to nutrition: bundled presets first, then `OpenFoodFacts`.
pub(super) async fn research_food(
    off: OpenFoodFactsClient,
    name: &str,
) -> Result<Option<NutritionEstimate>, PipelineError> {
    let researcher = NutritionResearcher::new(Arc::new(off));
    researcher.lookup(name).await
}
