use serde::Deserialize;

use crate::models::{EstimateSource, NutritionEstimate};

/// Scale from the database's per-100g figures to one app serving (~220 g).
pub const SERVING_FACTOR: f64 = 2.2;

/// How many candidates a text search may return.
pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<ProductData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub product_name: Option<String>,
    pub nutriments: Option<Nutriments>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    pub energy_kcal_100g: Option<f64>,
    pub proteins_100g: Option<f64>,
}

/// Convert a search candidate into a single-serving estimate.
///
/// A usable candidate carries a positive per-100g energy and a non-negative
/// per-100g protein; anything else returns `None`. Calories never drop below
/// 1 for a usable candidate.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn product_to_estimate(p: &ProductData) -> Option<NutritionEstimate> {
    let nutriments = p.nutriments.as_ref()?;
    let energy = nutriments.energy_kcal_100g.filter(|e| *e > 0.0)?;
    let protein = nutriments.proteins_100g.filter(|p| *p >= 0.0)?;

    let calories = ((energy * SERVING_FACTOR).round() as u32).max(1);
    let protein = (protein * SERVING_FACTOR).round() as u32;
    Some(NutritionEstimate {
        calories,
        protein,
        source: EstimateSource::Database,
    })
}
