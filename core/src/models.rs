use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an estimate's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    /// Curated preset table bundled with the app.
    Preset,
    /// Remote food database text search.
    Database,
    /// Parsed off a photographed nutrition label.
    Label,
}

/// A single-serving nutrition estimate produced by the pipeline.
///
/// Estimates are immutable values. Whether one actually reaches the draft
/// fields is the controller's call, never the producer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NutritionEstimate {
    pub calories: u32,
    pub protein: u32,
    pub source: EstimateSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterEntry {
    pub id: Uuid,
    pub ml: u32,
    pub timestamp: DateTime<Local>,
}

/// Daily intake goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub calories: u32,
    pub protein: u32,
    pub water_ml: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000,
            protein: 120,
            water_ml: 2000,
        }
    }
}

/// One day's entries and totals, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub meals: Vec<MealEntry>,
    pub water: Vec<WaterEntry>,
    pub total_calories: u32,
    pub total_protein: u32,
    pub total_water_ml: u32,
    pub goals: Goals,
}

/// Outcome of a single photo analysis pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Raw label of the winning classifier candidate, if any.
    pub food_label: Option<String>,
    /// Numbers read off a nutrition label in the frame, if any.
    pub label_estimate: Option<NutritionEstimate>,
}

/// The meal form as the user and the pipeline both see it: raw field text
/// plus the status lines shown under the fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub calories: String,
    pub protein: String,
    /// Status of the debounced name lookup track.
    pub lookup_status: Option<String>,
    /// Status of the most recent photo analysis pass.
    pub detection_status: Option<String>,
}

impl MealDraft {
    /// Resolve the draft into the triple handed to the record store on an
    /// explicit save. Blank names fall back to "Meal", unparseable numeric
    /// fields to 0.
    #[must_use]
    pub fn finalize(&self) -> (String, u32, u32) {
        let name = self.name.trim();
        let name = if name.is_empty() { "Meal" } else { name };
        let calories = self.calories.trim().parse().unwrap_or(0);
        let protein = self.protein.trim().parse().unwrap_or(0);
        (name.to_string(), calories, protein)
    }
}
