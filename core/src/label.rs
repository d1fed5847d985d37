//! Nutrition-label text parsing.
//!
//! Works over raw OCR output: lower-cases the text, then pulls calorie and
//! protein figures with tolerant patterns. Both figures must be present for
//! the parse to count as a label at all.

use regex::Regex;

use crate::models::{EstimateSource, NutritionEstimate};

/// Parse OCR text from a nutrition label into an estimate.
///
/// All-or-nothing: returns `None` unless both a calorie and a protein figure
/// are recognized. A calorie reading of zero counts as "nothing detected"
/// rather than a real value.
#[must_use]
pub fn extract(text: &str) -> Option<NutritionEstimate> {
    let text = text.to_lowercase();
    let calories = extract_calories(&text)?;
    let protein = extract_protein(&text)?;
    Some(NutritionEstimate {
        calories,
        protein,
        source: EstimateSource::Label,
    })
}

/// Calorie figure: "calorie(s)" then an optional colon or dash then 1-4
/// digits, or 1-4 digits then "kcal"/"calories". First match wins.
fn extract_calories(text: &str) -> Option<u32> {
    let re = Regex::new(r"calories?\s*[:\-]?\s*(\d{1,4})|(\d{1,4})\s*(?:kcal|calories)").ok()?;
    let caps = re.captures(text)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    let value: u32 = digits.as_str().parse().ok()?;
    if value == 0 { None } else { Some(value) }
}

/// Protein figure: "protein" then an optional colon or dash then a decimal
/// with an optional trailing "g", or a decimal then "g" then "protein".
/// Rounded to the nearest gram.
#[allow(clippy::cast_sign_loss)]
fn extract_protein(text: &str) -> Option<u32> {
    let re =
        Regex::new(r"protein\s*[:\-]?\s*(\d{1,3}(?:\.\d+)?)\s*g?|(\d{1,3}(?:\.\d+)?)\s*g\s*protein")
            .ok()?;
    let caps = re.captures(text)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    let value: f64 = digits.as_str().parse().ok()?;
    Some(value.round() as u32)
}
