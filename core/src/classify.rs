//! Food-candidate selection over classifier output.
//!
//! The platform classifier returns generic ranked labels; this module picks
//! the one that looks like food and shapes it for the name field.

use crate::vision::Classification;

/// A label containing any of these reads as food.
const FOOD_KEYWORDS: &[&str] = &[
    "food", "meal", "dish", "fruit", "vegetable", "bread", "rice", "salad", "pizza", "burger",
    "pasta", "noodle", "soup", "sandwich", "meat", "chicken", "beef", "fish", "egg", "dessert",
    "cake", "cookie", "taco", "sushi", "fries", "drink", "coffee", "tea",
];

/// Pick the most food-like label from ranked candidates.
///
/// Takes the first candidate whose label contains a food keyword, falling
/// back to the highest-confidence candidate. An empty list means no
/// suggestion.
#[must_use]
pub fn pick_food_label(candidates: &[Classification]) -> Option<String> {
    if let Some(hit) = candidates.iter().find(|c| {
        let label = c.label.to_lowercase();
        FOOD_KEYWORDS.iter().any(|k| label.contains(k))
    }) {
        return Some(hit.label.clone());
    }
    candidates
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .map(|c| c.label.clone())
}

/// Shape a raw classifier label for the name field: keep only the part
/// before the first comma, swap underscores for spaces, trim, and title-case
/// each word.
#[must_use]
pub fn prettify_label(raw: &str) -> String {
    let head = match raw.split_once(',') {
        Some((head, _)) => head,
        None => raw,
    };
    let spaced = head.replace('_', " ");
    spaced
        .trim()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
