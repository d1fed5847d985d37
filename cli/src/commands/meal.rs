use anyhow::Result;
use tracing::warn;

use steady_core::store::Store;

use super::helpers::source_label;
use super::research_food;
use crate::openfoodfacts::OpenFoodFactsClient;

pub(crate) async fn cmd_meal(
    store: &mut Store,
    off: OpenFoodFactsClient,
    name: &str,
    calories: Option<u32>,
    protein: Option<u32>,
    no_lookup: bool,
    json: bool,
) -> Result<()> {
    let mut calories = calories;
    let mut protein = protein;
    let mut filled_from = None;

    if !no_lookup && (calories.is_none() || protein.is_none()) {
        match research_food(off, name).await {
            Ok(Some(estimate)) => {
                // Explicitly given values win over the estimate, field by field
                if calories.is_none() {
                    calories = Some(estimate.calories);
                }
                if protein.is_none() {
                    protein = Some(estimate.protein);
                }
                filled_from = Some(source_label(estimate.source));
            }
            Ok(None) => {
                eprintln!("No strong nutrition data for '{name}', logging what was given");
            }
            Err(e) => {
                warn!(error = %e, "nutrition lookup failed");
                eprintln!("Nutrition lookup failed, logging what was given");
            }
        }
    }

    let name = name.trim();
    let name = if name.is_empty() { "Meal" } else { name };
    let entry = store.log_meal(name, calories.unwrap_or(0), protein.unwrap_or(0))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let name = &entry.name;
        let cal = entry.calories;
        let p = entry.protein;
        match filled_from {
            Some(source) => println!("Logged: {name} — {cal} kcal | P:{p}g ({source})"),
            None => println!("Logged: {name} — {cal} kcal | P:{p}g"),
        }
        let today = store.today_calories();
        let goal = store.goals().calories;
        println!("Today: {today} / {goal} kcal");
    }

    Ok(())
}

pub(crate) fn cmd_water(store: &mut Store, ml: u32, json: bool) -> Result<()> {
    let entry = store.add_water(ml)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let today = store.today_water_ml();
        let goal = store.goals().water_ml;
        println!("Logged: {ml}ml water");
        println!("Today: {today} / {goal} ml");
    }

    Ok(())
}
