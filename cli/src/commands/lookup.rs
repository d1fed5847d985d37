use anyhow::{Context, Result};
use std::process;

use steady_core::label;

use super::helpers::{json_error, source_label};
use super::research_food;
use crate::openfoodfacts::OpenFoodFactsClient;

pub(crate) async fn cmd_lookup(off: OpenFoodFactsClient, name: &str, json: bool) -> Result<()> {
    let estimate = research_food(off, name)
        .await
        .context("Nutrition lookup failed")?;

    match estimate {
        Some(est) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&est)?);
            } else {
                let cal = est.calories;
                let p = est.protein;
                let source = source_label(est.source);
                println!("{cal} kcal | P:{p}g ({source})");
            }
            Ok(())
        }
        None => {
            if json {
                println!(
                    "{}",
                    json_error(&format!("No strong nutrition data for '{name}'"))
                );
            } else {
                eprintln!("No strong nutrition data for '{name}'");
            }
            process::exit(2);
        }
    }
}

pub(crate) fn cmd_label(text: &str, json: bool) -> Result<()> {
    match label::extract(text) {
        Some(est) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&est)?);
            } else {
                let cal = est.calories;
                let p = est.protein;
                let source = source_label(est.source);
                println!("{cal} kcal | P:{p}g ({source})");
            }
            Ok(())
        }
        None => {
            if json {
                println!("{}", json_error("No nutrition facts recognized"));
            } else {
                eprintln!("No nutrition facts recognized in the given text");
            }
            process::exit(2);
        }
    }
}
