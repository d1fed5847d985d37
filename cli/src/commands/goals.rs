use anyhow::{Result, bail};

use steady_core::models::Goals;
use steady_core::store::Store;

pub(crate) fn cmd_goals_show(store: &Store, json: bool) -> Result<()> {
    print_goals(&store.goals(), json)
}

pub(crate) fn cmd_goals_set(
    store: &mut Store,
    calories: Option<u32>,
    protein: Option<u32>,
    water: Option<u32>,
    json: bool,
) -> Result<()> {
    if calories.is_none() && protein.is_none() && water.is_none() {
        bail!("Nothing to set. Provide at least one of --calories, --protein, or --water");
    }

    let mut goals = store.goals();
    if let Some(c) = calories {
        goals.calories = c;
    }
    if let Some(p) = protein {
        goals.protein = p;
    }
    if let Some(w) = water {
        goals.water_ml = w;
    }
    store.set_goals(goals)?;

    print_goals(&goals, json)
}

fn print_goals(goals: &Goals, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(goals)?);
    } else {
        let cal = goals.calories;
        let p = goals.protein;
        let w = goals.water_ml;
        println!("Daily goals: {cal} kcal | P:{p}g | W:{w}ml");
    }
    Ok(())
}
