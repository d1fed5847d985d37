use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use steady_core::store::Store;

use super::helpers::parse_date;

pub(crate) fn cmd_summary(store: &Store, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let summary = store.daily_summary(date);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.meals.is_empty() && summary.water.is_empty() {
        let date = &summary.date;
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    let date = &summary.date;
    println!("=== {date} ===\n");

    if !summary.meals.is_empty() {
        let sub_cal = summary.total_calories;
        println!("  MEALS ({sub_cal} kcal)");
        for m in &summary.meals {
            let time = m.timestamp.format("%H:%M");
            let name = &m.name;
            let cal = m.calories;
            let protein = m.protein;
            println!("    {time} {name} — {cal} kcal | P:{protein}g");
        }
        println!();
    }

    if !summary.water.is_empty() {
        let sub_ml = summary.total_water_ml;
        println!("  WATER ({sub_ml}ml)");
        for w in &summary.water {
            let time = w.timestamp.format("%H:%M");
            let ml = w.ml;
            println!("    {time} {ml}ml");
        }
        println!();
    }

    let total_cal = summary.total_calories;
    let total_p = summary.total_protein;
    let total_w = summary.total_water_ml;
    println!("  TOTAL: {total_cal} kcal | P:{total_p}g | W:{total_w}ml");

    let goals = &summary.goals;
    let goal_cal = goals.calories;
    let goal_p = goals.protein;
    let goal_w = goals.water_ml;
    println!("  GOAL: {goal_cal} kcal | P:{goal_p}g | W:{goal_w}ml");

    let rem_cal = i64::from(goal_cal) - i64::from(total_cal);
    let rem_p = i64::from(goal_p) - i64::from(total_p);
    let rem_w = i64::from(goal_w) - i64::from(total_w);
    println!("  REMAINING: {rem_cal} kcal | P:{rem_p}g | W:{rem_w}ml");

    Ok(())
}

pub(crate) fn cmd_history(store: &Store, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Water")]
        water: String,
    }

    let today = Local::now().date_naive();
    let mut summaries = Vec::new();

    for i in 0..days {
        let date = today - chrono::Duration::days(i64::from(i));
        summaries.push(store.daily_summary(date));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.iter().all(|s| s.meals.is_empty() && s.water.is_empty()) {
        eprintln!("No entries in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = summaries
        .iter()
        .map(|s| HistoryRow {
            date: s.date.clone(),
            calories: s.total_calories.to_string(),
            protein: format!("{}g", s.total_protein),
            water: format!("{}ml", s.total_water_ml),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
