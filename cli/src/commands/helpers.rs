use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use steady_core::models::EstimateSource;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")
            }),
        },
    }
}

/// Human label for where an estimate came from, used in confirmation lines.
pub(crate) fn source_label(source: EstimateSource) -> &'static str {
    match source {
        EstimateSource::Preset => "local estimate",
        EstimateSource::Database => "food database estimate",
        EstimateSource::Label => "nutrition label",
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}
