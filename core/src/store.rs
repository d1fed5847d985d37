use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DailySummary, Goals, MealEntry, WaterEntry};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    goals: Goals,
    #[serde(default)]
    meals: Vec<MealEntry>,
    #[serde(default)]
    water: Vec<WaterEntry>,
}

/// Flat-file record store backing the app: one JSON document holding the
/// goals plus the append-only meal and water logs, newest entries first.
///
/// Every mutation rewrites the file immediately, so a dropped store never
/// loses a confirmed entry.
pub struct Store {
    path: Option<PathBuf>,
    data: StoreData,
}

impl Store {
    /// Open the store at `path`, starting empty if the file does not exist
    /// yet.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read store at {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("store at {} is not valid JSON", path.display()))?
        } else {
            StoreData::default()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
        })
    }

    /// In-memory store for tests; nothing touches the disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    pub fn log_meal(&mut self, name: &str, calories: u32, protein: u32) -> Result<MealEntry> {
        let entry = MealEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            calories,
            protein,
            timestamp: Local::now(),
        };
        self.data.meals.insert(0, entry.clone());
        self.save()?;
        Ok(entry)
    }

    pub fn add_water(&mut self, ml: u32) -> Result<WaterEntry> {
        let entry = WaterEntry {
            id: Uuid::new_v4(),
            ml,
            timestamp: Local::now(),
        };
        self.data.water.insert(0, entry.clone());
        self.save()?;
        Ok(entry)
    }

    #[must_use]
    pub fn goals(&self) -> Goals {
        self.data.goals
    }

    pub fn set_goals(&mut self, goals: Goals) -> Result<()> {
        self.data.goals = goals;
        self.save()
    }

    #[must_use]
    pub fn today_calories(&self) -> u32 {
        let today = Local::now().date_naive();
        self.data
            .meals
            .iter()
            .filter(|m| m.timestamp.date_naive() == today)
            .map(|m| m.calories)
            .sum()
    }

    #[must_use]
    pub fn today_protein(&self) -> u32 {
        let today = Local::now().date_naive();
        self.data
            .meals
            .iter()
            .filter(|m| m.timestamp.date_naive() == today)
            .map(|m| m.protein)
            .sum()
    }

    #[must_use]
    pub fn today_water_ml(&self) -> u32 {
        let today = Local::now().date_naive();
        self.data
            .water
            .iter()
            .filter(|w| w.timestamp.date_naive() == today)
            .map(|w| w.ml)
            .sum()
    }

    /// Entries and totals for one calendar day, newest first.
    #[must_use]
    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        let mut meals: Vec<MealEntry> = self
            .data
            .meals
            .iter()
            .filter(|m| m.timestamp.date_naive() == date)
            .cloned()
            .collect();
        meals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut water: Vec<WaterEntry> = self
            .data
            .water
            .iter()
            .filter(|w| w.timestamp.date_naive() == date)
            .cloned()
            .collect();
        water.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        DailySummary {
            date: date.format("%Y-%m-%d").to_string(),
            total_calories: meals.iter().map(|m| m.calories).sum(),
            total_protein: meals.iter().map(|m| m.protein).sum(),
            total_water_ml: water.iter().map(|w| w.ml).sum(),
            goals: self.data.goals,
            meals,
            water,
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&self.data).context("failed to serialize store")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write store at {}", path.display()))?;
        Ok(())
    }
}
