use crate::validation::{self, ConfigValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingMethod {
    Pot,
    Ground,
}

impl PlantingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantingMethod::Pot => "pot",
            PlantingMethod::Ground => "ground",
        }
    }
}

impl fmt::Display for PlantingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlantingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pot" | "maceta" => Ok(PlantingMethod::Pot),
            "ground" | "suelo" => Ok(PlantingMethod::Ground),
            other => Err(format!("unknown planting method '{other}'")),
        }
    }
}

/// Recommended soil pH band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantVariety {
    pub id: String,
    pub name: String,
    /// Seed bank or nursery the plant came from.
    pub bank: String,
    /// Variety key shared by plants of the same cultivar; wash windows target it.
    pub group: String,
    pub method: PlantingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<PhRange>,
    #[serde(default)]
    pub notes: String,
}

/// Root-washing interval of a variety group: fertilizer stops on
/// `washing_date` and the plants only get water until `harvest_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WashWindow {
    pub group: String,
    pub washing_date: NaiveDate,
    pub harvest_start: NaiveDate,
    /// Exclusive.
    pub harvest_end: NaiveDate,
}

impl WashWindow {
    /// `[washing_date, harvest_start)`
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.washing_date && date < self.harvest_start
    }

    /// `[harvest_start, harvest_end)`
    pub fn in_harvest(&self, date: NaiveDate) -> bool {
        date >= self.harvest_start && date < self.harvest_end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarietyTable {
    plants: Vec<PlantVariety>,
    wash_windows: Vec<WashWindow>,
}

impl VarietyTable {
    pub fn new(
        plants: Vec<PlantVariety>,
        wash_windows: Vec<WashWindow>,
    ) -> Result<Self, ConfigValidationError> {
        validation::validate_varieties(&plants)?;
        validation::validate_wash_windows(&wash_windows, &plants)?;
        Ok(Self {
            plants,
            wash_windows,
        })
    }

    pub fn plants(&self) -> &[PlantVariety] {
        &self.plants
    }

    pub fn wash_windows(&self) -> &[WashWindow] {
        &self.wash_windows
    }

    pub fn find(&self, plant_id: &str) -> Option<&PlantVariety> {
        self.plants.iter().find(|p| p.id == plant_id)
    }

    pub fn plant_ids(&self) -> Vec<String> {
        self.plants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn group_plant_ids(&self, group: &str) -> Vec<String> {
        self.plants
            .iter()
            .filter(|p| p.group == group)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Wash windows whose washing interval contains `date`, in table order.
    pub fn washing_on(&self, date: NaiveDate) -> impl Iterator<Item = &WashWindow> {
        self.wash_windows.iter().filter(move |w| w.covers(date))
    }

    /// Wash windows whose harvest interval contains `date`, in table order.
    pub fn harvesting_on(&self, date: NaiveDate) -> impl Iterator<Item = &WashWindow> {
        self.wash_windows.iter().filter(move |w| w.in_harvest(date))
    }
}

impl<'de> Deserialize<'de> for VarietyTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            plants: Vec<PlantVariety>,
            #[serde(default)]
            wash_windows: Vec<WashWindow>,
        }

        let raw = Raw::deserialize(deserializer)?;
        VarietyTable::new(raw.plants, raw.wash_windows).map_err(serde::de::Error::custom)
    }
}
