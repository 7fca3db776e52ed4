use crate::calendar::{self, format_week_range};
use crate::phase::{FallbackReason, IrrigationRule, VolumeRange};
use crate::variety::PlantingMethod;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Fertilization,
    Irrigation,
    Washing,
    Harvest,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Fertilization => "fertilization",
            EventKind::Irrigation => "irrigation",
            EventKind::Washing => "washing",
            EventKind::Harvest => "harvest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Fertilization => "Fertilización",
            EventKind::Irrigation => "Riego",
            EventKind::Washing => "Lavado",
            EventKind::Harvest => "Cosecha",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fertilization" | "fertilizacion" | "fert" => Ok(EventKind::Fertilization),
            "irrigation" | "riego" => Ok(EventKind::Irrigation),
            "washing" | "lavado" => Ok(EventKind::Washing),
            "harvest" | "cosecha" => Ok(EventKind::Harvest),
            other => Err(format!("unknown event kind '{other}'")),
        }
    }
}

/// Liters per plant, by planting method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeByMethod {
    pub pot: VolumeRange,
    pub ground: VolumeRange,
}

impl VolumeByMethod {
    pub fn for_method(&self, method: PlantingMethod) -> VolumeRange {
        match method {
            PlantingMethod::Pot => self.pot,
            PlantingMethod::Ground => self.ground,
        }
    }

    pub fn uniform(range: VolumeRange) -> Self {
        Self {
            pot: range,
            ground: range,
        }
    }
}

impl From<IrrigationRule> for VolumeByMethod {
    fn from(rule: IrrigationRule) -> Self {
        Self {
            pot: rule.pot,
            ground: rule.ground,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareEvent {
    pub id: String,
    pub kind: EventKind,
    pub at: NaiveDateTime,
    pub products: Vec<String>,
    /// Parallel to `products`.
    pub doses: Vec<f64>,
    /// Empty or parallel to `products`.
    #[serde(default)]
    pub units: Vec<String>,
    pub volumes: VolumeByMethod,
    /// Plant ids the event applies to.
    pub plants: Vec<String>,
    pub notes: String,
    /// Display name of the phase active when the event was generated.
    pub phase: String,
}

impl CareEvent {
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    pub fn applies_to(&self, plant_id: &str) -> bool {
        self.plants.iter().any(|p| p == plant_id)
    }

    /// `product (dose unit), ...`; zero doses are omitted.
    pub fn products_summary(&self) -> String {
        self.products
            .iter()
            .zip(self.doses.iter())
            .enumerate()
            .map(|(i, (product, dose))| {
                let unit = self.units.get(i).map(String::as_str).unwrap_or("");
                match (*dose > 0.0, unit.is_empty()) {
                    (false, _) => product.clone(),
                    (true, true) => format!("{product} ({dose})"),
                    (true, false) => format!("{product} ({dose} {unit})"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Plain-text summary of an event, the body a reminder message would carry.
impl fmt::Display for CareEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date();
        writeln!(
            f,
            "{} - {} {} {}",
            self.kind.label(),
            calendar::weekday_name(chrono::Datelike::weekday(&date)),
            calendar::format_date(date),
            self.at.format("%H:%M")
        )?;
        writeln!(f, "Fase: {}", self.phase)?;
        if !self.products.is_empty() {
            writeln!(f, "Productos: {}", self.products_summary())?;
        }
        write!(
            f,
            "Litros: maceta {} | suelo {}",
            self.volumes.pot, self.volumes.ground
        )?;
        if !self.notes.is_empty() {
            write!(f, "\n{}", self.notes)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub index: u32,
    pub start: NaiveDate,
    /// `start + 6 days`, inclusive.
    pub end: NaiveDate,
    pub phase_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    pub events: Vec<CareEvent>,
}

impl WeekBucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn range_label(&self) -> String {
        format_week_range(self.start, self.end)
    }

    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &CareEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}
