use crate::season::Season;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ExportError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Serialization(err) => write!(f, "serialization error: {err}"),
            ExportError::Io(err) => write!(f, "io error: {err}"),
            ExportError::Csv(err) => write!(f, "csv error: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<SerdeJsonError> for ExportError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

pub fn save_season_to_json<P: AsRef<Path>>(season: &Season, path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, season)?;
    Ok(())
}

pub fn load_season_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Season> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Flat event row. List fields are `;`-joined.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EventCsvRecord {
    pub week: u32,
    pub week_start: String,
    pub week_end: String,
    pub id: String,
    pub kind: String,
    pub at: String,
    pub phase: String,
    pub products: String,
    pub doses: String,
    pub units: String,
    pub pot_min: f64,
    pub pot_max: f64,
    pub ground_min: f64,
    pub ground_max: f64,
    pub plants: String,
    pub notes: String,
}

pub fn season_csv_records(season: &Season) -> Vec<EventCsvRecord> {
    let mut records = Vec::new();
    for week in season.weeks() {
        for event in &week.events {
            records.push(EventCsvRecord {
                week: week.index,
                week_start: week.start.to_string(),
                week_end: week.end.to_string(),
                id: event.id.clone(),
                kind: event.kind.as_str().to_string(),
                at: event.at.format("%Y-%m-%dT%H:%M").to_string(),
                phase: event.phase.clone(),
                products: event.products.join(";"),
                doses: event
                    .doses
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
                units: event.units.join(";"),
                pot_min: event.volumes.pot.min,
                pot_max: event.volumes.pot.max,
                ground_min: event.volumes.ground.min,
                ground_max: event.volumes.ground.max,
                plants: event.plants.join(";"),
                notes: event.notes.clone(),
            });
        }
    }
    records
}

pub fn save_season_to_csv<P: AsRef<Path>>(season: &Season, path: P) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in season_csv_records(season) {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
