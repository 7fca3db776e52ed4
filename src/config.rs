//! Season configuration: compiled-in defaults, JSON plan files and
//! environment overrides.

use crate::catalog;
use crate::phase::PhaseTable;
use crate::rules::RuleMode;
use crate::variety::VarietyTable;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

pub const ENV_SEASON_START: &str = "CROP_SEASON_START";
pub const ENV_SEASON_END: &str = "CROP_SEASON_END";
pub const ENV_RULE_MODE: &str = "CROP_RULE_MODE";
pub const DEFAULT_TIME_ZONE: &str = "America/Santiago";

#[derive(Debug)]
pub enum SeasonConfigError {
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    InvalidEnv { var: &'static str, value: String },
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SeasonConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonConfigError::StartAfterEnd { start, end } => write!(
                f,
                "season start date {start} must be on or before season end date {end}"
            ),
            SeasonConfigError::InvalidEnv { var, value } => {
                write!(f, "invalid value '{value}' for {var}")
            }
            SeasonConfigError::Io(err) => write!(f, "io error: {err}"),
            SeasonConfigError::Json(err) => write!(f, "invalid plan file: {err}"),
        }
    }
}

impl std::error::Error for SeasonConfigError {}

impl From<io::Error> for SeasonConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SeasonConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn default_event_time() -> NaiveTime {
    NaiveTime::MIN
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub start: NaiveDate,
    /// Inclusive; the last bucket starts on or before this date.
    pub end: NaiveDate,
    /// Time of day stamped on every event.
    #[serde(default = "default_event_time")]
    pub event_time: NaiveTime,
    /// Informational only, dates are never shifted between zones.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub mode: RuleMode,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 9, 4).expect("built-in date is valid"),
            end: NaiveDate::from_ymd_opt(2026, 3, 16).expect("built-in date is valid"),
            event_time: default_event_time(),
            time_zone: default_time_zone(),
            mode: RuleMode::Primary,
        }
    }
}

impl SeasonConfig {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SeasonConfigError> {
        let config = Self {
            start,
            end,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_mode(mut self, mode: RuleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), SeasonConfigError> {
        if self.start > self.end {
            return Err(SeasonConfigError::StartAfterEnd {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Applies `CROP_SEASON_START`, `CROP_SEASON_END` and `CROP_RULE_MODE`
    /// when set and non-empty.
    pub fn apply_env(mut self) -> Result<Self, SeasonConfigError> {
        if let Some(start) = env_date(ENV_SEASON_START)? {
            self.start = start;
        }
        if let Some(end) = env_date(ENV_SEASON_END)? {
            self.end = end;
        }
        if let Some(raw) = env_value(ENV_RULE_MODE) {
            self.mode = raw.parse().map_err(|_| SeasonConfigError::InvalidEnv {
                var: ENV_RULE_MODE,
                value: raw,
            })?;
        }
        self.validate()?;
        Ok(self)
    }
}

fn env_value(var: &'static str) -> Option<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_date(var: &'static str) -> Result<Option<NaiveDate>, SeasonConfigError> {
    match env_value(var) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| SeasonConfigError::InvalidEnv { var, value: raw }),
        None => Ok(None),
    }
}

/// Season dates plus the tables a season is generated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub season: SeasonConfig,
    pub phases: PhaseTable,
    pub varieties: VarietyTable,
}

#[derive(Deserialize)]
struct PlanFile {
    season: SeasonConfig,
    #[serde(default)]
    phases: Option<PhaseTable>,
    #[serde(default)]
    varieties: Option<VarietyTable>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            season: SeasonConfig::default(),
            phases: catalog::default_phases(),
            varieties: catalog::default_varieties(),
        }
    }
}

impl Plan {
    /// Built-in tables with environment overrides applied to the season.
    pub fn from_env() -> Result<Self, SeasonConfigError> {
        let season = SeasonConfig::default().apply_env()?;
        Ok(Self {
            season,
            ..Self::default()
        })
    }

    /// Reads a JSON plan. `phases` and `varieties` fall back to the built-in
    /// tables when omitted; tables that are present are validated on load.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SeasonConfigError> {
        let file = File::open(path)?;
        let raw: PlanFile = serde_json::from_reader(file)?;
        Self::from_file(raw)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SeasonConfigError> {
        let raw: PlanFile = serde_json::from_str(json)?;
        Self::from_file(raw)
    }

    fn from_file(raw: PlanFile) -> Result<Self, SeasonConfigError> {
        raw.season.validate()?;
        Ok(Self {
            season: raw.season,
            phases: raw.phases.unwrap_or_else(catalog::default_phases),
            varieties: raw.varieties.unwrap_or_else(catalog::default_varieties),
        })
    }
}
