pub mod calendar;
pub mod catalog;
pub mod config;
pub mod event;
pub mod export;
pub mod generator;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod phase;
pub mod rules;
pub mod season;
pub mod table;
pub mod validation;
pub mod variety;

pub use calendar::{Calendar, GregorianCalendar};
pub use config::{Plan, SeasonConfig, SeasonConfigError};
pub use event::{CareEvent, EventKind, VolumeByMethod, WeekBucket};
pub use export::{ExportError, load_season_from_json, save_season_to_csv, save_season_to_json};
pub use generator::{WeekGenerator, generate_week};
pub use phase::{
    FallbackPolicy, FallbackReason, FertilizationRule, IrrigationRule, PhaseDefinition,
    PhaseResolution, PhaseTable, VolumeRange,
};
pub use rules::{AlternateRules, PrimaryRules, RuleMode, WeekRules};
pub use season::{
    Season, SeasonSummary, build_season, build_season_with, find_next, find_next_fertilization,
};
pub use validation::ConfigValidationError;
pub use variety::{PhRange, PlantVariety, PlantingMethod, VarietyTable, WashWindow};
