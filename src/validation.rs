use crate::phase::PhaseDefinition;
use crate::variety::{PlantVariety, WashWindow};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

/// A static table broke one of its invariants. These are configuration bugs
/// and are reported when the table is built, never patched up later.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    EmptyPhaseTable,
    DoseCountMismatch {
        phase: String,
        products: usize,
        doses: usize,
    },
    UnitCountMismatch {
        phase: String,
        products: usize,
        units: usize,
    },
    InvertedWeekRange {
        phase: String,
        start_week: u32,
        end_week: u32,
    },
    FirstPhaseNotAtWeekZero {
        phase: String,
        start_week: u32,
    },
    WeekGap {
        after: String,
        before: String,
        missing_from: u32,
        missing_to: u32,
    },
    WeekOverlap {
        first: String,
        second: String,
        week: u32,
    },
    /// A phase ends at the last representable week but is not the last phase.
    WeekRangeOverflow {
        phase: String,
        next: String,
    },
    DuplicatePhaseId(String),
    UnknownHarvestPhase(String),
    InvalidVolumeRange {
        phase: String,
        min: f64,
        max: f64,
    },
    DuplicatePlantId(String),
    UnknownWashGroup(String),
    DuplicateWashGroup(String),
    InvertedWashWindow {
        group: String,
        washing: NaiveDate,
        harvest_start: NaiveDate,
        harvest_end: NaiveDate,
    },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::EmptyPhaseTable => write!(f, "phase table has no phases"),
            ConfigValidationError::DoseCountMismatch {
                phase,
                products,
                doses,
            } => write!(
                f,
                "phase {phase} lists {products} fertilization product(s) but {doses} dose(s)"
            ),
            ConfigValidationError::UnitCountMismatch {
                phase,
                products,
                units,
            } => write!(
                f,
                "phase {phase} lists {products} fertilization product(s) but {units} dose unit(s)"
            ),
            ConfigValidationError::InvertedWeekRange {
                phase,
                start_week,
                end_week,
            } => write!(
                f,
                "phase {phase} starts at week {start_week} after its end week {end_week}"
            ),
            ConfigValidationError::FirstPhaseNotAtWeekZero { phase, start_week } => write!(
                f,
                "first phase {phase} starts at week {start_week}, expected week 0"
            ),
            ConfigValidationError::WeekGap {
                after,
                before,
                missing_from,
                missing_to,
            } => write!(
                f,
                "weeks {missing_from}..={missing_to} between phases {after} and {before} are not covered"
            ),
            ConfigValidationError::WeekOverlap {
                first,
                second,
                week,
            } => write!(f, "phases {first} and {second} both cover week {week}"),
            ConfigValidationError::WeekRangeOverflow { phase, next } => write!(
                f,
                "phase {phase} ends at week {} so phase {next} has no week left to start on",
                u32::MAX
            ),
            ConfigValidationError::DuplicatePhaseId(id) => write!(f, "duplicate phase id {id}"),
            ConfigValidationError::UnknownHarvestPhase(id) => {
                write!(f, "harvest phase {id} is not in the phase table")
            }
            ConfigValidationError::InvalidVolumeRange { phase, min, max } => write!(
                f,
                "phase {phase} has invalid irrigation volume range {min}..{max}"
            ),
            ConfigValidationError::DuplicatePlantId(id) => write!(f, "duplicate plant id {id}"),
            ConfigValidationError::UnknownWashGroup(group) => write!(
                f,
                "wash window for group {group} matches no plant in the variety table"
            ),
            ConfigValidationError::DuplicateWashGroup(group) => {
                write!(f, "more than one wash window for group {group}")
            }
            ConfigValidationError::InvertedWashWindow {
                group,
                washing,
                harvest_start,
                harvest_end,
            } => write!(
                f,
                "wash window for {group} must satisfy washing < harvest start <= harvest end (got {washing}, {harvest_start}, {harvest_end})"
            ),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

pub fn validate_phase(phase: &PhaseDefinition) -> Result<(), ConfigValidationError> {
    let fert = &phase.fertilization;
    if fert.products.len() != fert.doses.len() {
        return Err(ConfigValidationError::DoseCountMismatch {
            phase: phase.id.clone(),
            products: fert.products.len(),
            doses: fert.doses.len(),
        });
    }
    if !fert.units.is_empty() && fert.units.len() != fert.products.len() {
        return Err(ConfigValidationError::UnitCountMismatch {
            phase: phase.id.clone(),
            products: fert.products.len(),
            units: fert.units.len(),
        });
    }
    if phase.start_week > phase.end_week {
        return Err(ConfigValidationError::InvertedWeekRange {
            phase: phase.id.clone(),
            start_week: phase.start_week,
            end_week: phase.end_week,
        });
    }
    for range in [&phase.irrigation.pot, &phase.irrigation.ground] {
        if !range.min.is_finite() || !range.max.is_finite() || range.min < 0.0 || range.min > range.max
        {
            return Err(ConfigValidationError::InvalidVolumeRange {
                phase: phase.id.clone(),
                min: range.min,
                max: range.max,
            });
        }
    }
    Ok(())
}

/// Phases must be individually valid, start at week 0, and tile the week axis
/// without gaps or overlaps in table order.
pub fn validate_phase_collection(
    phases: &[PhaseDefinition],
    harvest_phase_id: &str,
) -> Result<(), ConfigValidationError> {
    let first = phases.first().ok_or(ConfigValidationError::EmptyPhaseTable)?;
    if first.start_week != 0 {
        return Err(ConfigValidationError::FirstPhaseNotAtWeekZero {
            phase: first.id.clone(),
            start_week: first.start_week,
        });
    }

    let mut seen_ids = HashSet::with_capacity(phases.len());
    for phase in phases {
        validate_phase(phase)?;
        if !seen_ids.insert(phase.id.as_str()) {
            return Err(ConfigValidationError::DuplicatePhaseId(phase.id.clone()));
        }
    }

    for pair in phases.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let expected = prev.end_week.checked_add(1).ok_or_else(|| {
            ConfigValidationError::WeekRangeOverflow {
                phase: prev.id.clone(),
                next: next.id.clone(),
            }
        })?;
        if next.start_week > expected {
            return Err(ConfigValidationError::WeekGap {
                after: prev.id.clone(),
                before: next.id.clone(),
                missing_from: expected,
                missing_to: next.start_week - 1,
            });
        }
        if next.start_week < expected {
            return Err(ConfigValidationError::WeekOverlap {
                first: prev.id.clone(),
                second: next.id.clone(),
                week: next.start_week.max(prev.start_week),
            });
        }
    }

    if !seen_ids.contains(harvest_phase_id) {
        return Err(ConfigValidationError::UnknownHarvestPhase(
            harvest_phase_id.to_string(),
        ));
    }
    Ok(())
}

pub fn validate_varieties(plants: &[PlantVariety]) -> Result<(), ConfigValidationError> {
    let mut seen_ids = HashSet::with_capacity(plants.len());
    for plant in plants {
        if !seen_ids.insert(plant.id.as_str()) {
            return Err(ConfigValidationError::DuplicatePlantId(plant.id.clone()));
        }
    }
    Ok(())
}

pub fn validate_wash_windows(
    windows: &[WashWindow],
    plants: &[PlantVariety],
) -> Result<(), ConfigValidationError> {
    let mut seen_groups = HashSet::with_capacity(windows.len());
    for window in windows {
        if !seen_groups.insert(window.group.as_str()) {
            return Err(ConfigValidationError::DuplicateWashGroup(window.group.clone()));
        }
        if !plants.iter().any(|p| p.group == window.group) {
            return Err(ConfigValidationError::UnknownWashGroup(window.group.clone()));
        }
        if window.washing_date >= window.harvest_start || window.harvest_start > window.harvest_end
        {
            return Err(ConfigValidationError::InvertedWashWindow {
                group: window.group.clone(),
                washing: window.washing_date,
                harvest_start: window.harvest_start,
                harvest_end: window.harvest_end,
            });
        }
    }
    Ok(())
}
