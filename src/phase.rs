use crate::validation::{self, ConfigValidationError};
use crate::variety::PlantingMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Liters of water per plant for one irrigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min: f64,
    pub max: f64,
}

impl VolumeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for VolumeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}L", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizationRule {
    pub products: Vec<String>,
    /// Parallel to `products`.
    pub doses: Vec<f64>,
    /// Unit of each dose (`g`, `ml`, `ml/L`). Empty means unitless doses;
    /// otherwise parallel to `products`.
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl FertilizationRule {
    pub fn none(notes: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            doses: Vec::new(),
            units: Vec::new(),
            notes: notes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Irrigation volume per planting method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRule {
    pub pot: VolumeRange,
    pub ground: VolumeRange,
}

impl IrrigationRule {
    pub fn for_method(&self, method: PlantingMethod) -> VolumeRange {
        match method {
            PlantingMethod::Pot => self.pot,
            PlantingMethod::Ground => self.ground,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub id: String,
    pub name: String,
    pub start_week: u32,
    /// Inclusive.
    pub end_week: u32,
    #[serde(default)]
    pub description: String,
    pub fertilization: FertilizationRule,
    pub irrigation: IrrigationRule,
}

impl PhaseDefinition {
    pub fn contains_week(&self, week: u32) -> bool {
        week >= self.start_week && week <= self.end_week
    }
}

/// Which phase governs a week that no configured range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    UseFirst,
    UseLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FallbackReason {
    PastLastPhase { week: u32, last_week: u32 },
    BeforeFirstPhase { week: u32, first_week: u32 },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::PastLastPhase { week, last_week } => {
                write!(f, "week {week} is past the last configured week {last_week}")
            }
            FallbackReason::BeforeFirstPhase { week, first_week } => {
                write!(f, "week {week} precedes the first configured week {first_week}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseResolution<'a> {
    Found(&'a PhaseDefinition),
    UsedFallback {
        phase: &'a PhaseDefinition,
        reason: FallbackReason,
    },
}

impl<'a> PhaseResolution<'a> {
    pub fn phase(&self) -> &'a PhaseDefinition {
        match self {
            PhaseResolution::Found(phase) => phase,
            PhaseResolution::UsedFallback { phase, .. } => phase,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PhaseResolution::UsedFallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            PhaseResolution::Found(_) => None,
            PhaseResolution::UsedFallback { reason, .. } => Some(*reason),
        }
    }
}

/// Ordered, validated phase table. Construction fails on any broken invariant,
/// so a `PhaseTable` in hand always tiles weeks `0..=last_week()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTable {
    phases: Vec<PhaseDefinition>,
    harvest_phase_id: String,
}

impl PhaseTable {
    pub fn new(
        phases: Vec<PhaseDefinition>,
        harvest_phase_id: impl Into<String>,
    ) -> Result<Self, ConfigValidationError> {
        let harvest_phase_id = harvest_phase_id.into();
        validation::validate_phase_collection(&phases, &harvest_phase_id)?;
        Ok(Self {
            phases,
            harvest_phase_id,
        })
    }

    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    pub fn harvest_phase_id(&self) -> &str {
        &self.harvest_phase_id
    }

    pub fn is_harvest(&self, phase: &PhaseDefinition) -> bool {
        phase.id == self.harvest_phase_id
    }

    pub fn find(&self, id: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn last_week(&self) -> u32 {
        self.phases.last().map(|p| p.end_week).unwrap_or(0)
    }

    /// First phase in table order covering `week`, otherwise the phase picked
    /// by `policy`.
    pub fn resolve(&self, week: u32, policy: FallbackPolicy) -> PhaseResolution<'_> {
        if let Some(phase) = self.phases.iter().find(|p| p.contains_week(week)) {
            return PhaseResolution::Found(phase);
        }

        // Non-empty by construction.
        let first = &self.phases[0];
        let last = &self.phases[self.phases.len() - 1];
        let reason = if week < first.start_week {
            FallbackReason::BeforeFirstPhase {
                week,
                first_week: first.start_week,
            }
        } else {
            FallbackReason::PastLastPhase {
                week,
                last_week: last.end_week,
            }
        };
        let phase = match policy {
            FallbackPolicy::UseFirst => first,
            FallbackPolicy::UseLast => last,
        };
        log::debug!("week {week} resolved to fallback phase {} ({reason})", phase.id);
        PhaseResolution::UsedFallback { phase, reason }
    }
}

impl<'de> Deserialize<'de> for PhaseTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            phases: Vec<PhaseDefinition>,
            harvest_phase_id: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        PhaseTable::new(raw.phases, raw.harvest_phase_id).map_err(serde::de::Error::custom)
    }
}
