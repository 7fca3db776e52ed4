use crate::event::VolumeByMethod;
use crate::phase::{FallbackPolicy, IrrigationRule, PhaseDefinition};
use crate::variety::{VarietyTable, WashWindow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plants covered by one washing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WashScope {
    /// Goes into the event id; unique among the scopes of one week.
    pub key: String,
    pub groups: Vec<String>,
    pub plants: Vec<String>,
}

/// The knobs on which the two rule variants differ. The weekly generator is
/// written once against this trait.
pub trait WeekRules: Send + Sync {
    fn mode(&self) -> RuleMode;

    fn fallback_policy(&self) -> FallbackPolicy;

    /// Prepended to every event id so seasons of different modes never share ids.
    fn id_prefix(&self) -> &'static str;

    fn volumes(&self, irrigation: &IrrigationRule) -> VolumeByMethod;

    fn irrigation_note(&self) -> &'static str;

    /// Phase label carried by washing events.
    fn washing_phase_label<'p>(&self, phase: &'p PhaseDefinition) -> &'p str {
        &phase.name
    }

    /// Washing events for the windows active on the washing-candidate day.
    /// `active` is never empty.
    fn washing_scopes(&self, active: &[&WashWindow], varieties: &VarietyTable) -> Vec<WashScope>;
}

/// Per-method volumes, one washing event per variety group.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryRules;

impl WeekRules for PrimaryRules {
    fn mode(&self) -> RuleMode {
        RuleMode::Primary
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::UseLast
    }

    fn id_prefix(&self) -> &'static str {
        ""
    }

    fn volumes(&self, irrigation: &IrrigationRule) -> VolumeByMethod {
        VolumeByMethod::from(*irrigation)
    }

    fn irrigation_note(&self) -> &'static str {
        "Riego regular. Verificar humedad del sustrato."
    }

    fn washing_scopes(&self, active: &[&WashWindow], varieties: &VarietyTable) -> Vec<WashScope> {
        active
            .iter()
            .map(|window| WashScope {
                key: window.group.clone(),
                groups: vec![window.group.clone()],
                plants: varieties.group_plant_ids(&window.group),
            })
            .collect()
    }
}

/// Comparison table rules: ground volumes for every plant, first-phase
/// fallback, and one washing event carrying the whole variety list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternateRules;

impl WeekRules for AlternateRules {
    fn mode(&self) -> RuleMode {
        RuleMode::Alternate
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::UseFirst
    }

    fn id_prefix(&self) -> &'static str {
        "tc-"
    }

    fn volumes(&self, irrigation: &IrrigationRule) -> VolumeByMethod {
        VolumeByMethod::uniform(irrigation.ground)
    }

    fn irrigation_note(&self) -> &'static str {
        "Riego con agua de la llave"
    }

    fn washing_phase_label<'p>(&self, _phase: &'p PhaseDefinition) -> &'p str {
        "Lavado"
    }

    fn washing_scopes(&self, active: &[&WashWindow], varieties: &VarietyTable) -> Vec<WashScope> {
        vec![WashScope {
            key: "all".to_string(),
            groups: active.iter().map(|w| w.group.clone()).collect(),
            plants: varieties.plant_ids(),
        }]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    #[default]
    Primary,
    Alternate,
}

impl RuleMode {
    pub fn rules(self) -> &'static dyn WeekRules {
        match self {
            RuleMode::Primary => &PrimaryRules,
            RuleMode::Alternate => &AlternateRules,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleMode::Primary => "primary",
            RuleMode::Alternate => "alternate",
        }
    }
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(RuleMode::Primary),
            "alternate" | "topcrop" => Ok(RuleMode::Alternate),
            other => Err(format!("unknown rule mode '{other}' (expected primary|alternate)")),
        }
    }
}
