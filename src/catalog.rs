//! Built-in tables for the 2025/26 tomato season.
//!
//! Phases cover weeks 0..=26; a 2025-09-04 → 2026-03-16 season has 28 weeks,
//! so the last week is resolved through the fallback policy.

use crate::phase::{FertilizationRule, IrrigationRule, PhaseDefinition, PhaseTable, VolumeRange};
use crate::variety::{PhRange, PlantVariety, PlantingMethod, VarietyTable, WashWindow};
use chrono::NaiveDate;

pub const HARVEST_PHASE_ID: &str = "cosecha";

fn phase(
    id: &str,
    name: &str,
    weeks: (u32, u32),
    description: &str,
    fertilization: FertilizationRule,
    pot: (f64, f64),
    ground: (f64, f64),
) -> PhaseDefinition {
    PhaseDefinition {
        id: id.to_string(),
        name: name.to_string(),
        start_week: weeks.0,
        end_week: weeks.1,
        description: description.to_string(),
        fertilization,
        irrigation: IrrigationRule {
            pot: VolumeRange::new(pot.0, pot.1),
            ground: VolumeRange::new(ground.0, ground.1),
        },
    }
}

fn feed(products: &[(&str, f64, &str)], notes: &str) -> FertilizationRule {
    FertilizationRule {
        products: products.iter().map(|(p, _, _)| p.to_string()).collect(),
        doses: products.iter().map(|(_, d, _)| *d).collect(),
        units: products.iter().map(|(_, _, u)| u.to_string()).collect(),
        notes: notes.to_string(),
    }
}

pub fn default_phase_definitions() -> Vec<PhaseDefinition> {
    vec![
        phase(
            "germinacion",
            "Germinación y Plántula",
            (0, 1),
            "Emergencia de semillas y desarrollo de primeras hojas verdaderas",
            FertilizationRule::none("Mantener sustrato húmedo, sin fertilizantes"),
            (0.1, 0.2),
            (0.2, 0.3),
        ),
        phase(
            "crecimiento",
            "Crecimiento Vegetativo",
            (2, 7),
            "Desarrollo de tallos y hojas. Mayor demanda de nitrógeno.",
            feed(
                &[("Compost", 100.0, "g"), ("Purín de Ortiga", 20.0, "ml")],
                "Aplicar compost en superficie o purín diluido",
            ),
            (0.5, 1.0),
            (1.0, 2.0),
        ),
        phase(
            "floracion",
            "Floración y Cuajado",
            (8, 13),
            "Aparición de flores y primeros frutos. Demanda de potasio.",
            feed(
                &[("Té de Banana", 50.0, "ml"), ("Humus", 100.0, "g")],
                "Reforzar potasio para la floración",
            ),
            (1.5, 2.5),
            (2.0, 3.0),
        ),
        phase(
            "fructificacion",
            "Desarrollo de Fruto",
            (14, 19),
            "Engorde y maduración de frutos.",
            feed(
                &[("Compost", 100.0, "g"), ("Ceniza de madera", 10.0, "g")],
                "Mantener nutrición equilibrada",
            ),
            (2.0, 3.0),
            (3.0, 4.0),
        ),
        phase(
            "lavado",
            "Lavado de Raíces",
            (20, 21),
            "Solo agua para eliminar sales antes de la cosecha.",
            FertilizationRule::none("Sin fertilizantes, solo agua de la llave"),
            (2.0, 3.0),
            (3.0, 4.0),
        ),
        phase(
            HARVEST_PHASE_ID,
            "Cosecha Continua",
            (22, 26),
            "Recolección de frutos maduros.",
            FertilizationRule::none("Reducir fertilización, mantener humedad constante"),
            (1.5, 2.5),
            (2.5, 3.5),
        ),
    ]
}

pub fn default_phases() -> PhaseTable {
    PhaseTable::new(default_phase_definitions(), HARVEST_PHASE_ID)
        .expect("built-in phase table is valid")
}

fn plant(
    id: &str,
    name: &str,
    bank: &str,
    group: &str,
    method: PlantingMethod,
    notes: &str,
) -> PlantVariety {
    PlantVariety {
        id: id.to_string(),
        name: name.to_string(),
        bank: bank.to_string(),
        group: group.to_string(),
        method,
        soil_ph: Some(PhRange { min: 6.0, max: 6.8 }),
        notes: notes.to_string(),
    }
}

pub fn default_plants() -> Vec<PlantVariety> {
    vec![
        plant(
            "fresh-candy-suelo",
            "Fresh Candy",
            "Top Crop",
            "fresh-candy",
            PlantingMethod::Ground,
            "Cherry dulce, requiere entutorado",
        ),
        plant(
            "fresh-candy-maceta",
            "Fresh Candy",
            "Top Crop",
            "fresh-candy",
            PlantingMethod::Pot,
            "Maceta de 20 L",
        ),
        plant(
            "cream-mandarine-suelo",
            "Cream Mandarine",
            "Top Crop",
            "cream-mandarine",
            PlantingMethod::Ground,
            "Cherry naranja, ciclo corto",
        ),
        plant(
            "cream-mandarine-maceta-1",
            "Cream Mandarine",
            "Top Crop",
            "cream-mandarine",
            PlantingMethod::Pot,
            "Maceta de 20 L",
        ),
        plant(
            "cream-mandarine-maceta-2",
            "Cream Mandarine",
            "Top Crop",
            "cream-mandarine",
            PlantingMethod::Pot,
            "Maceta de 20 L",
        ),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("built-in date is valid")
}

pub fn default_wash_windows() -> Vec<WashWindow> {
    vec![
        WashWindow {
            group: "cream-mandarine".to_string(),
            washing_date: date(2025, 11, 14),
            harvest_start: date(2025, 11, 21),
            harvest_end: date(2026, 1, 31),
        },
        WashWindow {
            group: "fresh-candy".to_string(),
            washing_date: date(2026, 1, 9),
            harvest_start: date(2026, 1, 22),
            harvest_end: date(2026, 3, 16),
        },
    ]
}

pub fn default_varieties() -> VarietyTable {
    VarietyTable::new(default_plants(), default_wash_windows())
        .expect("built-in variety table is valid")
}
