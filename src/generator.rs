use crate::calendar::{Calendar, GregorianCalendar};
use crate::event::{CareEvent, EventKind, VolumeByMethod};
use crate::phase::{PhaseDefinition, PhaseTable};
use crate::rules::{RuleMode, WeekRules};
use crate::variety::{VarietyTable, WashWindow};
use chrono::{NaiveDate, NaiveTime};

/// Day offsets from the week start.
pub const IRRIGATION_OFFSETS: [i64; 2] = [0, 5];
pub const TREATMENT_OFFSET: i64 = 3;
pub const HARVEST_OFFSET: i64 = 5;

const WASHING_NOTE: &str = "Lavado de raíces - solo agua de la llave";
const HARVEST_NOTE: &str = "Recolección de frutos maduros";

/// Everything that stays fixed across the weeks of one season.
pub struct WeekGenerator<'a> {
    pub phases: &'a PhaseTable,
    pub varieties: &'a VarietyTable,
    pub rules: &'a dyn WeekRules,
    pub calendar: &'a dyn Calendar,
    pub event_time: NaiveTime,
}

impl<'a> WeekGenerator<'a> {
    /// Events of one week, ordered by date-time.
    pub fn generate(
        &self,
        week_start: NaiveDate,
        week_index: u32,
        phase: &PhaseDefinition,
    ) -> Vec<CareEvent> {
        let prefix = self.rules.id_prefix();
        let volumes = self.rules.volumes(&phase.irrigation);
        let all_plants = self.varieties.plant_ids();
        let mut events = Vec::with_capacity(4);

        for (idx, offset) in IRRIGATION_OFFSETS.iter().enumerate() {
            let date = self.calendar.add_days(week_start, *offset);
            events.push(self.water_event(
                format!("{prefix}riego-{week_index}-{idx}-{}", date_key(date)),
                EventKind::Irrigation,
                date,
                volumes,
                all_plants.clone(),
                self.rules.irrigation_note(),
                &phase.name,
            ));
        }

        let treatment_date = self.calendar.add_days(week_start, TREATMENT_OFFSET);
        let washing: Vec<&WashWindow> = self.varieties.washing_on(treatment_date).collect();
        if !washing.is_empty() {
            for scope in self.rules.washing_scopes(&washing, self.varieties) {
                log::debug!(
                    "week {week_index}: washing {} on {treatment_date}, fertilization skipped",
                    scope.groups.join(",")
                );
                events.push(self.water_event(
                    format!(
                        "{prefix}lavado-{week_index}-{}-{}",
                        scope.key,
                        date_key(treatment_date)
                    ),
                    EventKind::Washing,
                    treatment_date,
                    volumes,
                    scope.plants,
                    WASHING_NOTE,
                    self.rules.washing_phase_label(phase),
                ));
            }
        } else if !phase.fertilization.is_empty() {
            events.push(CareEvent {
                id: format!("{prefix}fert-{week_index}-{}", date_key(treatment_date)),
                kind: EventKind::Fertilization,
                at: treatment_date.and_time(self.event_time),
                products: phase.fertilization.products.clone(),
                doses: phase.fertilization.doses.clone(),
                units: phase.fertilization.units.clone(),
                volumes,
                plants: all_plants.clone(),
                notes: phase.fertilization.notes.clone(),
                phase: phase.name.clone(),
            });
        }

        if self.phases.is_harvest(phase) {
            let date = self.calendar.add_days(week_start, HARVEST_OFFSET);
            events.push(self.water_event(
                format!("{prefix}cosecha-{week_index}-{}", date_key(date)),
                EventKind::Harvest,
                date,
                volumes,
                all_plants,
                HARVEST_NOTE,
                &phase.name,
            ));
        }

        // Stable: same-day events keep insertion order (irrigation before harvest).
        events.sort_by_key(|e| e.at);
        events
    }

    #[allow(clippy::too_many_arguments)]
    fn water_event(
        &self,
        id: String,
        kind: EventKind,
        date: NaiveDate,
        volumes: VolumeByMethod,
        plants: Vec<String>,
        notes: &str,
        phase_label: &str,
    ) -> CareEvent {
        CareEvent {
            id,
            kind,
            at: date.and_time(self.event_time),
            products: Vec::new(),
            doses: Vec::new(),
            units: Vec::new(),
            volumes,
            plants,
            notes: notes.to_string(),
            phase: phase_label.to_string(),
        }
    }
}

/// One week under `mode` with the Gregorian calendar and midnight events.
pub fn generate_week(
    week_start: NaiveDate,
    week_index: u32,
    phase: &PhaseDefinition,
    phases: &PhaseTable,
    varieties: &VarietyTable,
    mode: RuleMode,
) -> Vec<CareEvent> {
    WeekGenerator {
        phases,
        varieties,
        rules: mode.rules(),
        calendar: &GregorianCalendar,
        event_time: NaiveTime::MIN,
    }
    .generate(week_start, week_index, phase)
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
