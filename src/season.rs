use crate::calendar::{Calendar, GregorianCalendar};
use crate::config::{Plan, SeasonConfig};
use crate::event::{CareEvent, EventKind, WeekBucket};
use crate::generator::WeekGenerator;
use crate::phase::PhaseTable;
use crate::rules::{RuleMode, WeekRules};
use crate::variety::VarietyTable;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The dated timeline of one season under one rule mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub mode: RuleMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: Vec<WeekBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub mode: RuleMode,
    pub week_count: usize,
    pub fertilization_count: usize,
    pub irrigation_count: usize,
    pub washing_count: usize,
    pub harvest_count: usize,
    /// Weeks no phase range covered.
    pub fallback_weeks: Vec<u32>,
    pub last_fertilization: Option<NaiveDate>,
}

impl SeasonSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("mode={}", self.mode));
        parts.push(format!("weeks={}", self.week_count));
        parts.push(format!("fert={}", self.fertilization_count));
        parts.push(format!("riego={}", self.irrigation_count));
        if self.washing_count > 0 {
            parts.push(format!("lavado={}", self.washing_count));
        }
        if self.harvest_count > 0 {
            parts.push(format!("cosecha={}", self.harvest_count));
        }
        if let Some(date) = self.last_fertilization {
            parts.push(format!("last_fert={date}"));
        }
        if !self.fallback_weeks.is_empty() {
            let weeks = self
                .fallback_weeks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("fallback_weeks={weeks}"));
        }
        parts.join(", ")
    }
}

/// Builds the season with the Gregorian calendar.
pub fn build_season(
    config: &SeasonConfig,
    phases: &PhaseTable,
    varieties: &VarietyTable,
    mode: RuleMode,
) -> Season {
    build_season_with(config, phases, varieties, mode.rules(), &GregorianCalendar)
}

/// One bucket per 7 days from `config.start` while the bucket start is
/// `<= config.end`. An inverted range yields an empty season.
pub fn build_season_with(
    config: &SeasonConfig,
    phases: &PhaseTable,
    varieties: &VarietyTable,
    rules: &dyn WeekRules,
    calendar: &dyn Calendar,
) -> Season {
    let mut season = Season {
        mode: rules.mode(),
        start: config.start,
        end: config.end,
        weeks: Vec::new(),
    };

    if calendar.compare(config.start, config.end) == Ordering::Greater {
        log::warn!(
            "season start {} is after end {}; no weeks generated",
            config.start,
            config.end
        );
        return season;
    }

    let span = calendar.days_between(config.start, config.end);
    let max_weeks = (span + 6) / 7 + 1;
    season.weeks.reserve(max_weeks as usize);

    let generator = WeekGenerator {
        phases,
        varieties,
        rules,
        calendar,
        event_time: config.event_time,
    };

    let mut cursor = config.start;
    let mut index: u32 = 0;
    while calendar.compare(cursor, config.end) != Ordering::Greater {
        if i64::from(index) >= max_weeks {
            log::error!("season iteration exceeded {max_weeks} weeks; stopping at {cursor}");
            break;
        }
        let resolution = phases.resolve(index, rules.fallback_policy());
        let phase = resolution.phase();
        season.weeks.push(WeekBucket {
            index,
            start: cursor,
            end: calendar.add_days(cursor, 6),
            phase_id: phase.id.clone(),
            fallback: resolution.fallback_reason(),
            events: generator.generate(cursor, index, phase),
        });
        cursor = calendar.add_weeks(cursor, 1);
        index += 1;
    }

    log::info!(
        "built {} season {}..={} with {} weeks",
        season.mode,
        season.start,
        season.end,
        season.weeks.len()
    );
    season
}

/// First fertilization event at or after `reference`.
pub fn find_next_fertilization(
    weeks: &[WeekBucket],
    reference: NaiveDateTime,
) -> Option<&CareEvent> {
    find_next(weeks, EventKind::Fertilization, reference)
}

pub fn find_next(
    weeks: &[WeekBucket],
    kind: EventKind,
    reference: NaiveDateTime,
) -> Option<&CareEvent> {
    weeks
        .iter()
        .flat_map(|week| week.events.iter())
        .find(|event| event.kind == kind && event.at >= reference)
}

impl Plan {
    pub fn build(&self) -> Season {
        self.build_mode(self.season.mode)
    }

    pub fn build_mode(&self, mode: RuleMode) -> Season {
        build_season(&self.season, &self.phases, &self.varieties, mode)
    }
}

impl Season {
    pub fn weeks(&self) -> &[WeekBucket] {
        &self.weeks
    }

    pub fn week(&self, index: u32) -> Option<&WeekBucket> {
        self.weeks.get(index as usize)
    }

    /// Bucket whose `[start, end]` holds `date`.
    pub fn week_containing(&self, date: NaiveDate) -> Option<&WeekBucket> {
        self.weeks.iter().find(|w| w.contains(date))
    }

    pub fn events(&self) -> impl Iterator<Item = &CareEvent> {
        self.weeks.iter().flat_map(|w| w.events.iter())
    }

    pub fn find_event(&self, id: &str) -> Option<&CareEvent> {
        self.events().find(|e| e.id == id)
    }

    pub fn events_for_plant<'a>(
        &'a self,
        plant_id: &'a str,
    ) -> impl Iterator<Item = &'a CareEvent> + 'a {
        self.events().filter(move |e| e.applies_to(plant_id))
    }

    pub fn find_next_fertilization(&self, reference: NaiveDateTime) -> Option<&CareEvent> {
        find_next_fertilization(&self.weeks, reference)
    }

    pub fn find_next(&self, kind: EventKind, reference: NaiveDateTime) -> Option<&CareEvent> {
        find_next(&self.weeks, kind, reference)
    }

    pub fn summary(&self) -> SeasonSummary {
        let count = |kind: EventKind| self.events().filter(|e| e.kind == kind).count();
        SeasonSummary {
            mode: self.mode,
            week_count: self.weeks.len(),
            fertilization_count: count(EventKind::Fertilization),
            irrigation_count: count(EventKind::Irrigation),
            washing_count: count(EventKind::Washing),
            harvest_count: count(EventKind::Harvest),
            fallback_weeks: self
                .weeks
                .iter()
                .filter(|w| w.fallback.is_some())
                .map(|w| w.index)
                .collect(),
            last_fertilization: self
                .events()
                .filter(|e| e.kind == EventKind::Fertilization)
                .map(|e| e.date())
                .last(),
        }
    }
}
