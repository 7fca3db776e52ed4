use crop_calendar::catalog::{self, HARVEST_PHASE_ID};
use crop_calendar::{
    ConfigValidationError, FallbackPolicy, FallbackReason, PhaseResolution,
    PhaseTable, Plan,
};

#[test]
fn resolves_first_covering_phase() {
    let table = catalog::default_phases();
    for (week, expected) in [
        (0, "germinacion"),
        (1, "germinacion"),
        (2, "crecimiento"),
        (13, "floracion"),
        (20, "lavado"),
        (26, "cosecha"),
    ] {
        let resolution = table.resolve(week, FallbackPolicy::UseLast);
        assert!(!resolution.is_fallback(), "week {week}");
        assert_eq!(resolution.phase().id, expected);
    }
}

#[test]
fn uncovered_week_follows_the_named_policy() {
    let table = catalog::default_phases();

    match table.resolve(40, FallbackPolicy::UseLast) {
        PhaseResolution::UsedFallback { phase, reason } => {
            assert_eq!(phase.id, "cosecha");
            assert_eq!(
                reason,
                FallbackReason::PastLastPhase {
                    week: 40,
                    last_week: 26
                }
            );
        }
        other => panic!("expected fallback, got {other:?}"),
    }

    let resolution = table.resolve(27, FallbackPolicy::UseFirst);
    assert!(resolution.is_fallback());
    assert_eq!(resolution.phase().id, "germinacion");
    assert!(resolution.fallback_reason().is_some());
}

#[test]
fn harvest_phase_is_identified_by_id() {
    let table = catalog::default_phases();
    assert_eq!(table.harvest_phase_id(), HARVEST_PHASE_ID);
    let harvest = table.find("cosecha").unwrap();
    assert!(table.is_harvest(harvest));
    assert!(!table.is_harvest(table.find("lavado").unwrap()));
}

#[test]
fn dose_mismatch_is_rejected() {
    let mut phases = catalog::default_phase_definitions();
    phases[1].fertilization.doses.pop();
    let err = PhaseTable::new(phases, HARVEST_PHASE_ID).unwrap_err();
    assert_eq!(
        err,
        ConfigValidationError::DoseCountMismatch {
            phase: "crecimiento".to_string(),
            products: 2,
            doses: 1
        }
    );
    assert!(err.to_string().contains("crecimiento"));
}

#[test]
fn dose_units_are_optional_but_must_match_products() {
    let mut unitless = catalog::default_phase_definitions();
    unitless[1].fertilization.units.clear();
    assert!(PhaseTable::new(unitless, HARVEST_PHASE_ID).is_ok());

    let mut short = catalog::default_phase_definitions();
    short[2].fertilization.units.pop();
    assert_eq!(
        PhaseTable::new(short, HARVEST_PHASE_ID).unwrap_err(),
        ConfigValidationError::UnitCountMismatch {
            phase: "floracion".to_string(),
            products: 2,
            units: 1
        }
    );
}

#[test]
fn gaps_and_overlaps_are_rejected() {
    let mut gap = catalog::default_phase_definitions();
    gap[2].start_week = 9;
    assert!(matches!(
        PhaseTable::new(gap, HARVEST_PHASE_ID),
        Err(ConfigValidationError::WeekGap {
            missing_from: 8,
            missing_to: 8,
            ..
        })
    ));

    let mut overlap = catalog::default_phase_definitions();
    overlap[2].start_week = 7;
    assert!(matches!(
        PhaseTable::new(overlap, HARVEST_PHASE_ID),
        Err(ConfigValidationError::WeekOverlap { week: 7, .. })
    ));

    let mut late_start = catalog::default_phase_definitions();
    late_start[0].start_week = 1;
    assert!(matches!(
        PhaseTable::new(late_start, HARVEST_PHASE_ID),
        Err(ConfigValidationError::FirstPhaseNotAtWeekZero { .. })
    ));
}

#[test]
fn other_table_errors_are_reported() {
    assert_eq!(
        PhaseTable::new(Vec::new(), HARVEST_PHASE_ID).unwrap_err(),
        ConfigValidationError::EmptyPhaseTable
    );
    assert!(matches!(
        PhaseTable::new(catalog::default_phase_definitions(), "poda"),
        Err(ConfigValidationError::UnknownHarvestPhase(_))
    ));

    let mut inverted = catalog::default_phase_definitions();
    inverted[5].start_week = 22;
    inverted[5].end_week = 21;
    assert!(matches!(
        PhaseTable::new(inverted, HARVEST_PHASE_ID),
        Err(ConfigValidationError::InvertedWeekRange { .. })
    ));

    let mut bad_volume = catalog::default_phase_definitions();
    bad_volume[0].irrigation.pot.min = 1.0;
    assert!(matches!(
        PhaseTable::new(bad_volume, HARVEST_PHASE_ID),
        Err(ConfigValidationError::InvalidVolumeRange { .. })
    ));
}

#[test]
fn variety_table_rejects_bad_wash_windows() {
    let mut unknown = catalog::default_wash_windows();
    unknown[0].group = "sweet-million".to_string();
    assert!(matches!(
        crop_calendar::VarietyTable::new(catalog::default_plants(), unknown),
        Err(ConfigValidationError::UnknownWashGroup(_))
    ));

    let mut inverted = catalog::default_wash_windows();
    inverted[1].harvest_start = inverted[1].washing_date;
    assert!(matches!(
        crop_calendar::VarietyTable::new(catalog::default_plants(), inverted),
        Err(ConfigValidationError::InvertedWashWindow { .. })
    ));

    let mut plants = catalog::default_plants();
    plants.push(plants[0].clone());
    assert!(matches!(
        crop_calendar::VarietyTable::new(plants, catalog::default_wash_windows()),
        Err(ConfigValidationError::DuplicatePlantId(_))
    ));
}

#[test]
fn plan_file_with_broken_phase_table_fails_to_load() {
    let json = r#"{
        "season": { "start": "2025-09-04", "end": "2025-10-30" },
        "phases": {
            "harvest_phase_id": "a",
            "phases": [
                {
                    "id": "a", "name": "A", "start_week": 0, "end_week": 3,
                    "fertilization": { "products": ["Humus"], "doses": [] },
                    "irrigation": {
                        "pot": { "min": 0.5, "max": 1.0 },
                        "ground": { "min": 1.0, "max": 2.0 }
                    }
                }
            ]
        }
    }"#;
    let err = Plan::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("dose"), "{err}");
}

#[test]
fn plan_file_without_tables_uses_built_in_ones() {
    let json = r#"{ "season": { "start": "2025-09-04", "end": "2025-10-30", "mode": "alternate" } }"#;
    let plan = Plan::from_json_str(json).unwrap();
    assert_eq!(plan.phases, catalog::default_phases());
    assert_eq!(plan.season.time_zone, "America/Santiago");
    let season = plan.build();
    assert_eq!(season.mode, crop_calendar::RuleMode::Alternate);
    assert_eq!(season.weeks.len(), 56 / 7 + 1);

    let inverted = r#"{ "season": { "start": "2025-10-30", "end": "2025-09-04" } }"#;
    assert!(matches!(
        Plan::from_json_str(inverted),
        Err(crop_calendar::SeasonConfigError::StartAfterEnd { .. })
    ));
}

#[test]
fn week_range_running_to_the_last_week_is_rejected_not_overflowed() {
    let mut phases = catalog::default_phase_definitions();
    phases[0].end_week = u32::MAX;
    assert_eq!(
        PhaseTable::new(phases.clone(), HARVEST_PHASE_ID).unwrap_err(),
        ConfigValidationError::WeekRangeOverflow {
            phase: "germinacion".to_string(),
            next: "crecimiento".to_string(),
        }
    );

    let json = serde_json::json!({
        "season": { "start": "2025-09-04", "end": "2026-03-16" },
        "phases": { "phases": phases, "harvest_phase_id": HARVEST_PHASE_ID },
    })
    .to_string();
    let err = Plan::from_json_str(&json).unwrap_err();
    assert!(err.to_string().contains("germinacion"), "{err}");

    let mut last_open = catalog::default_phase_definitions();
    last_open[5].end_week = u32::MAX;
    let table = PhaseTable::new(last_open, HARVEST_PHASE_ID).unwrap();
    assert_eq!(table.last_week(), u32::MAX);
}

#[test]
fn wash_and_harvest_intervals_are_half_open() {
    let varieties = catalog::default_varieties();
    let day = |m, d| {
        let year = if m >= 9 { 2025 } else { 2026 };
        chrono::NaiveDate::from_ymd_opt(year, m, d).unwrap()
    };
    let groups = |windows: Vec<&crop_calendar::WashWindow>| {
        windows.iter().map(|w| w.group.clone()).collect::<Vec<_>>()
    };

    assert_eq!(groups(varieties.washing_on(day(11, 20)).collect()), ["cream-mandarine"]);
    assert!(varieties.harvesting_on(day(11, 20)).next().is_none());

    assert!(varieties.washing_on(day(11, 21)).next().is_none());
    assert_eq!(groups(varieties.harvesting_on(day(11, 21)).collect()), ["cream-mandarine"]);

    assert_eq!(groups(varieties.washing_on(day(1, 10)).collect()), ["fresh-candy"]);
    assert_eq!(groups(varieties.harvesting_on(day(1, 10)).collect()), ["cream-mandarine"]);

    assert_eq!(groups(varieties.harvesting_on(day(1, 31)).collect()), ["fresh-candy"]);
    assert!(varieties.harvesting_on(day(3, 16)).next().is_none());
}
