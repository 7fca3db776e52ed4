use crop_calendar::export::season_csv_records;
use crop_calendar::table::{plant_dataframe, render_text_table, season_dataframe};
use crop_calendar::{Plan, RuleMode, load_season_from_json, save_season_to_csv, save_season_to_json};
use tempfile::NamedTempFile;

#[test]
fn json_export_round_trips() {
    let season = Plan::default().build_mode(RuleMode::Alternate);
    let tmp = NamedTempFile::new().expect("create temp file");
    save_season_to_json(&season, tmp.path()).unwrap();
    let loaded = load_season_from_json(tmp.path()).unwrap();
    assert_eq!(loaded, season);
}

#[test]
fn csv_export_writes_one_row_per_event() {
    let season = Plan::default().build();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_season_to_csv(&season, tmp.path()).unwrap();

    let mut reader = csv::Reader::from_path(tmp.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "week");
    assert_eq!(&headers[3], "id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), season.events().count());

    let washing = rows
        .iter()
        .find(|r| &r[3] == "lavado-10-cream-mandarine-20251116")
        .expect("washing row");
    assert_eq!(&washing[4], "washing");
    assert_eq!(
        &washing[14],
        "cream-mandarine-suelo;cream-mandarine-maceta-1;cream-mandarine-maceta-2"
    );
}

#[test]
fn csv_records_join_products_and_doses() {
    let season = Plan::default().build();
    let records = season_csv_records(&season);
    let fert = records.iter().find(|r| r.id == "fert-2-20250921").unwrap();
    assert_eq!(fert.products, "Compost;Purín de Ortiga");
    assert_eq!(fert.doses, "100;20");
    assert_eq!(fert.units, "g;ml");
    assert_eq!(fert.at, "2025-09-21T00:00");
    assert_eq!(fert.week_start, "2025-09-18");
}

#[test]
fn dataframe_view_has_a_row_per_event() {
    let season = Plan::default().build();
    let df = season_dataframe(&season).unwrap();
    assert_eq!(df.height(), season.events().count());
    assert_eq!(df.width(), 7);

    let fresh = plant_dataframe(&season, "fresh-candy-maceta").unwrap();
    assert_eq!(fresh.height(), season.events_for_plant("fresh-candy-maceta").count());
    assert!(fresh.height() < df.height());

    let text = render_text_table(&fresh);
    assert!(text.starts_with('+'));
    assert!(text.contains("| semana |"));
    assert!(text.contains("Lavado"));
}
