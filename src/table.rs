use crate::calendar::format_date;
use crate::event::{CareEvent, WeekBucket};
use crate::season::Season;
use polars::prelude::*;

/// One row per event: week, date, kind, phase, products, plants, id.
pub fn events_dataframe<'a, I>(rows: I) -> PolarsResult<DataFrame>
where
    I: IntoIterator<Item = (u32, &'a CareEvent)>,
{
    let mut weeks: Vec<u32> = Vec::new();
    let mut dates: Vec<String> = Vec::new();
    let mut kinds: Vec<String> = Vec::new();
    let mut phases: Vec<String> = Vec::new();
    let mut products: Vec<String> = Vec::new();
    let mut plants: Vec<u32> = Vec::new();
    let mut ids: Vec<String> = Vec::new();

    for (week, event) in rows {
        weeks.push(week + 1);
        dates.push(format_date(event.date()));
        kinds.push(event.kind.label().to_string());
        phases.push(event.phase.clone());
        products.push(event.products_summary());
        plants.push(event.plants.len() as u32);
        ids.push(event.id.clone());
    }

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("semana"), weeks).into_column(),
        Series::new(PlSmallStr::from_static("fecha"), dates).into_column(),
        Series::new(PlSmallStr::from_static("tipo"), kinds).into_column(),
        Series::new(PlSmallStr::from_static("fase"), phases).into_column(),
        Series::new(PlSmallStr::from_static("productos"), products).into_column(),
        Series::new(PlSmallStr::from_static("plantas"), plants).into_column(),
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
    ])
}

pub fn weeks_dataframe(weeks: &[WeekBucket]) -> PolarsResult<DataFrame> {
    events_dataframe(
        weeks
            .iter()
            .flat_map(|w| w.events.iter().map(move |e| (w.index, e))),
    )
}

pub fn season_dataframe(season: &Season) -> PolarsResult<DataFrame> {
    weeks_dataframe(season.weeks())
}

/// Events touching `plant_id`.
pub fn plant_dataframe(season: &Season, plant_id: &str) -> PolarsResult<DataFrame> {
    events_dataframe(season.weeks().iter().flat_map(|w| {
        w.events
            .iter()
            .filter(move |e| e.applies_to(plant_id))
            .map(move |e| (w.index, e))
    }))
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Box-drawn text table for terminal output.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, row: &[String]| {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
