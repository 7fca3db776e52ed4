use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use crop_calendar::table::{plant_dataframe, render_text_table, season_dataframe, weeks_dataframe};
use crop_calendar::{Plan, RuleMode, Season, save_season_to_csv, save_season_to_json};
use std::io::{self, Write};

fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the season (respects filter)\n  week <n>                           Show week n, counting from 1 (bucket index n-1)\n  today [YYYY-MM-DD]                 Show the week and wash/harvest windows for a date\n  next [YYYY-MM-DD[THH:MM]]          Next fertilization from now or from a date\n  event <id>                         Show the reminder text of an event\n  mode <primary|alternate>           Switch rule mode\n  filter <plant-id|all>              Restrict 'show' to one plant\n  plants                             List plants and wash windows\n  phases                             List phases\n  config show                        Show season configuration\n  config load <json_path>            Load a plan file\n  export <json|csv> <path>           Write the season to disk\n  quit|exit                          Exit"
    );
}

fn print_table(df: polars::prelude::PolarsResult<polars::prelude::DataFrame>) {
    match df {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error building table: {}", e),
    }
}

fn print_season(season: &Season, filter: Option<&str>) {
    println!("Season ({})", season.summary().to_cli_summary());
    match filter {
        Some(plant) => print_table(plant_dataframe(season, plant)),
        None => print_table(season_dataframe(season)),
    }
}

fn print_config(plan: &Plan, mode: RuleMode, filter: Option<&str>) {
    println!("Season start       : {}", plan.season.start);
    println!("Season end         : {}", plan.season.end);
    println!("Event time         : {}", plan.season.event_time.format("%H:%M"));
    println!("Time zone          : {}", plan.season.time_zone);
    println!("Rule mode          : {}", mode);
    println!("Plant filter       : {}", filter.unwrap_or("all"));
}

fn print_plants(plan: &Plan) {
    for plant in plan.varieties.plants() {
        let ph = plant
            .soil_ph
            .map(|ph| format!("pH {}-{}", ph.min, ph.max))
            .unwrap_or_default();
        println!(
            "  {:<26} {:<18} {:<7} {:<12} {}",
            plant.id, plant.name, plant.method, plant.bank, ph
        );
    }
    for window in plan.varieties.wash_windows() {
        println!(
            "  wash {:<20} lavado {}  cosecha {} -> {}",
            window.group, window.washing_date, window.harvest_start, window.harvest_end
        );
    }
}

fn print_phases(plan: &Plan) {
    for phase in plan.phases.phases() {
        let products = if phase.fertilization.is_empty() {
            "-".to_string()
        } else {
            phase.fertilization.products.join(", ")
        };
        let harvest = if plan.phases.is_harvest(phase) { " [cosecha]" } else { "" };
        println!(
            "  {:<16} weeks {:>2}-{:<2} maceta {:<9} suelo {:<9} {}{}",
            phase.id,
            phase.start_week,
            phase.end_week,
            phase.irrigation.pot.to_string(),
            phase.irrigation.ground.to_string(),
            products,
            harvest
        );
    }
}

fn main() {
    env_logger::init();

    let mut plan = match Plan::from_env() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };
    let mut mode = plan.season.mode;
    let mut season = plan.build_mode(mode);
    let mut filter: Option<String> = None;

    println!("Crop Calendar (CLI) - type 'help' for commands\n");
    println!("Season ({})", season.summary().to_cli_summary());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_season(&season, filter.as_deref()),
            "week" => match parts.next().map(str::parse::<u32>) {
                Some(Ok(n)) if n >= 1 => match season.week(n - 1) {
                    Some(week) => {
                        println!("Semana {} ({}) fase {}", n, week.range_label(), week.phase_id);
                        if let Some(reason) = week.fallback {
                            println!("Fallback phase: {}", reason);
                        }
                        print_table(weeks_dataframe(std::slice::from_ref(week)));
                    }
                    None => println!("Week {} is outside the season.", n),
                },
                Some(_) => println!("Invalid week number (weeks count from 1)"),
                None => println!("Usage: week <n>"),
            },
            "today" => {
                let date = match parts.next() {
                    Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                        Ok(d) => d,
                        Err(_) => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                match season.week_containing(date) {
                    Some(week) => {
                        println!("Semana {} ({})", week.index + 1, week.range_label());
                        print_table(weeks_dataframe(std::slice::from_ref(week)));
                    }
                    None => println!("{} is outside the season.", date),
                }
                for window in plan.varieties.washing_on(date) {
                    println!("Lavado: {} until {}", window.group, window.harvest_start);
                }
                for window in plan.varieties.harvesting_on(date) {
                    println!("Cosecha: {} until {}", window.group, window.harvest_end);
                }
            }
            "next" => {
                let reference = match parts.next() {
                    Some(s) => match parse_reference(s) {
                        Some(r) => r,
                        None => {
                            println!("Invalid date (YYYY-MM-DD or YYYY-MM-DDTHH:MM)");
                            continue;
                        }
                    },
                    None => Local::now().naive_local(),
                };
                match season.find_next_fertilization(reference) {
                    Some(event) => println!("Next fertilization [{}]\n{}", event.id, event),
                    None => println!("No upcoming fertilization."),
                }
            }
            "event" => match parts.next() {
                Some(id) => match season.find_event(id) {
                    Some(event) => println!("{}", event),
                    None => println!("Event {} not found.", id),
                },
                None => println!("Usage: event <id>"),
            },
            "mode" => match parts.next().map(str::parse::<RuleMode>) {
                Some(Ok(new_mode)) => {
                    mode = new_mode;
                    season = plan.build_mode(mode);
                    println!("Mode set to {} ({}).", mode, season.summary().to_cli_summary());
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Usage: mode <primary|alternate>"),
            },
            "filter" => match parts.next() {
                Some("all") => {
                    filter = None;
                    println!("Filter cleared.");
                }
                Some(id) => {
                    if plan.varieties.find(id).is_some() {
                        filter = Some(id.to_string());
                        println!("Filter set to {}.", id);
                    } else {
                        println!("Unknown plant '{}'. Use 'plants' to list options.", id);
                    }
                }
                None => println!("Usage: filter <plant-id|all>"),
            },
            "plants" => print_plants(&plan),
            "phases" => print_phases(&plan),
            "config" => match parts.next() {
                Some("show") | None => print_config(&plan, mode, filter.as_deref()),
                Some("load") => match parts.next() {
                    Some(path) => match Plan::from_json_file(path) {
                        Ok(loaded) => {
                            plan = loaded;
                            mode = plan.season.mode;
                            filter = None;
                            season = plan.build_mode(mode);
                            println!("Plan loaded from {}.", path);
                            print_config(&plan, mode, None);
                        }
                        Err(e) => println!("Error loading plan: {}", e),
                    },
                    None => println!("Usage: config load <json_path>"),
                },
                Some(other) => {
                    println!("Unknown config command '{}'.", other);
                    println!("Usage: config show|load <json_path>");
                }
            },
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                let result = match (fmt, path) {
                    (Some("json"), Some(path)) => save_season_to_json(&season, path),
                    (Some("csv"), Some(path)) => save_season_to_csv(&season, path),
                    _ => {
                        println!("Usage: export <json|csv> <path>");
                        continue;
                    }
                };
                match result {
                    Ok(_) => println!("Season exported to {}.", path.unwrap_or_default()),
                    Err(e) => println!("Error exporting season: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
