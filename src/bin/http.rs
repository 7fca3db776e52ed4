#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use crop_calendar::{Plan, http_api};

    env_logger::init();

    let addr: SocketAddr = std::env::var("CROP_CALENDAR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let plan = match std::env::var("CROP_CALENDAR_PLAN") {
        Ok(path) if !path.trim().is_empty() => Plan::from_json_file(path.trim())?,
        _ => Plan::from_env()?,
    };
    log::info!(
        "crop-calendar HTTP API listening on http://{addr} (season {}..={}, mode {})",
        plan.season.start,
        plan.season.end,
        plan.season.mode
    );
    http_api::serve(addr, plan).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
