use airdash::config::AirDashConfig;
use airdash::dashboard::{combined_timeseries, fetch_cities};
use airdash::models::CityRegistry;
use airdash::{AirNowClient, NoaaClient, OpenAqClient};
use anyhow::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AirDashConfig::load()?;
    let registry = CityRegistry::with_defaults();

    // Live air quality table across the default cities
    match &config.airnow.api_key {
        Some(api_key) => {
            let airnow = AirNowClient::with_options(
                api_key,
                &config.airnow.base_url,
                config.airnow.distance_miles,
            )?;
            match fetch_cities(&airnow, registry.cities()) {
                Ok(report) => {
                    println!(
                        "Current AQI ({}/{} cities):",
                        report.cities_succeeded,
                        registry.len()
                    );
                    for record in &report.records {
                        println!(
                            "  {:<14} {:<8} AQI {:>4}  {}",
                            record.city, record.parameter, record.aqi, record.category
                        );
                    }
                    for warning in &report.warnings {
                        println!("  ! {}: {}", warning.subject, warning.message);
                    }
                }
                Err(e) => println!("Air quality unavailable: {}", e.user_message()),
            }
        }
        None => println!("Air quality skipped: no AirNow API key configured."),
    }

    // Latest weather for the first city; failure degrades to "unavailable"
    if let Some(city) = registry.cities().first() {
        let contact = config.weather.contact.as_deref().unwrap_or("airdash@example.com");
        let noaa = NoaaClient::with_base_url(contact, &config.weather.base_url)?;
        match noaa.latest_snapshot(&city.location) {
            Ok(snapshot) => println!(
                "Weather in {}: {} / wind {} / humidity {}",
                city.name,
                snapshot.format_temperature(),
                snapshot.format_wind(),
                snapshot
                    .relative_humidity_pct
                    .map_or("n/a".to_string(), |h| format!("{h:.0}%")),
            ),
            Err(e) => {
                warn!("Weather fetch failed: {}", e);
                println!("Weather unavailable for {}.", city.name);
            }
        }
    }

    // Historical series for the first catalogued location, fallback included
    let openaq = OpenAqClient::with_base_url(
        config.openaq.api_key.clone(),
        &config.openaq.country,
        &config.openaq.base_url,
    )?;
    let catalog = openaq.location_catalog()?;
    let Some(location) = catalog.location_names().next().map(str::to_string) else {
        println!("No monitoring locations catalogued.");
        return Ok(());
    };
    let parameters = catalog
        .parameters_for(&location)
        .cloned()
        .unwrap_or_default();

    let series = combined_timeseries(&openaq, &location, &parameters, config.defaults.days)?;
    println!(
        "{}-day series for '{}' ({} points{}):",
        config.defaults.days,
        location,
        series.points.len(),
        if series.used_fallback {
            ", fallback data"
        } else {
            ""
        }
    );
    for point in series.points.iter().take(10) {
        println!(
            "  {}  {:<6} {:>8.1} {}",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.parameter,
            point.value,
            point.unit
        );
    }
    for warning in &series.skipped {
        println!("  ! {}: {}", warning.subject, warning.message);
    }

    Ok(())
}
