use metoffice_historic::{HistoricDataError, HistoricStations};
use std::fmt::Display;

fn opt(value: Option<impl Display>) -> String {
    value.map_or_else(|| "---".to_string(), |v| v.to_string())
}

fn main() -> Result<(), HistoricDataError> {
    // Set RUST_LOG=info (or debug) to see per-fetch messages.
    env_logger::init();

    let client = HistoricStations::new();

    let dataset = client.get_dataset("ballypatrick")?;
    println!(
        "{}: lat = {} lon = {}",
        dataset.station,
        opt(dataset.latitude),
        opt(dataset.longitude)
    );
    println!(
        "{:>6} {:>4} {:>7} {:>7} {:>5} {:>8} {:>7}",
        "yyyy", "mm", "tmax", "tmin", "af", "rain", "sun"
    );
    for record in &dataset.records {
        println!(
            "{:>6} {:>4} {:>7} {:>7} {:>5} {:>8} {:>7}",
            record.year,
            record.month,
            opt(record.max_temp_c),
            opt(record.min_temp_c),
            opt(record.air_frost_days),
            opt(record.rainfall_mm),
            opt(record.sunshine_hours)
        );
    }

    client.load_all()?;

    Ok(())
}
