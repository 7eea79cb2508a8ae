use clap::Parser;
use hawaii_climate_api::{DatasetLoader, ServerConfig, DEFAULT_STATION};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "hawaii-climate-api", version, about = "Serve the Hawaii climate observation dataset over JSON HTTP")]
struct Args {
    /// Path to the measurement table (.parquet or .csv)
    #[arg(long, default_value = "data/measurements.parquet")]
    measurements: PathBuf,

    /// Path to the station table (.parquet or .csv)
    #[arg(long, default_value = "data/stations.parquet")]
    stations: PathBuf,

    /// Address to bind the HTTP server on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Station id used by the temperature-observation report when the
    /// request does not name one
    #[arg(long, default_value = DEFAULT_STATION)]
    station: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::builder()
        .measurements(args.measurements)
        .stations(args.stations)
        .bind_addr(args.bind)
        .default_station(args.station)
        .build();

    let store = DatasetLoader::new(&config.measurements, &config.stations).load()?;
    hawaii_climate_api::serve(store, &config).await?;
    Ok(())
}
