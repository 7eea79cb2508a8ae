use bon::Builder;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Station used for the temperature-observation report when the request does
/// not name one. Historically the busiest station in the dataset; supplied
/// externally, never computed here.
pub const DEFAULT_STATION: &str = "USC00519281";

/// Server configuration: where the dataset tables live, where to listen, and
/// which station the trailing-window report defaults to.
#[derive(Debug, Clone, Builder)]
pub struct ServerConfig {
    /// Measurement table (.parquet or .csv).
    pub measurements: PathBuf,

    /// Station table (.parquet or .csv).
    pub stations: PathBuf,

    #[builder(default = SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)))]
    pub bind_addr: SocketAddr,

    #[builder(default = DEFAULT_STATION.to_string())]
    pub default_station: String,
}
