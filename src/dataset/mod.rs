pub mod error;
pub mod loader;
pub mod store;

pub use error::DatasetError;
pub use loader::DatasetLoader;
pub use store::{ClimateStore, TempStats, TemperatureObservation};
