//! Antenna position conversion
//!
//! Converts surveyed antenna positions from UTM eastings/northings to local
//! East-North-Up coordinates about the center of array, through WGS84
//! geodetic and ECEF coordinates.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod reference;
pub mod utils;
pub mod api;
pub mod error;

pub use error::{Error, Result};

// Re-export commonly used types
pub use crate::core::{AntennaSurvey, ArrayCenter, Ecef, Enu, Geodetic, OutputFrame, UtmZone};
pub use algorithms::{AntennaTransform, CoordinateError, TransverseMercator};
pub use processing::{compute_enu_positions, compute_positions, AntennaList, AntennaPositions};
pub use reference::{CminfoReference, ReferenceSource, StaticReference};
pub use utils::{Config, ReferenceConfig};
pub use api::JsonWriter;

use log::info;

/// Run the full conversion described by `config`: read the survey list,
/// fetch the center of array, convert every antenna and write the output.
pub fn run(config: &Config) -> Result<AntennaPositions> {
    config.validate()?;

    let antennas = AntennaList::from_path(&config.antenna_file)?;
    info!("loaded {} antennas from {}", antennas.len(), config.antenna_file.display());

    let mut source = config.reference.source();
    info!("center of array source: {}", source.describe());
    let cofa = source.array_center()?;

    let transform = AntennaTransform::new(config.utm_zone, cofa)?;
    let positions = compute_positions(&antennas, &transform, config.frame)?;

    let writer = JsonWriter { pretty: config.pretty };
    writer.write_path(&positions, config.output_path())?;
    Ok(positions)
}
