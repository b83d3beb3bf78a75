//! Per-antenna conversion loop

use crate::algorithms::{geodetic_to_ecef, AntennaTransform, CoordinateError};
use crate::core::{ArrayCenter, OutputFrame, UtmZone};
use crate::processing::survey::AntennaList;
use log::{debug, info};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Conversion failure for a single antenna
#[derive(Debug, Error)]
#[error("antenna {antenna}: {source}")]
pub struct PipelineError {
    pub antenna: String,
    #[source]
    pub source: CoordinateError,
}

/// Converted antenna positions in survey order.
/// Serializes as a JSON object `{ "name": [x, y, z], ... }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntennaPositions {
    frame: OutputFrame,
    positions: Vec<(String, [f64; 3])>,
}

impl AntennaPositions {
    pub fn new(frame: OutputFrame) -> Self {
        Self {
            frame,
            positions: Vec::new(),
        }
    }

    pub fn frame(&self) -> OutputFrame {
        self.frame
    }

    pub fn push(&mut self, name: String, position: [f64; 3]) {
        self.positions.push((name, position));
    }

    pub fn get(&self, name: &str) -> Option<&[f64; 3]> {
        self.positions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64; 3])> {
        self.positions.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Serialize for AntennaPositions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.positions.len()))?;
        for (name, position) in &self.positions {
            map.serialize_entry(name, position)?;
        }
        map.end()
    }
}

/// Apply the UTM -> geodetic -> ECEF (-> ENU) chain to every antenna
pub fn compute_positions(
    antennas: &AntennaList,
    transform: &AntennaTransform,
    frame: OutputFrame,
) -> Result<AntennaPositions, PipelineError> {
    let mut positions = AntennaPositions::new(frame);

    for survey in antennas {
        let wrap = |source| PipelineError {
            antenna: survey.name.clone(),
            source,
        };

        let geodetic = transform.to_geodetic(survey).map_err(wrap)?;
        debug!(
            "{}: lat {:.9} lon {:.9} alt {:.3}",
            survey.name, geodetic.latitude, geodetic.longitude, geodetic.altitude
        );

        let ecef = geodetic_to_ecef(&geodetic);
        let position = match frame {
            OutputFrame::Ecef => ecef.to_array(),
            OutputFrame::Enu => transform.ecef_to_enu(&ecef).to_array(),
        };
        positions.push(survey.name.clone(), position);
    }

    info!("converted {} antennas to {}", positions.len(), frame);
    Ok(positions)
}

/// Convenience wrapper building the transform from zone and center of array
pub fn compute_enu_positions(
    antennas: &AntennaList,
    zone: UtmZone,
    cofa: ArrayCenter,
) -> Result<AntennaPositions, crate::Error> {
    let transform = AntennaTransform::new(zone, cofa)?;
    Ok(compute_positions(antennas, &transform, OutputFrame::Enu)?)
}
