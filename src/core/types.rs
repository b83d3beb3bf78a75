//! Core data types for antenna position conversion

use crate::algorithms::CoordinateError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surveyed antenna location in UTM grid coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaSurvey {
    pub name: String,
    /// Easting (meters)
    pub easting: f64,
    /// Northing (meters), including the zone's false northing
    pub northing: f64,
    /// Height above the WGS84 ellipsoid (meters)
    pub elevation: f64,
}

/// UTM zone: longitude zone number plus latitude band letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtmZone {
    number: u8,
    band: char,
}

impl UtmZone {
    /// Latitude bands, south to north. I and O are not used.
    pub const BANDS: &'static str = "CDEFGHJKLMNPQRSTUVWX";

    pub fn new(number: u8, band: char) -> Result<Self, CoordinateError> {
        if !(1..=60).contains(&number) {
            return Err(CoordinateError::InvalidZone(format!("{}{}", number, band)));
        }
        let band = band.to_ascii_uppercase();
        if !Self::BANDS.contains(band) {
            return Err(CoordinateError::InvalidZone(format!("{}{}", number, band)));
        }
        Ok(Self { number, band })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn band(&self) -> char {
        self.band
    }

    /// Bands C through M lie south of the equator
    pub fn is_southern(&self) -> bool {
        self.band < 'N'
    }

    /// False northing to remove before projecting (meters)
    pub fn false_northing(&self) -> f64 {
        if self.is_southern() {
            super::UTM_SOUTHERN_FALSE_NORTHING
        } else {
            0.0
        }
    }

    /// Central meridian of the zone (degrees)
    pub fn central_meridian(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }
}

impl Default for UtmZone {
    fn default() -> Self {
        Self { number: 34, band: 'J' }
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.band)
    }
}

impl FromStr for UtmZone {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let band = s
            .chars()
            .last()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| CoordinateError::InvalidZone(s.to_string()))?;
        let number = s[..s.len() - 1]
            .parse::<u8>()
            .map_err(|_| CoordinateError::InvalidZone(s.to_string()))?;
        Self::new(number, band)
    }
}

impl TryFrom<String> for UtmZone {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UtmZone> for String {
    fn from(zone: UtmZone) -> Self {
        zone.to_string()
    }
}

/// Geodetic position on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Height above the ellipsoid (meters)
    pub altitude: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }
}

/// Earth-centered, Earth-fixed cartesian position (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecef(pub Vector3<f64>);

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }
}

/// Local tangent plane position (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub fn to_array(&self) -> [f64; 3] {
        [self.east, self.north, self.up]
    }

    /// Horizontal distance from the origin (meters)
    pub fn horizontal_distance(&self) -> f64 {
        self.east.hypot(self.north)
    }
}

impl From<Vector3<f64>> for Enu {
    fn from(v: Vector3<f64>) -> Self {
        Self { east: v.x, north: v.y, up: v.z }
    }
}

/// Center of array ("cofa"): origin of the ENU frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrayCenter {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Height above the ellipsoid (meters)
    pub altitude: f64,
}

impl ArrayCenter {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }

    pub fn geodetic(&self) -> Geodetic {
        Geodetic::new(self.latitude, self.longitude, self.altitude)
    }
}

impl FromStr for ArrayCenter {
    type Err = CoordinateError;

    /// Parses `LAT,LON,ALT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|item| item.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CoordinateError::InvalidArrayCenter(s.to_string()))?;
        match values.as_slice() {
            [lat, lon, alt] => Ok(Self::new(*lat, *lon, *alt)),
            _ => Err(CoordinateError::InvalidArrayCenter(s.to_string())),
        }
    }
}

/// Frame written to the output file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFrame {
    #[default]
    Enu,
    Ecef,
}

impl fmt::Display for OutputFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFrame::Enu => write!(f, "ENU"),
            OutputFrame::Ecef => write!(f, "ECEF"),
        }
    }
}

impl FromStr for OutputFrame {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enu" => Ok(OutputFrame::Enu),
            "ecef" => Ok(OutputFrame::Ecef),
            other => Err(CoordinateError::InvalidFrame(other.to_string())),
        }
    }
}
