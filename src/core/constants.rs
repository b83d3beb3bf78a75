//! Ellipsoid and projection constants

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6378137.0;

/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 first eccentricity squared
pub const WGS84_ECCENTRICITY_SQUARED: f64 = 2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;

/// WGS84 third flattening, n = f / (2 - f)
pub const WGS84_THIRD_FLATTENING: f64 = WGS84_FLATTENING / (2.0 - WGS84_FLATTENING);

/// UTM central scale factor
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// UTM false easting (meters)
pub const UTM_FALSE_EASTING: f64 = 500000.0;

/// False northing applied to southern latitude bands (meters)
pub const UTM_SOUTHERN_FALSE_NORTHING: f64 = 10000000.0;
