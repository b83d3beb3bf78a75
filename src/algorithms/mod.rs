//! Coordinate transformation algorithms

pub mod coordinates;

pub use coordinates::{
    ecef_to_enu, geodetic_to_ecef, geodetic_to_utm, utm_to_geodetic, AntennaTransform, CoordinateError,
    CoordinateValidator, TransverseMercator,
};
