//! Coordinate system transformations for surveyed antennas
//!
//! The conversion chain applied to every antenna:
//! - UTM grid (easting, northing) to WGS84 geodetic, inverse Krüger series
//! - WGS84 geodetic to ECEF
//! - ECEF to East-North-Up about the center of array
//!
//! The transverse Mercator series is carried to fourth order in the third
//! flattening (Karney 2011), which keeps the round trip well under a
//! millimeter inside a zone.

use crate::core::{
    AntennaSurvey, ArrayCenter, Ecef, Enu, Geodetic, UtmZone, UTM_FALSE_EASTING, UTM_SCALE_FACTOR,
    WGS84_ECCENTRICITY_SQUARED, WGS84_SEMI_MAJOR_AXIS, WGS84_THIRD_FLATTENING,
};
use map_3d::{deg2rad, geodetic2ecef, Ellipsoid};
use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

/// Coordinate conversion and validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("invalid UTM zone \"{0}\": expected a zone number 1-60 followed by a latitude band")]
    InvalidZone(String),
    #[error("invalid UTM easting {0:.3} m: outside 100000-900000 m")]
    EastingOutOfRange(f64),
    #[error("invalid UTM northing {0:.3} m: outside 0-10000000 m")]
    NorthingOutOfRange(f64),
    #[error("invalid latitude {0}: must be between -90 and 90 degrees")]
    LatitudeOutOfRange(f64),
    #[error("invalid longitude {0}: must be between -180 and 180 degrees")]
    LongitudeOutOfRange(f64),
    #[error("invalid altitude {0}: must be a finite height in meters")]
    InvalidAltitude(f64),
    #[error("invalid center of array \"{0}\": expected LAT,LON,ALT")]
    InvalidArrayCenter(String),
    #[error("invalid output frame \"{0}\": expected enu or ecef")]
    InvalidFrame(String),
}

/// Krüger series coefficients for the transverse Mercator projection
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Rectifying radius (meters)
    rectifying_radius: f64,
    /// First eccentricity
    eccentricity: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl TransverseMercator {
    /// Series for the WGS84 ellipsoid
    pub fn wgs84() -> Self {
        let n = WGS84_THIRD_FLATTENING;
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        Self {
            rectifying_radius: WGS84_SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0),
            eccentricity: WGS84_ECCENTRICITY_SQUARED.sqrt(),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161280.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161280.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }

    /// Project geodetic latitude/longitude (degrees) to (easting, northing)
    pub fn forward(&self, latitude: f64, longitude: f64, zone: &UtmZone) -> (f64, f64) {
        let k0a = UTM_SCALE_FACTOR * self.rectifying_radius;
        let phi = latitude.to_radians();
        let dlambda = (longitude - zone.central_meridian()).to_radians();

        // conformal latitude
        let e = self.eccentricity;
        let t = (phi.sin().atanh() - e * (e * phi.sin()).atanh()).sinh();

        let xi_p = t.atan2(dlambda.cos());
        let eta_p = (dlambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        (
            UTM_FALSE_EASTING + k0a * eta,
            zone.false_northing() + k0a * xi,
        )
    }

    /// Inverse projection: (easting, northing) to latitude/longitude (degrees)
    pub fn inverse(&self, easting: f64, northing: f64, zone: &UtmZone) -> (f64, f64) {
        let k0a = UTM_SCALE_FACTOR * self.rectifying_radius;
        let xi = (northing - zone.false_northing()) / k0a;
        let eta = (easting - UTM_FALSE_EASTING) / k0a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, delta) in self.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += delta * (k * chi).sin();
        }
        let dlambda = eta_p.sinh().atan2(xi_p.cos());

        (phi.to_degrees(), zone.central_meridian() + dlambda.to_degrees())
    }
}

/// Convert UTM grid coordinates to WGS84 geodetic
pub fn utm_to_geodetic(easting: f64, northing: f64, elevation: f64, zone: &UtmZone) -> Result<Geodetic, CoordinateError> {
    CoordinateValidator::validate_utm(easting, northing)?;
    let (latitude, longitude) = TransverseMercator::wgs84().inverse(easting, northing, zone);
    Ok(Geodetic::new(latitude, longitude, elevation))
}

/// Convert WGS84 geodetic coordinates to UTM (easting, northing)
pub fn geodetic_to_utm(geodetic: &Geodetic, zone: &UtmZone) -> Result<(f64, f64), CoordinateError> {
    CoordinateValidator::validate_geodetic(geodetic.latitude, geodetic.longitude)?;
    Ok(TransverseMercator::wgs84().forward(geodetic.latitude, geodetic.longitude, zone))
}

/// Convert WGS84 geodetic coordinates to ECEF
pub fn geodetic_to_ecef(geodetic: &Geodetic) -> Ecef {
    let (x, y, z) = geodetic2ecef(
        deg2rad(geodetic.latitude),
        deg2rad(geodetic.longitude),
        geodetic.altitude,
        Ellipsoid::WGS84,
    );
    Ecef::new(x, y, z)
}

/// Rotation from ECEF deltas into the local tangent plane at (lat, lon) in degrees
pub fn enu_rotation(latitude: f64, longitude: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();

    Matrix3::new(
        -sin_lon, cos_lon, 0.0,
        -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
        cos_lat * cos_lon, cos_lat * sin_lon, sin_lat,
    )
}

/// Convert an ECEF position to ENU relative to the center of array
pub fn ecef_to_enu(ecef: &Ecef, cofa: &ArrayCenter) -> Enu {
    let origin = geodetic_to_ecef(&cofa.geodetic());
    let rotation = enu_rotation(cofa.latitude, cofa.longitude);
    Enu::from(rotation * (ecef.0 - origin.0))
}

/// Full UTM -> geodetic -> ECEF -> ENU chain for a fixed zone and array center
#[derive(Debug, Clone)]
pub struct AntennaTransform {
    zone: UtmZone,
    projection: TransverseMercator,
    origin: Vector3<f64>,
    rotation: Matrix3<f64>,
}

impl AntennaTransform {
    pub fn new(zone: UtmZone, cofa: ArrayCenter) -> Result<Self, CoordinateError> {
        CoordinateValidator::validate_array_center(&cofa)?;

        Ok(Self {
            zone,
            projection: TransverseMercator::wgs84(),
            origin: geodetic_to_ecef(&cofa.geodetic()).0,
            rotation: enu_rotation(cofa.latitude, cofa.longitude),
        })
    }

    pub fn to_geodetic(&self, survey: &AntennaSurvey) -> Result<Geodetic, CoordinateError> {
        CoordinateValidator::validate_utm(survey.easting, survey.northing)?;
        let (latitude, longitude) = self.projection.inverse(survey.easting, survey.northing, &self.zone);
        Ok(Geodetic::new(latitude, longitude, survey.elevation))
    }

    pub fn to_ecef(&self, survey: &AntennaSurvey) -> Result<Ecef, CoordinateError> {
        Ok(geodetic_to_ecef(&self.to_geodetic(survey)?))
    }

    pub fn ecef_to_enu(&self, ecef: &Ecef) -> Enu {
        Enu::from(self.rotation * (ecef.0 - self.origin))
    }

    pub fn to_enu(&self, survey: &AntennaSurvey) -> Result<Enu, CoordinateError> {
        Ok(self.ecef_to_enu(&self.to_ecef(survey)?))
    }
}

/// Range checks on grid and geodetic coordinates
pub struct CoordinateValidator;

impl CoordinateValidator {
    pub fn validate_geodetic(latitude: f64, longitude: f64) -> Result<(), CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(())
    }

    /// Latitude/longitude in range and a finite altitude
    pub fn validate_array_center(cofa: &ArrayCenter) -> Result<(), CoordinateError> {
        Self::validate_geodetic(cofa.latitude, cofa.longitude)?;
        if !cofa.altitude.is_finite() {
            return Err(CoordinateError::InvalidAltitude(cofa.altitude));
        }
        Ok(())
    }

    pub fn validate_utm(easting: f64, northing: f64) -> Result<(), CoordinateError> {
        if !(100000.0..=900000.0).contains(&easting) {
            return Err(CoordinateError::EastingOutOfRange(easting));
        }
        if !(0.0..=10000000.0).contains(&northing) {
            return Err(CoordinateError::NorthingOutOfRange(northing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_3d::ecef2enu;

    fn site() -> ArrayCenter {
        ArrayCenter::new(-30.72152612068957, 21.428303826863015, 1051.6900000218302)
    }

    fn zone() -> UtmZone {
        "34J".parse().unwrap()
    }

    #[test]
    fn test_central_meridian_on_equator() {
        let zone: UtmZone = "31N".parse().unwrap();
        let (easting, northing) = TransverseMercator::wgs84().forward(0.0, 3.0, &zone);

        assert!((easting - 500000.0).abs() < 1e-6);
        assert!(northing.abs() < 1e-6);
    }

    #[test]
    fn test_meridian_arc_length() {
        // Meridian arc from the equator to 45N on WGS84 is 4984944.378 m
        let zone: UtmZone = "31T".parse().unwrap();
        let (easting, northing) = TransverseMercator::wgs84().forward(45.0, 3.0, &zone);

        assert!((easting - 500000.0).abs() < 1e-6);
        assert!((northing - 0.9996 * 4984944.378).abs() < 0.01);
    }

    #[test]
    fn test_southern_false_northing() {
        let (easting, northing) = TransverseMercator::wgs84().forward(-45.0, 21.0, &zone());

        assert!((easting - 500000.0).abs() < 1e-6);
        assert!((northing - (10000000.0 - 0.9996 * 4984944.378)).abs() < 0.01);
    }

    #[test]
    fn test_utm_round_trip_within_zone() {
        let projection = TransverseMercator::wgs84();
        let zone = zone();

        for &(lat, lon) in &[(-30.72, 21.43), (-25.0, 18.5), (-33.9, 23.9), (-0.5, 20.0)] {
            let (easting, northing) = projection.forward(lat, lon, &zone);
            let (lat_back, lon_back) = projection.inverse(easting, northing, &zone);

            // 1e-9 degrees is about 0.1 mm
            assert!((lat_back - lat).abs() < 1e-9, "lat {} -> {}", lat, lat_back);
            assert!((lon_back - lon).abs() < 1e-9, "lon {} -> {}", lon, lon_back);
        }
    }

    #[test]
    fn test_inverse_matches_survey_fixture() {
        // HH0 of the HERA survey, reference values from an independent
        // (Snyder footpoint latitude) inverse
        let geodetic = utm_to_geodetic(540901.6, 6601070.4, 1052.6, &zone()).unwrap();

        assert!((geodetic.latitude + 30.7225277312).abs() < 1e-8, "lat {}", geodetic.latitude);
        assert!((geodetic.longitude - 21.4272073867).abs() < 1e-8, "lon {}", geodetic.longitude);
        assert_eq!(geodetic.altitude, 1052.6);
    }

    #[test]
    fn test_utm_to_geodetic_validation() {
        let zone = zone();

        assert!(utm_to_geodetic(50000.0, 6601000.0, 0.0, &zone).is_err());
        assert!(utm_to_geodetic(540000.0, -1.0, 0.0, &zone).is_err());
        assert!(utm_to_geodetic(540000.0, 6601000.0, 0.0, &zone).is_ok());
        assert!(geodetic_to_utm(&Geodetic::new(91.0, 21.0, 0.0), &zone).is_err());
    }

    #[test]
    fn test_geodetic_to_ecef_equator() {
        let ecef = geodetic_to_ecef(&Geodetic::new(0.0, 0.0, 0.0));

        assert!((ecef.0.x - WGS84_SEMI_MAJOR_AXIS).abs() < 1e-6);
        assert!(ecef.0.y.abs() < 1e-6);
        assert!(ecef.0.z.abs() < 1e-6);
    }

    #[test]
    fn test_enu_origin_is_zero() {
        let cofa = site();
        let ecef = geodetic_to_ecef(&cofa.geodetic());
        let enu = ecef_to_enu(&ecef, &cofa);

        assert!(enu.east.abs() < 1e-6);
        assert!(enu.north.abs() < 1e-6);
        assert!(enu.up.abs() < 1e-6);
    }

    #[test]
    fn test_enu_axes() {
        let cofa = site();

        // straight up
        let above = geodetic_to_ecef(&Geodetic::new(cofa.latitude, cofa.longitude, cofa.altitude + 10.0));
        let enu = ecef_to_enu(&above, &cofa);
        assert!(enu.east.abs() < 1e-6);
        assert!(enu.north.abs() < 1e-6);
        assert!((enu.up - 10.0).abs() < 1e-6);

        // slightly north and east
        let offset = geodetic_to_ecef(&Geodetic::new(cofa.latitude + 0.001, cofa.longitude + 0.001, cofa.altitude));
        let enu = ecef_to_enu(&offset, &cofa);
        assert!((enu.north - 110.9).abs() < 1.0);
        assert!((enu.east - 95.8).abs() < 1.0);
        assert!(enu.up < 0.0);
    }

    #[test]
    fn test_enu_matches_map_3d() {
        let cofa = site();
        let transform = AntennaTransform::new(zone(), cofa).unwrap();

        let survey = AntennaSurvey {
            name: "HH0".to_string(),
            easting: 540901.6,
            northing: 6601070.4,
            elevation: 1052.6,
        };
        let ecef = transform.to_ecef(&survey).unwrap();
        let enu = transform.ecef_to_enu(&ecef);

        let (e, n, u) = ecef2enu(
            ecef.0.x,
            ecef.0.y,
            ecef.0.z,
            deg2rad(cofa.latitude),
            deg2rad(cofa.longitude),
            cofa.altitude,
            Ellipsoid::WGS84,
        );

        assert!((enu.east - e).abs() < 1e-4);
        assert!((enu.north - n).abs() < 1e-4);
        assert!((enu.up - u).abs() < 1e-4);

        // the standalone helper agrees with the cached transform
        let standalone = ecef_to_enu(&ecef, &cofa);
        assert!((standalone.east - enu.east).abs() < 1e-9);
        assert!((standalone.north - enu.north).abs() < 1e-9);
        assert!((standalone.up - enu.up).abs() < 1e-9);
    }

    #[test]
    fn test_antenna_near_array_center() {
        let cofa = site();
        let zone = zone();
        let transform = AntennaTransform::new(zone, cofa).unwrap();

        // place an antenna exactly on the cofa grid position
        let (easting, northing) = geodetic_to_utm(&cofa.geodetic(), &zone).unwrap();
        let survey = AntennaSurvey {
            name: "center".to_string(),
            easting,
            northing,
            elevation: cofa.altitude,
        };

        let enu = transform.to_enu(&survey).unwrap();
        assert!(enu.horizontal_distance() < 1e-3);
        assert!(enu.up.abs() < 1e-3);

        // 100 m grid east lands roughly 100 m east
        let east = AntennaSurvey { easting: easting + 100.0, ..survey };
        let enu = transform.to_enu(&east).unwrap();
        assert!((enu.horizontal_distance() - 100.0).abs() < 0.1);
        assert!(enu.east > 99.0);
    }

    #[test]
    fn test_transform_rejects_invalid_center() {
        assert!(AntennaTransform::new(zone(), ArrayCenter::new(95.0, 21.0, 0.0)).is_err());
        assert!(AntennaTransform::new(zone(), ArrayCenter::new(-30.0, 200.0, 0.0)).is_err());
        assert!(matches!(
            AntennaTransform::new(zone(), ArrayCenter::new(-30.72, 21.43, f64::NAN)),
            Err(CoordinateError::InvalidAltitude(_))
        ));
        assert!(matches!(
            AntennaTransform::new(zone(), ArrayCenter::new(-30.72, 21.43, f64::INFINITY)),
            Err(CoordinateError::InvalidAltitude(_))
        ));
    }
}
