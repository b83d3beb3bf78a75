//! Center of array from the configuration-management cache
//!
//! The array's configuration-management summary ("cminfo") is published as
//! a Redis hash. Only the three center of array fields are read here.

use crate::algorithms::CoordinateValidator;
use crate::core::ArrayCenter;
use crate::reference::{ReferenceError, ReferenceResult, ReferenceSource};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hash fields holding latitude (deg), longitude (deg) and altitude (m)
pub const COFA_FIELDS: [&str; 3] = ["cofa_lat", "cofa_lon", "cofa_alt"];

/// Connection settings for the cminfo hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CminfoSettings {
    /// Redis connection URL
    pub url: String,
    /// Hash key
    pub key: String,
    /// Connect and reply timeout (milliseconds)
    pub timeout_ms: u64,
}

impl Default for CminfoSettings {
    fn default() -> Self {
        Self {
            url: "redis://redishost:6379".to_string(),
            key: "cminfo".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Reference source backed by the cminfo hash
#[derive(Debug, Clone)]
pub struct CminfoReference {
    settings: CminfoSettings,
}

impl CminfoReference {
    pub fn new(settings: CminfoSettings) -> Self {
        Self { settings }
    }

    fn fetch_fields(&self) -> ReferenceResult<Vec<Option<String>>> {
        let timeout = Duration::from_millis(self.settings.timeout_ms);
        let client = redis::Client::open(self.settings.url.as_str())?;
        let mut connection = client.get_connection_with_timeout(timeout)?;
        connection.set_read_timeout(Some(timeout))?;
        connection.set_write_timeout(Some(timeout))?;
        debug!("connected to {}", self.settings.url);

        let values = redis::cmd("HMGET")
            .arg(&self.settings.key)
            .arg(&COFA_FIELDS[..])
            .query::<Vec<Option<String>>>(&mut connection)?;
        Ok(values)
    }
}

impl ReferenceSource for CminfoReference {
    fn array_center(&mut self) -> ReferenceResult<ArrayCenter> {
        let values = self.fetch_fields()?;
        let cofa = parse_cofa_fields(&self.settings.key, &values)?;
        info!(
            "center of array from {}: lat {} lon {} alt {}",
            self.settings.key, cofa.latitude, cofa.longitude, cofa.altitude
        );
        Ok(cofa)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.settings.key, self.settings.url)
    }
}

/// Decode the HMGET reply for [`COFA_FIELDS`]
pub fn parse_cofa_fields(key: &str, values: &[Option<String>]) -> ReferenceResult<ArrayCenter> {
    let mut parsed = [0.0_f64; 3];

    for (i, &field) in COFA_FIELDS.iter().enumerate() {
        let raw = values
            .get(i)
            .and_then(|v| v.as_deref())
            .ok_or_else(|| ReferenceError::MissingField {
                key: key.to_string(),
                field,
            })?;

        parsed[i] = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ReferenceError::InvalidValue {
                field,
                value: raw.to_string(),
            })?;
    }

    let cofa = ArrayCenter::new(parsed[0], parsed[1], parsed[2]);
    CoordinateValidator::validate_array_center(&cofa)?;
    Ok(cofa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_parse_cofa_fields() {
        let values = reply(&[Some("-30.72152612068957"), Some("21.428303826863015"), Some(" 1051.69 ")]);
        let cofa = parse_cofa_fields("cminfo", &values).unwrap();

        assert_eq!(cofa.latitude, -30.72152612068957);
        assert_eq!(cofa.longitude, 21.428303826863015);
        assert_eq!(cofa.altitude, 1051.69);
    }

    #[test]
    fn test_missing_field() {
        let values = reply(&[Some("-30.7"), None, Some("1051.69")]);

        match parse_cofa_fields("cminfo", &values) {
            Err(ReferenceError::MissingField { key, field }) => {
                assert_eq!(key, "cminfo");
                assert_eq!(field, "cofa_lon");
            },
            other => panic!("unexpected result: {:?}", other),
        }

        // short reply
        let values = reply(&[Some("-30.7")]);
        assert!(matches!(
            parse_cofa_fields("cminfo", &values),
            Err(ReferenceError::MissingField { field: "cofa_lon", .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        let values = reply(&[Some("-30.7"), Some("21.4"), Some("high")]);
        assert!(matches!(
            parse_cofa_fields("cminfo", &values),
            Err(ReferenceError::InvalidValue { field: "cofa_alt", .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let values = reply(&[Some("-30.7"), Some("381.4"), Some("1051.69")]);
        assert!(matches!(parse_cofa_fields("cminfo", &values), Err(ReferenceError::OutOfRange(_))));
    }

    #[test]
    fn test_stalled_server_times_out() {
        use std::net::TcpListener;
        use std::time::Instant;

        // accepts connections into the backlog but never replies
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut reference = CminfoReference::new(CminfoSettings {
            url: format!("redis://127.0.0.1:{}", port),
            timeout_ms: 200,
            ..CminfoSettings::default()
        });

        let start = Instant::now();
        let result = reference.array_center();
        assert!(matches!(result, Err(ReferenceError::Cache(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[test]
    fn test_default_settings() {
        let settings = CminfoSettings::default();
        assert_eq!(settings.key, "cminfo");
        assert_eq!(settings.url, "redis://redishost:6379");

        let reference = CminfoReference::new(settings);
        assert_eq!(reference.describe(), "cminfo (redis://redishost:6379)");
    }
}
