//! Fixed center of array, from configuration or command line

use crate::algorithms::CoordinateValidator;
use crate::core::ArrayCenter;
use crate::reference::{ReferenceResult, ReferenceSource};

/// Reference source returning a known center of array
#[derive(Debug, Clone)]
pub struct StaticReference {
    cofa: ArrayCenter,
}

impl StaticReference {
    pub fn new(cofa: ArrayCenter) -> Self {
        Self { cofa }
    }
}

impl ReferenceSource for StaticReference {
    fn array_center(&mut self) -> ReferenceResult<ArrayCenter> {
        CoordinateValidator::validate_array_center(&self.cofa)?;
        Ok(self.cofa)
    }

    fn describe(&self) -> String {
        format!(
            "static ({}, {}, {})",
            self.cofa.latitude, self.cofa.longitude, self.cofa.altitude
        )
    }
}
