//! Reference source trait

use crate::core::ArrayCenter;
use crate::reference::ReferenceResult;

/// Provider of the center of array used as ENU origin
pub trait ReferenceSource {
    /// Fetch the center of array (degrees, degrees, meters)
    fn array_center(&mut self) -> ReferenceResult<ArrayCenter>;

    /// Short description for log output
    fn describe(&self) -> String;
}
