//! Center of array reference sources
//!
//! The ENU origin is read from the array's configuration-management cache,
//! or supplied directly for offline runs.

pub mod source;
pub mod cminfo;
pub mod fixed;
pub mod error;

pub use source::ReferenceSource;
pub use cminfo::{CminfoReference, CminfoSettings};
pub use fixed::StaticReference;
pub use error::{ReferenceError, ReferenceResult};
