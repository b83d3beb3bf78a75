//! Core types and constants for antenna position conversion

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
