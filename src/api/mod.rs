//! Output interfaces

pub mod output;

pub use output::JsonWriter;
