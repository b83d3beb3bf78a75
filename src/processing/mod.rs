//! Survey reading and the per-antenna conversion loop

pub mod survey;
pub mod pipeline;

pub use survey::{AntennaList, SurveyError};
pub use pipeline::{compute_enu_positions, compute_positions, AntennaPositions, PipelineError};
