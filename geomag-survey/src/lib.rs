//! Magnetic survey station processing
//!
//! Stations collected in the field carry a position, an elevation, a
//! measurement date and the average of the observed total intensity. This
//! crate evaluates the main-field model for each pending station and derives
//! the residual `observed - model` that is stored back with the station.
//!
//! Persistence is abstracted behind [`repository::StationRepository`].

pub mod errors;
pub mod processor;
pub mod repository;
pub mod station;

pub use errors::{SurveyError, SurveyResult};
pub use processor::{BatchReport, MagnetismProcessor};
pub use repository::{InMemoryStations, StationRepository};
pub use station::{StationCorrection, StationRecord};
