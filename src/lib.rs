//! Geomagnetic main-field evaluation and survey station correction.
//!
//! Re-exports [`geomag_core`] and [`geomag_survey`]. Python bindings are
//! available behind the `python` feature.

pub use geomag_core;
pub use geomag_survey;

pub use geomag_core::{
    CoefficientStore, CoefficientTable, FieldEvaluator, FieldQuery, FieldResult, GeomagError,
    GeomagResult, InvalidQueryError, ModelCoefficient, ModelLoadError,
};

#[cfg(feature = "python")]
mod python;
