//! Evaluation of spherical-harmonic geomagnetic main-field models such as the
//! World Magnetic Model.
//!
//! The pieces, from the leaves up:
//!
//! - [`coefficients`]: parsing and single-flight caching of the Gauss coefficient table
//! - [`schmidt`]: Schmidt semi-normalization factors
//! - [`legendre`]: associated Legendre functions and their colatitude derivatives
//! - [`coordinates`]: geodetic to geocentric conversion and the local-frame rotation
//! - [`synthesis`]: accumulation of the field in spherical components
//! - [`evaluator`]: the query → field vector entry point
pub mod coefficients;
pub mod config;
pub mod coordinates;
pub mod evaluator;
pub mod legendre;
pub mod parameters;
pub mod schmidt;
pub mod synthesis;
pub mod time;

pub mod errors;

/// Floating point type used throughout the model
pub type FloatValue = f64;

pub use coefficients::{CoefficientStore, CoefficientTable, ModelCoefficient};
pub use errors::{GeomagError, GeomagResult, InvalidQueryError, ModelLoadError};
pub use evaluator::{FieldEvaluator, FieldQuery, FieldResult};
