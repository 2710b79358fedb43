use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failure to load a coefficient table.
///
/// Loading is fatal for the process: without a table no field can be evaluated.
/// The error is `Clone` so that a cached failure can be handed out to every caller
/// of [`crate::coefficients::CoefficientStore::table`].
#[derive(Error, Debug, Clone)]
pub enum ModelLoadError {
    #[error("Could not read coefficient file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
    #[error("Coefficient source is empty; expected a header line")]
    MissingHeader,
    #[error("Malformed coefficient record on line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("Order {order} exceeds degree {degree} on line {line}")]
    OrderExceedsDegree {
        line: usize,
        degree: usize,
        order: usize,
    },
    #[error("Degree {degree} on line {line} is outside the supported range 1..={max_degree}")]
    DegreeOutOfRange {
        line: usize,
        degree: usize,
        max_degree: usize,
    },
    #[error("Coefficient source contains no coefficients")]
    EmptyTable,
}

/// A query that cannot be evaluated.
///
/// Returned per call, the shared coefficient table is never affected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidQueryError {
    #[error("Latitude must be a finite value in [-90, 90] degrees, got {0}")]
    Latitude(f64),
    #[error("Longitude must be finite, got {0}")]
    Longitude(f64),
    #[error("Height must be finite and place the point away from the Earth's centre, got {0} m")]
    Height(f64),
    #[error("Could not interpret '{0}' as a date")]
    Date(String),
}

/// Error type for the geomagnetic model.
#[derive(Error, Debug)]
pub enum GeomagError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, GeomagError>`.
pub type GeomagResult<T> = Result<T, GeomagError>;
