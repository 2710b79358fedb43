use geomag_core::errors::InvalidQueryError;
use thiserror::Error;

/// Error type for survey processing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("Station {station} is missing {field}")]
    MissingField {
        station: String,
        field: &'static str,
    },
    #[error("Station {station} has a non-finite observed average: {value}")]
    InvalidObservation { station: String, value: f64 },
    #[error("Station {station} could not be evaluated: {source}")]
    InvalidQuery {
        station: String,
        #[source]
        source: InvalidQueryError,
    },
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Convenience type for `Result<T, SurveyError>`.
pub type SurveyResult<T> = Result<T, SurveyError>;
