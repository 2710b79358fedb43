//! Station records exchanged with the persistence layer

use geomag_core::FloatValue;
use serde::{Deserialize, Serialize};

/// A field station as stored by the survey application
///
/// Every measured quantity is optional because records are entered
/// incrementally in the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: String,
    /// unit: degrees
    pub latitude: Option<FloatValue>,
    /// unit: degrees
    pub longitude: Option<FloatValue>,
    /// Height above mean sea level, taken as 0 when absent
    /// unit: m
    pub elevation: Option<FloatValue>,
    /// Date of the measurement as entered, e.g. `2025-03-14`
    pub measurement_date: Option<String>,
    /// Average of the observed total intensity readings
    /// unit: nT
    pub observed_average: Option<FloatValue>,
    /// Model total intensity from a previous run, if any
    /// unit: nT
    pub model_total: Option<FloatValue>,
}

impl StationRecord {
    /// Whether the station still needs a model value
    pub fn is_pending(&self) -> bool {
        self.model_total.is_none()
    }
}

/// Model value and residual computed for a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCorrection {
    pub station_id: String,
    /// Model total intensity F
    /// unit: nT
    pub model_total: FloatValue,
    /// Observed average minus the model total intensity
    /// unit: nT
    pub residual: FloatValue,
    /// Identifier of the model that produced `model_total`
    pub model: String,
}
