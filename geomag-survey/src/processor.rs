//! Batch correction of stations against the field model
//!
//! Each pending station is evaluated independently. A station that cannot be
//! evaluated, or whose result cannot be stored, is reported in the
//! [`BatchReport`] and the remaining stations are still processed.

use crate::errors::{SurveyError, SurveyResult};
use crate::repository::StationRepository;
use crate::station::{StationCorrection, StationRecord};
use geomag_core::evaluator::{FieldEvaluator, FieldQuery};
use geomag_core::FloatValue;
use log::{info, warn};
use rayon::prelude::*;
use std::sync::Arc;

/// Outcome of processing a batch of stations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Corrections that were computed (and stored, when run against a repository)
    pub corrections: Vec<StationCorrection>,
    /// Stations that failed, with the reason
    pub failures: Vec<(String, SurveyError)>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.corrections.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Computes model intensities and residuals for survey stations
#[derive(Debug, Clone)]
pub struct MagnetismProcessor {
    evaluator: Arc<FieldEvaluator>,
    model_name: String,
}

impl MagnetismProcessor {
    pub fn new(evaluator: Arc<FieldEvaluator>, model_name: impl Into<String>) -> Self {
        Self {
            evaluator,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Compute the correction for a single station
    ///
    /// The residual is `observed_average - F`. A missing elevation is taken as sea level.
    /// A non-finite observed average is rejected rather than producing a NaN residual.
    pub fn correct(&self, station: &StationRecord) -> SurveyResult<StationCorrection> {
        let latitude = required(station, station.latitude, "latitude")?;
        let longitude = required(station, station.longitude, "longitude")?;
        let observed = required(station, station.observed_average, "observed average")?;
        if !observed.is_finite() {
            return Err(SurveyError::InvalidObservation {
                station: station.id.clone(),
                value: observed,
            });
        }
        let date = station
            .measurement_date
            .as_deref()
            .ok_or_else(|| missing(station, "measurement date"))?;
        let height = station.elevation.unwrap_or(0.0);

        let field = FieldQuery::with_date_str(latitude, longitude, height, date)
            .and_then(|query| self.evaluator.evaluate(&query))
            .map_err(|source| SurveyError::InvalidQuery {
                station: station.id.clone(),
                source,
            })?;

        Ok(StationCorrection {
            station_id: station.id.clone(),
            model_total: field.total_intensity,
            residual: observed - field.total_intensity,
            model: self.model_name.clone(),
        })
    }

    /// Compute corrections for `stations` in parallel
    ///
    /// Never fails as a whole; per-station failures are collected in the report.
    /// Results keep the order of `stations`.
    pub fn process_records(&self, stations: &[StationRecord]) -> BatchReport {
        let outcomes: Vec<_> = stations
            .par_iter()
            .map(|station| (station.id.clone(), self.correct(station)))
            .collect();

        let mut report = BatchReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(correction) => report.corrections.push(correction),
                Err(e) => {
                    warn!("Skipping station {}: {}", id, e);
                    report.failures.push((id, e));
                }
            }
        }
        report
    }

    /// Correct every pending station in `repository` and store the results
    ///
    /// Only a failure to list the pending stations aborts the run.
    pub fn run<R: StationRepository>(&self, repository: &mut R) -> SurveyResult<BatchReport> {
        let pending = repository.pending_stations()?;
        let computed = self.process_records(&pending);

        let mut report = BatchReport {
            corrections: Vec::with_capacity(computed.corrections.len()),
            failures: computed.failures,
        };
        for correction in computed.corrections {
            match repository.store_correction(&correction) {
                Ok(()) => report.corrections.push(correction),
                Err(e) => {
                    warn!(
                        "Could not store correction for station {}: {}",
                        correction.station_id, e
                    );
                    report.failures.push((correction.station_id, e));
                }
            }
        }

        info!(
            "Processed {} stations with {}: {} corrected, {} failed",
            pending.len(),
            self.model_name,
            report.processed(),
            report.failed()
        );
        Ok(report)
    }
}

fn missing(station: &StationRecord, field: &'static str) -> SurveyError {
    SurveyError::MissingField {
        station: station.id.clone(),
        field,
    }
}

fn required(
    station: &StationRecord,
    value: Option<FloatValue>,
    field: &'static str,
) -> SurveyResult<FloatValue> {
    value.ok_or_else(|| missing(station, field))
}
