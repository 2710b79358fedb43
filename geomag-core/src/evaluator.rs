//! Field evaluation
//!
//! [`FieldEvaluator`] ties the coefficient table, the coordinate transform,
//! the Legendre recurrence and the synthesis together. A value of this type
//! can only be built from a loaded table, so every evaluator is ready to use.
//!
//! ```rust
//! use geomag_core::coefficients::{CoefficientTable, ModelCoefficient};
//! use geomag_core::evaluator::{FieldEvaluator, FieldQuery};
//! use geomag_core::parameters::ModelParameters;
//! use chrono::{TimeZone, Utc};
//! use std::sync::Arc;
//!
//! let table = CoefficientTable::from_coefficients(
//!     vec![ModelCoefficient::new(1, 0, -29000.0, 0.0, 0.0, 0.0)],
//!     13,
//! )
//! .unwrap();
//! let evaluator = FieldEvaluator::new(Arc::new(table), ModelParameters::default()).unwrap();
//!
//! let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
//! let result = evaluator.evaluate(&FieldQuery::new(0.0, 0.0, 0.0, date)).unwrap();
//! assert!(result.total_intensity > 28000.0);
//! ```

use crate::coefficients::{CoefficientStore, CoefficientTable};
use crate::coordinates::GeodeticPosition;
use crate::errors::{GeomagError, GeomagResult, InvalidQueryError};
use crate::legendre::LegendreTable;
use crate::parameters::ModelParameters;
use crate::schmidt::SchmidtTable;
use crate::synthesis::synthesize;
use crate::time::{decimal_year, parse_date};
use crate::FloatValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A point in space and time at which to evaluate the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldQuery {
    /// Geodetic latitude
    /// unit: degrees
    pub latitude: FloatValue,
    /// Geodetic longitude, any finite value (periodic in 360)
    /// unit: degrees
    pub longitude: FloatValue,
    /// Height above mean sea level
    /// unit: m
    pub height: FloatValue,
    pub date: DateTime<Utc>,
}

impl FieldQuery {
    pub fn new(
        latitude: FloatValue,
        longitude: FloatValue,
        height: FloatValue,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            height,
            date,
        }
    }

    /// Build a query from a textual date, see [`parse_date`] for the accepted formats
    pub fn with_date_str(
        latitude: FloatValue,
        longitude: FloatValue,
        height: FloatValue,
        date: &str,
    ) -> Result<Self, InvalidQueryError> {
        Ok(Self::new(latitude, longitude, height, parse_date(date)?))
    }

    /// Check the preconditions of an evaluation
    pub fn validate(&self) -> Result<(), InvalidQueryError> {
        if !(self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)) {
            return Err(InvalidQueryError::Latitude(self.latitude));
        }
        if !self.longitude.is_finite() {
            return Err(InvalidQueryError::Longitude(self.longitude));
        }
        if !self.height.is_finite() {
            return Err(InvalidQueryError::Height(self.height));
        }
        Ok(())
    }
}

/// Magnetic field vector in the local north/east/down frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Northward component X
    /// unit: nT
    pub north: FloatValue,
    /// Eastward component Y
    /// unit: nT
    pub east: FloatValue,
    /// Downward component Z
    /// unit: nT
    pub down: FloatValue,
    /// Total intensity F
    /// unit: nT
    pub total_intensity: FloatValue,
}

impl FieldResult {
    /// Build a result from its components, deriving the total intensity
    pub fn from_components(north: FloatValue, east: FloatValue, down: FloatValue) -> Self {
        Self {
            north,
            east,
            down,
            total_intensity: (north * north + east * east + down * down).sqrt(),
        }
    }

    /// Horizontal intensity H
    /// unit: nT
    pub fn horizontal_intensity(&self) -> FloatValue {
        self.north.hypot(self.east)
    }

    /// Declination D, positive east of true north
    /// unit: degrees
    pub fn declination(&self) -> FloatValue {
        self.east.atan2(self.north).to_degrees()
    }

    /// Inclination I, positive downwards
    /// unit: degrees
    pub fn inclination(&self) -> FloatValue {
        self.down.atan2(self.horizontal_intensity()).to_degrees()
    }
}

/// Evaluates a spherical-harmonic main-field model
///
/// Evaluations are independent and do not mutate the evaluator, so a single
/// instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct FieldEvaluator {
    table: Arc<CoefficientTable>,
    parameters: ModelParameters,
    schmidt: SchmidtTable,
}

impl FieldEvaluator {
    /// Create an evaluator for an already loaded table
    pub fn new(table: Arc<CoefficientTable>, parameters: ModelParameters) -> GeomagResult<Self> {
        parameters.validate()?;
        if table.max_degree() > parameters.max_degree {
            return Err(GeomagError::Config(format!(
                "coefficient table was validated for degree {} but the model is truncated at {}",
                table.max_degree(),
                parameters.max_degree
            )));
        }
        let schmidt = SchmidtTable::new(parameters.max_degree);
        Ok(Self {
            table,
            parameters,
            schmidt,
        })
    }

    /// Create an evaluator from a store, loading the table if needed
    pub fn from_store(store: &CoefficientStore, parameters: ModelParameters) -> GeomagResult<Self> {
        let table = store.table()?;
        Self::new(table, parameters)
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    pub fn table(&self) -> &Arc<CoefficientTable> {
        &self.table
    }

    /// Evaluate the field at a query point
    pub fn evaluate(&self, query: &FieldQuery) -> Result<FieldResult, InvalidQueryError> {
        query.validate()?;

        let elapsed_years = decimal_year(&query.date)? - self.parameters.epoch;
        let position = GeodeticPosition::new(query.latitude, query.longitude, query.height)
            .to_geocentric(&self.parameters.ellipsoid);
        if !(position.radius.is_finite() && position.radius > 0.0) {
            return Err(InvalidQueryError::Height(query.height));
        }
        let legendre = LegendreTable::compute(position.colatitude, self.parameters.max_degree);

        let spherical = synthesize(
            &self.table,
            &self.schmidt,
            &legendre,
            &position,
            elapsed_years,
            &self.parameters,
        );
        let [north, east, down] = spherical.to_north_east_down(&position);
        let result = FieldResult::from_components(north, east, down);
        // The expansion diverges as the radius approaches zero
        if !result.total_intensity.is_finite() {
            return Err(InvalidQueryError::Height(query.height));
        }

        Ok(result)
    }

    /// Convenience wrapper around [`FieldEvaluator::evaluate`]
    pub fn evaluate_at(
        &self,
        latitude: FloatValue,
        longitude: FloatValue,
        height: FloatValue,
        date: DateTime<Utc>,
    ) -> Result<FieldResult, InvalidQueryError> {
        self.evaluate(&FieldQuery::new(latitude, longitude, height, date))
    }
}
