//! Model parameters
//!
//! Physical constants that define a spherical-harmonic main-field model.
//! The defaults reproduce the World Magnetic Model 2025 conventions.

use crate::errors::{GeomagError, GeomagResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Highest truncation degree a model may be configured with
pub const MAX_SUPPORTED_DEGREE: usize = 13;

/// Reference ellipsoid used to convert geodetic coordinates to geocentric ones
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ellipsoid {
    /// Equatorial semi-axis
    /// unit: km
    /// default: 6378.137
    pub semi_major_axis: FloatValue,

    /// Polar semi-axis
    /// unit: km
    /// default: 6356.7523142
    pub semi_minor_axis: FloatValue,
}

impl Ellipsoid {
    /// The WGS84 ellipsoid
    pub const fn wgs84() -> Self {
        Self {
            semi_major_axis: 6378.137,
            semi_minor_axis: 6356.7523142,
        }
    }

    /// Squared first eccentricity
    ///
    /// $$ e^2 = \frac{a^2 - b^2}{a^2} $$
    pub fn eccentricity_squared(&self) -> FloatValue {
        let a2 = self.semi_major_axis * self.semi_major_axis;
        let b2 = self.semi_minor_axis * self.semi_minor_axis;
        (a2 - b2) / a2
    }

    /// Ratio $b^2 / a^2$
    pub fn axis_ratio_squared(&self) -> FloatValue {
        (self.semi_minor_axis * self.semi_minor_axis)
            / (self.semi_major_axis * self.semi_major_axis)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Parameters of a fixed-epoch spherical-harmonic field model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Reference epoch of the Gauss coefficients
    /// unit: decimal year
    /// default: 2025.0
    pub epoch: FloatValue,

    /// Magnetic reference spherical radius $R_e$
    /// unit: km
    /// default: 6371.2
    pub reference_radius: FloatValue,

    /// Truncation degree of the expansion, at most [`MAX_SUPPORTED_DEGREE`].
    /// Coefficients of higher degree are rejected when a table is loaded.
    /// default: 13
    pub max_degree: usize,

    /// Reference ellipsoid for the geodetic to geocentric conversion
    /// default: WGS84
    pub ellipsoid: Ellipsoid,

    /// Threshold on $|\sin\theta|$ below which the azimuthal component is not accumulated.
    /// At the geographic poles the east direction is undefined.
    /// unit: dimensionless
    /// default: 1e-10
    pub pole_epsilon: FloatValue,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            epoch: 2025.0,
            reference_radius: 6371.2,
            max_degree: 13,
            ellipsoid: Ellipsoid::wgs84(),
            pole_epsilon: 1e-10,
        }
    }
}

impl ModelParameters {
    /// Check that the parameters describe a usable model
    pub fn validate(&self) -> GeomagResult<()> {
        if !self.epoch.is_finite() {
            return Err(GeomagError::Config(format!(
                "epoch must be finite, got {}",
                self.epoch
            )));
        }
        if !(self.reference_radius.is_finite() && self.reference_radius > 0.0) {
            return Err(GeomagError::Config(format!(
                "reference_radius must be positive, got {}",
                self.reference_radius
            )));
        }
        if !(1..=MAX_SUPPORTED_DEGREE).contains(&self.max_degree) {
            return Err(GeomagError::Config(format!(
                "max_degree must be in 1..={}, got {}",
                MAX_SUPPORTED_DEGREE, self.max_degree
            )));
        }
        let Ellipsoid {
            semi_major_axis: a,
            semi_minor_axis: b,
        } = self.ellipsoid;
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(GeomagError::Config(format!(
                "ellipsoid semi-axes must be positive, got a={a}, b={b}"
            )));
        }
        if b > a {
            return Err(GeomagError::Config(format!(
                "ellipsoid polar semi-axis ({b}) exceeds the equatorial semi-axis ({a})"
            )));
        }
        if !(self.pole_epsilon.is_finite() && self.pole_epsilon >= 0.0) {
            return Err(GeomagError::Config(format!(
                "pole_epsilon must be non-negative, got {}",
                self.pole_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_default_parameters() {
        let params = ModelParameters::default();
        assert!(is_close!(params.epoch, 2025.0));
        assert!(is_close!(params.reference_radius, 6371.2));
        assert_eq!(params.max_degree, 13);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_wgs84_eccentricity() {
        let e2 = Ellipsoid::wgs84().eccentricity_squared();
        // WGS84 first eccentricity squared
        assert!((e2 - 6.694_379_990e-3).abs() < 1e-9, "got {e2}");
    }

    #[test]
    fn test_validate_rejects_inverted_ellipsoid() {
        let params = ModelParameters {
            ellipsoid: Ellipsoid {
                semi_major_axis: 6356.0,
                semi_minor_axis: 6378.0,
            },
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(GeomagError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_degree() {
        let params = ModelParameters {
            max_degree: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degree_above_supported() {
        for max_degree in [MAX_SUPPORTED_DEGREE + 1, 1000, usize::MAX] {
            let params = ModelParameters {
                max_degree,
                ..Default::default()
            };
            assert!(matches!(params.validate(), Err(GeomagError::Config(_))));
        }
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let params: ModelParameters = serde_json::from_str(r#"{"epoch": 2020.0}"#).unwrap();
        assert_eq!(params.epoch, 2020.0);
        assert_eq!(params.max_degree, 13);
        assert_eq!(params.ellipsoid, Ellipsoid::wgs84());
    }
}
