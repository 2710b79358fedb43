//! Geodetic to geocentric conversion and the final rotation into the local frame

use crate::parameters::Ellipsoid;
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Position relative to the reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// unit: degrees
    pub latitude: FloatValue,
    /// unit: degrees
    pub longitude: FloatValue,
    /// Height above mean sea level
    /// unit: m
    pub height: FloatValue,
}

/// Position in the Earth-centred frame
///
/// Keeps the Cartesian components alongside the spherical ones as the
/// local-frame rotation needs both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricPosition {
    /// Earth-centred Cartesian coordinates
    /// unit: km
    pub cartesian: [FloatValue; 3],
    /// Distance from the Earth's centre
    /// unit: km
    pub radius: FloatValue,
    /// Geocentric colatitude
    /// unit: rad
    pub colatitude: FloatValue,
    /// unit: rad
    pub longitude: FloatValue,
}

impl GeodeticPosition {
    pub fn new(latitude: FloatValue, longitude: FloatValue, height: FloatValue) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Convert to geocentric spherical coordinates on `ellipsoid`
    pub fn to_geocentric(&self, ellipsoid: &Ellipsoid) -> GeocentricPosition {
        let phi = self.latitude.to_radians();
        let lambda = self.longitude.to_radians();
        let h = self.height / 1000.0;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        // Prime vertical radius of curvature
        let n = ellipsoid.semi_major_axis
            / (1.0 - ellipsoid.eccentricity_squared() * sin_phi * sin_phi).sqrt();

        let x = (n + h) * cos_phi * cos_lambda;
        let y = (n + h) * cos_phi * sin_lambda;
        let z = (ellipsoid.axis_ratio_squared() * n + h) * sin_phi;

        let radius = (x * x + y * y + z * z).sqrt();
        // Rounding can push |z / r| marginally past 1 at the poles
        let colatitude = (z / radius).clamp(-1.0, 1.0).acos();

        GeocentricPosition {
            cartesian: [x, y, z],
            radius,
            colatitude,
            longitude: lambda,
        }
    }
}

impl GeocentricPosition {
    /// Geocentric latitude $\psi$ of the point
    pub fn geocentric_latitude(&self) -> FloatValue {
        let [x, y, z] = self.cartesian;
        z.atan2((x * x + y * y).sqrt())
    }
}

/// Field components in the geocentric spherical frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SphericalField {
    /// Radial component, positive outwards
    /// unit: nT
    pub radial: FloatValue,
    /// Colatitude component, positive southwards
    /// unit: nT
    pub theta: FloatValue,
    /// Azimuthal component, positive eastwards
    /// unit: nT
    pub phi: FloatValue,
}

impl SphericalField {
    /// Rotate into the local north/east/down frame at `position`
    ///
    /// Returns `[X, Y, Z]`.
    pub fn to_north_east_down(&self, position: &GeocentricPosition) -> [FloatValue; 3] {
        let (sin_psi, cos_psi) = position.geocentric_latitude().sin_cos();

        let north = -self.theta * cos_psi - self.radial * sin_psi;
        let east = self.phi;
        let down = self.theta * sin_psi - self.radial * cos_psi;

        [north, east, down]
    }
}
