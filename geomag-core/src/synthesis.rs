//! Spherical-harmonic synthesis of the main field
//!
//! The geomagnetic potential is expanded as
//!
//! $$ V = R_e \sum_{n=1}^{N} \left(\frac{R_e}{r}\right)^{n+1} \sum_{m=0}^{n}
//!     \left(g_n^m \cos m\lambda + h_n^m \sin m\lambda\right) S_n^m P_n^m(\cos\theta) $$
//!
//! and the field is $\mathbf{B} = -\nabla V$, accumulated term by term in the
//! geocentric spherical frame.

use crate::coefficients::CoefficientTable;
use crate::coordinates::{GeocentricPosition, SphericalField};
use crate::legendre::LegendreTable;
use crate::parameters::ModelParameters;
use crate::schmidt::SchmidtTable;
use crate::FloatValue;
use log::debug;

/// Accumulate the field of every coefficient in `table` at `position`
///
/// `elapsed_years` is the signed time since the model epoch used to extrapolate
/// the coefficients. Near the poles, where $|\sin\theta|$ falls below
/// `parameters.pole_epsilon`, the azimuthal component is left at zero.
pub fn synthesize(
    table: &CoefficientTable,
    schmidt: &SchmidtTable,
    legendre: &LegendreTable,
    position: &GeocentricPosition,
    elapsed_years: FloatValue,
    parameters: &ModelParameters,
) -> SphericalField {
    let max_degree = parameters
        .max_degree
        .min(legendre.max_degree())
        .min(schmidt.max_degree());
    let ratio = parameters.reference_radius / position.radius;
    let sin_theta = position.colatitude.sin();
    let include_azimuthal = sin_theta.abs() >= parameters.pole_epsilon;
    if !include_azimuthal {
        debug!(
            "Colatitude {} rad is at a pole; azimuthal component omitted",
            position.colatitude
        );
    }

    let mut field = SphericalField::default();

    for coefficient in table.iter().filter(|c| c.degree <= max_degree) {
        let n = coefficient.degree;
        let m = coefficient.order;
        let (g, h) = coefficient.at_elapsed(elapsed_years);

        let (sin_m_lambda, cos_m_lambda) = (m as FloatValue * position.longitude).sin_cos();
        let radial_scale = ratio.powi(n as i32 + 2);
        let s = schmidt.get(n, m);
        let harmonic = g * cos_m_lambda + h * sin_m_lambda;

        field.radial += radial_scale * (n + 1) as FloatValue * s * legendre.p(n, m) * harmonic;
        field.theta -= radial_scale * s * legendre.dp(n, m) * harmonic;

        if m != 0 && include_azimuthal {
            field.phi += radial_scale
                * m as FloatValue
                * s
                * legendre.p(n, m)
                * (g * sin_m_lambda - h * cos_m_lambda)
                / sin_theta;
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::ModelCoefficient;
    use crate::coordinates::GeodeticPosition;
    use approx::assert_relative_eq;

    fn single_term(coefficient: ModelCoefficient) -> CoefficientTable {
        CoefficientTable::from_coefficients(vec![coefficient], 13).unwrap()
    }

    fn run(table: &CoefficientTable, latitude: FloatValue, elapsed: FloatValue) -> SphericalField {
        let parameters = ModelParameters::default();
        let position = GeodeticPosition::new(latitude, 0.0, 0.0)
            .to_geocentric(&parameters.ellipsoid);
        let legendre = LegendreTable::compute(position.colatitude, parameters.max_degree);
        let schmidt = SchmidtTable::new(parameters.max_degree);
        synthesize(table, &schmidt, &legendre, &position, elapsed, &parameters)
    }

    #[test]
    fn test_axial_dipole_at_equator() {
        let table = single_term(ModelCoefficient::new(1, 0, -29000.0, 0.0, 0.0, 0.0));
        let field = run(&table, 0.0, 0.0);

        let ratio: FloatValue = 6371.2 / 6378.137;
        // P_1^0 = cos(pi/2) = 0, dP_1^0 = -1
        assert_relative_eq!(field.radial, 0.0, epsilon = 1e-9);
        assert_relative_eq!(field.theta, -29000.0 * ratio.powi(3), epsilon = 1e-9);
        assert_eq!(field.phi, 0.0);
    }

    #[test]
    fn test_secular_variation_is_applied() {
        let static_table = single_term(ModelCoefficient::new(1, 0, -28996.0, 0.0, 0.0, 0.0));
        let drifting_table = single_term(ModelCoefficient::new(1, 0, -29000.0, 0.0, 2.0, 0.0));

        let expected = run(&static_table, 30.0, 0.0);
        let actual = run(&drifting_table, 30.0, 2.0);

        assert_relative_eq!(actual.radial, expected.radial, max_relative = 1e-12);
        assert_relative_eq!(actual.theta, expected.theta, max_relative = 1e-12);
    }

    #[test]
    fn test_finite_at_poles() {
        let table = single_term(ModelCoefficient::new(1, 1, -1410.8, 4545.4, 9.7, -21.5));
        for latitude in [90.0, -90.0] {
            let field = run(&table, latitude, 0.0);
            assert!(field.radial.is_finite());
            assert!(field.theta.is_finite());
            assert!(field.phi.is_finite());
        }
    }

    #[test]
    fn test_azimuthal_omitted_at_exact_pole() {
        let table = single_term(ModelCoefficient::new(1, 1, -1410.8, 4545.4, 9.7, -21.5));
        let parameters = ModelParameters::default();
        let position = GeocentricPosition {
            cartesian: [0.0, 0.0, 6356.7523142],
            radius: 6356.7523142,
            colatitude: 0.0,
            longitude: 0.0,
        };
        let legendre = LegendreTable::compute(position.colatitude, parameters.max_degree);
        let schmidt = SchmidtTable::new(parameters.max_degree);

        let field = synthesize(&table, &schmidt, &legendre, &position, 0.0, &parameters);
        assert_eq!(field.phi, 0.0);
        assert!(field.theta.is_finite());
    }

    #[test]
    fn test_terms_above_truncation_are_skipped() {
        let table = CoefficientTable::from_coefficients(
            vec![
                ModelCoefficient::new(1, 0, -29000.0, 0.0, 0.0, 0.0),
                ModelCoefficient::new(2, 0, -2500.0, 0.0, 0.0, 0.0),
            ],
            13,
        )
        .unwrap();
        let dipole_only = single_term(ModelCoefficient::new(1, 0, -29000.0, 0.0, 0.0, 0.0));

        let parameters = ModelParameters {
            max_degree: 1,
            ..Default::default()
        };
        let position = GeodeticPosition::new(20.0, 0.0, 0.0).to_geocentric(&parameters.ellipsoid);
        let legendre = LegendreTable::compute(position.colatitude, 13);
        let schmidt = SchmidtTable::new(13);

        let truncated = synthesize(&table, &schmidt, &legendre, &position, 0.0, &parameters);
        let reference = synthesize(&dipole_only, &schmidt, &legendre, &position, 0.0, &parameters);
        assert_eq!(truncated, reference);
    }
}
