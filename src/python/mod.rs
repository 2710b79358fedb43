//! Python bindings
//!
//! Exposes the field evaluator as `geomag._lib`:
//!
//! ```python
//! from geomag._lib import FieldEvaluator
//!
//! evaluator = FieldEvaluator("WMM.COF")
//! result = evaluator.evaluate(-33.45, -70.66, 570.0, "2025-03-14")
//! print(result.f, result.to_dict())
//! ```

use geomag_core::coefficients::CoefficientStore;
use geomag_core::config::GeomagConfig;
use geomag_core::errors::GeomagError;
use geomag_core::evaluator::{FieldEvaluator, FieldQuery, FieldResult};
use geomag_core::parameters::ModelParameters;
use geomag_core::time::{decimal_year as to_decimal_year, parse_date};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

fn to_py_err(error: GeomagError) -> PyErr {
    match error {
        GeomagError::ModelLoad(_) => PyIOError::new_err(error.to_string()),
        _ => PyValueError::new_err(error.to_string()),
    }
}

/// Magnetic field vector in the local north/east/down frame (nT)
#[pyclass]
#[pyo3(name = "FieldResult")]
#[derive(Debug, Clone)]
pub struct PyFieldResult(pub FieldResult);

#[pymethods]
impl PyFieldResult {
    /// Northward component
    #[getter]
    fn x(&self) -> f64 {
        self.0.north
    }

    /// Eastward component
    #[getter]
    fn y(&self) -> f64 {
        self.0.east
    }

    /// Downward component
    #[getter]
    fn z(&self) -> f64 {
        self.0.down
    }

    /// Total intensity
    #[getter]
    fn f(&self) -> f64 {
        self.0.total_intensity
    }

    #[getter]
    fn declination(&self) -> f64 {
        self.0.declination()
    }

    #[getter]
    fn inclination(&self) -> f64 {
        self.0.inclination()
    }

    fn to_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        let value = pythonize::pythonize(py, &self.0)?;
        Ok(value.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "FieldResult(x={:.3}, y={:.3}, z={:.3}, f={:.3})",
            self.0.north, self.0.east, self.0.down, self.0.total_intensity
        )
    }
}

/// Spherical-harmonic main-field evaluator
#[pyclass]
#[pyo3(name = "FieldEvaluator")]
pub struct PyFieldEvaluator(Arc<FieldEvaluator>);

#[pymethods]
impl PyFieldEvaluator {
    #[new]
    #[pyo3(signature = (coefficient_file, max_degree=13))]
    fn new(coefficient_file: PathBuf, max_degree: usize) -> PyResult<Self> {
        let store = CoefficientStore::new(coefficient_file, max_degree);
        let parameters = ModelParameters {
            max_degree,
            ..Default::default()
        };
        let evaluator = FieldEvaluator::from_store(&store, parameters).map_err(to_py_err)?;
        Ok(Self(Arc::new(evaluator)))
    }

    /// Build an evaluator from a TOML configuration file
    #[staticmethod]
    fn from_config(path: PathBuf) -> PyResult<Self> {
        let evaluator = GeomagConfig::from_file(path)
            .and_then(|config| config.build_evaluator())
            .map_err(to_py_err)?;
        Ok(Self(Arc::new(evaluator)))
    }

    /// Evaluate the field at one point
    ///
    /// `date` is an ISO 8601 date or timestamp.
    fn evaluate(
        &self,
        latitude: f64,
        longitude: f64,
        height: f64,
        date: &str,
    ) -> PyResult<PyFieldResult> {
        let query = FieldQuery::with_date_str(latitude, longitude, height, date)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        self.0
            .evaluate(&query)
            .map(PyFieldResult)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Evaluate the field at many points
    ///
    /// Returns the arrays `(x, y, z, f)` and a list of `(index, reason)` for
    /// every point that could not be evaluated. Those points are NaN in the arrays.
    #[allow(clippy::type_complexity)]
    fn evaluate_many<'py>(
        &self,
        py: Python<'py>,
        latitude: PyReadonlyArray1<'py, f64>,
        longitude: PyReadonlyArray1<'py, f64>,
        height: PyReadonlyArray1<'py, f64>,
        dates: Vec<String>,
    ) -> PyResult<(
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
        Vec<(usize, String)>,
    )> {
        let latitude = latitude.as_array();
        let longitude = longitude.as_array();
        let height = height.as_array();
        let n = dates.len();
        if latitude.len() != n || longitude.len() != n || height.len() != n {
            return Err(PyValueError::new_err(
                "latitude, longitude, height and dates must have the same length",
            ));
        }

        let mut columns = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        let mut failures = Vec::new();
        for i in 0..n {
            let result = FieldQuery::with_date_str(latitude[i], longitude[i], height[i], &dates[i])
                .and_then(|query| self.0.evaluate(&query));
            let values = match result {
                Ok(r) => [r.north, r.east, r.down, r.total_intensity],
                Err(e) => {
                    failures.push((i, e.to_string()));
                    [f64::NAN; 4]
                }
            };
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        let [x, y, z, f] = columns;
        Ok((
            PyArray1::from_vec_bound(py, x),
            PyArray1::from_vec_bound(py, y),
            PyArray1::from_vec_bound(py, z),
            PyArray1::from_vec_bound(py, f),
            failures,
        ))
    }
}

/// Decimal year of an ISO 8601 date or timestamp
#[pyfunction]
fn decimal_year(date: &str) -> PyResult<f64> {
    parse_date(date)
        .and_then(|d| to_decimal_year(&d))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
#[pyo3(name = "_lib")]
fn geomag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<PyFieldEvaluator>()?;
    m.add_class::<PyFieldResult>()?;
    m.add_function(wrap_pyfunction!(decimal_year, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpy::PyArrayMethods;
    use pyo3::types::PyDict;

    fn fixture_evaluator() -> PyFieldEvaluator {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("geomag-core/tests/data/low_degree.cof");
        PyFieldEvaluator::new(path, 13).unwrap()
    }

    #[test]
    fn test_evaluate_and_to_dict() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let evaluator = fixture_evaluator();
            let result = evaluator.evaluate(10.0, 20.0, 0.0, "2025-06-01").unwrap();
            assert!(result.f() > 0.0);

            let dict = result.to_dict(py).unwrap();
            let dict = dict.bind(py).downcast::<PyDict>().unwrap();
            let total: f64 = dict
                .get_item("total_intensity")
                .unwrap()
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(total, result.f());
        });
    }

    #[test]
    fn test_evaluate_rejects_invalid_query() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let evaluator = fixture_evaluator();
            let error = evaluator.evaluate(95.0, 0.0, 0.0, "2025-06-01").unwrap_err();
            assert!(error.is_instance_of::<PyValueError>(py));
            assert!(evaluator.evaluate(0.0, 0.0, 0.0, "not a date").is_err());
        });
    }

    #[test]
    fn test_evaluate_many_reports_failures() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let evaluator = fixture_evaluator();
            let latitude = PyArray1::from_vec_bound(py, vec![0.0, 95.0, 45.0]);
            let longitude = PyArray1::from_vec_bound(py, vec![0.0, 0.0, 90.0]);
            let height = PyArray1::from_vec_bound(py, vec![0.0, 0.0, 1000.0]);
            let dates = vec![
                "2025-01-01".to_string(),
                "2025-01-01".to_string(),
                "2026-01-01".to_string(),
            ];

            let (_, _, _, f, failures) = evaluator
                .evaluate_many(
                    py,
                    latitude.readonly(),
                    longitude.readonly(),
                    height.readonly(),
                    dates,
                )
                .unwrap();

            let f = f.to_vec().unwrap();
            assert!(f[0].is_finite());
            assert!(f[1].is_nan());
            assert!(f[2].is_finite());
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, 1);
            assert!(failures[0].1.contains("Latitude"));
        });
    }

    #[test]
    fn test_decimal_year() {
        assert_eq!(decimal_year("2025-01-01").unwrap(), 2025.0);
    }
}
