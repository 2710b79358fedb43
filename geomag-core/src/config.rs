//! Configuration files
//!
//! A configuration names the coefficient file and optionally overrides the model parameters:
//!
//! ```toml
//! model_name = "WMM-2025"
//! coefficient_file = "data/WMM.COF"
//!
//! [model]
//! epoch = 2025.0
//! max_degree = 13
//! ```
//!
//! Relative coefficient paths are resolved against the directory of the
//! configuration file when it is read with [`GeomagConfig::from_file`].

use crate::coefficients::CoefficientStore;
use crate::errors::{GeomagError, GeomagResult};
use crate::evaluator::FieldEvaluator;
use crate::parameters::ModelParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeomagConfig {
    /// Identifier stored alongside every model value
    /// default: "WMM-2025"
    pub model_name: String,

    /// Path of the coefficient file
    /// default: "WMM.COF"
    pub coefficient_file: PathBuf,

    /// Model parameters
    pub model: ModelParameters,
}

impl Default for GeomagConfig {
    fn default() -> Self {
        Self {
            model_name: "WMM-2025".to_string(),
            coefficient_file: PathBuf::from("WMM.COF"),
            model: ModelParameters::default(),
        }
    }
}

impl GeomagConfig {
    pub fn from_toml_str(source: &str) -> GeomagResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| GeomagError::Config(e.to_string()))?;
        config.model.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> GeomagResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            GeomagError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&source)?;

        if config.coefficient_file.is_relative() {
            if let Some(parent) = path.parent() {
                config.coefficient_file = parent.join(&config.coefficient_file);
            }
        }
        Ok(config)
    }

    /// A lazily loading store for the configured coefficient file
    pub fn coefficient_store(&self) -> CoefficientStore {
        CoefficientStore::new(&self.coefficient_file, self.model.max_degree)
    }

    /// Load the coefficients and build an evaluator
    pub fn build_evaluator(&self) -> GeomagResult<FieldEvaluator> {
        FieldEvaluator::from_store(&self.coefficient_store(), self.model.clone())
    }
}
