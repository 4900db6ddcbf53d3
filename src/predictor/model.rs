//! Linear regression model loaded from a JSON artifact.
//!
//! The training pipeline exports its fitted coefficients as
//! `{"intercept": ..., "coefficients": {"OverallQual": ..., ...}}`;
//! prediction is the plain dot product over the fixed feature schema.

use std::path::Path;

use serde::Deserialize;

use super::{Features, Predictor, PredictorError};

#[derive(Debug, Deserialize)]
pub struct LinearModelPredictor {
    intercept: f64,
    coefficients: Coefficients,
}

#[derive(Debug, Deserialize)]
struct Coefficients {
    #[serde(rename = "OverallQual")]
    overall_qual: f64,
    #[serde(rename = "GrLivArea")]
    gr_liv_area: f64,
    #[serde(rename = "GarageCars")]
    garage_cars: f64,
    #[serde(rename = "TotalBsmtSF")]
    total_bsmt_sf: f64,
    #[serde(rename = "YearBuilt")]
    year_built: f64,
}

impl LinearModelPredictor {
    /// Load and validate a model artifact.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError`] when the file is unreadable or does
    /// not match the expected artifact shape.
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PredictorError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PredictorError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Predictor for LinearModelPredictor {
    fn predict(&self, features: &Features) -> f64 {
        self.intercept
            + self.coefficients.overall_qual * f64::from(features.overall_qual)
            + self.coefficients.gr_liv_area * features.gr_liv_area
            + self.coefficients.garage_cars * f64::from(features.garage_cars)
            + self.coefficients.total_bsmt_sf * features.total_bsmt_sf
            + self.coefficients.year_built * f64::from(features.year_built)
    }

    fn kind(&self) -> &'static str {
        "model"
    }
}
