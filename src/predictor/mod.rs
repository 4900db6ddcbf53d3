//! Price prediction — heuristic fallback or a loaded linear model.
//!
//! DESIGN
//! ======
//! The predictor is chosen once at startup: when the configured model
//! artifact exists it is loaded and validated, otherwise the service
//! falls back to a fixed heuristic so the endpoint works without a
//! trained model. Handlers only ever see `Arc<dyn Predictor>`; there is
//! no per-request mode flag.

pub mod heuristic;
pub mod model;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use heuristic::HeuristicPredictor;
pub use model::LinearModelPredictor;

/// Fixed feature schema for one prediction request. Serde names match
/// the public JSON field spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "OverallQual")]
    pub overall_qual: i32,
    #[serde(rename = "GrLivArea")]
    pub gr_liv_area: f64,
    #[serde(rename = "GarageCars")]
    pub garage_cars: i32,
    #[serde(rename = "TotalBsmtSF")]
    pub total_bsmt_sf: f64,
    #[serde(rename = "YearBuilt")]
    pub year_built: i32,
}

/// Opaque feature-vector → price function.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    fn predict(&self, features: &Features) -> f64;

    /// Short name for logs and diagnostics.
    fn kind(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("failed to read model artifact {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("malformed model artifact {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

/// Select the predictor for this process. An absent artifact selects
/// the heuristic; a present but unreadable or malformed artifact is a
/// startup error.
///
/// # Errors
///
/// Returns [`PredictorError`] when the artifact exists but cannot be
/// loaded.
pub fn from_artifact(path: &Path) -> Result<Arc<dyn Predictor>, PredictorError> {
    if path.exists() {
        Ok(Arc::new(LinearModelPredictor::load(path)?))
    } else {
        Ok(Arc::new(HeuristicPredictor))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
