//! Stub predictor used when no trained model artifact is present.

use super::{Features, Predictor};

const BASE_PRICE: f64 = 50_000.0;

/// Hand-tuned linear heuristic producing plausible prices, so the
/// endpoint is usable before a model has been trained.
#[derive(Debug)]
pub struct HeuristicPredictor;

impl Predictor for HeuristicPredictor {
    fn predict(&self, features: &Features) -> f64 {
        BASE_PRICE
            + f64::from(features.overall_qual) * 15_000.0
            + features.gr_liv_area * 90.0
            + f64::from(features.garage_cars) * 8_000.0
            + features.total_bsmt_sf * 40.0
            + f64::from((features.year_built - 1970).max(0)) * 800.0
    }

    fn kind(&self) -> &'static str {
        "heuristic"
    }
}
