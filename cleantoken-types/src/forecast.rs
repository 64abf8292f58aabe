use serde::{Deserialize, Serialize};
use std::fmt;

/// How a prediction was produced: the fitted model, or the arithmetic
/// mean when history is too short or the fit degrades.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "fallback-mean")]
    FallbackMean,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMethod::Model => write!(f, "model"),
            ForecastMethod::FallbackMean => write!(f, "fallback-mean"),
        }
    }
}

/// One-step-ahead point forecast. Recomputed on demand from the
/// current series snapshot, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastResult {
    pub value: f64,
    pub method: ForecastMethod,
}
