use cleantoken_types::{ForecastMethod, ForecastResult, Series};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod arima;

pub const DEFAULT_MIN_OBSERVATIONS: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Below this many observations the forecaster answers with the
    /// arithmetic mean instead of fitting a model.
    pub min_observations: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_observations: DEFAULT_MIN_OBSERVATIONS,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("cannot forecast from an empty series")]
    InsufficientData,
}

/// One-step-ahead pollution forecaster.
///
/// Pure function of its input: fits an ARIMA(1,1,1)-style model when
/// enough history is available and degrades to the mean otherwise.
/// Fit failure is never surfaced as an error; the result's method
/// field records which path produced the number.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn predict(&self, values: &[f64]) -> Result<ForecastResult, ForecastError> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData);
        }

        if values.len() < self.config.min_observations {
            return Ok(ForecastResult {
                value: mean(values),
                method: ForecastMethod::FallbackMean,
            });
        }

        match arima::one_step_forecast(values) {
            Some(value) => Ok(ForecastResult {
                value,
                method: ForecastMethod::Model,
            }),
            None => {
                debug!(observations = values.len(), "model fit degenerated, using mean fallback");
                Ok(ForecastResult {
                    value: mean(values),
                    method: ForecastMethod::FallbackMean,
                })
            }
        }
    }

    pub fn predict_series(&self, series: &Series) -> Result<ForecastResult, ForecastError> {
        self.predict(&series.values())
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleantoken_types::Reading;

    #[test]
    fn empty_series_is_an_error() {
        let forecaster = Forecaster::default();
        assert_eq!(forecaster.predict(&[]), Err(ForecastError::InsufficientData));
    }

    #[test]
    fn short_series_falls_back_to_the_mean() {
        let forecaster = Forecaster::default();
        let result = forecaster.predict(&[80.0, 85.0, 78.0]).unwrap();
        assert_eq!(result.value, 81.0);
        assert_eq!(result.method, ForecastMethod::FallbackMean);
    }

    #[test]
    fn single_observation_is_its_own_mean() {
        let forecaster = Forecaster::default();
        let result = forecaster.predict(&[120.0]).unwrap();
        assert_eq!(result.value, 120.0);
        assert_eq!(result.method, ForecastMethod::FallbackMean);
    }

    #[test]
    fn flat_history_degrades_to_the_mean_without_error() {
        let forecaster = Forecaster::default();
        let result = forecaster.predict(&[90.0; 6]).unwrap();
        assert_eq!(result.value, 90.0);
        assert_eq!(result.method, ForecastMethod::FallbackMean);
    }

    #[test]
    fn long_history_takes_the_model_path() {
        let forecaster = Forecaster::default();
        let result = forecaster
            .predict(&[80.0, 85.0, 78.0, 90.0, 84.0, 88.0, 92.0])
            .unwrap();
        assert_eq!(result.method, ForecastMethod::Model);
        assert!(result.value.is_finite());
    }

    #[test]
    fn custom_threshold_widens_the_fallback_band() {
        let forecaster = Forecaster::new(ForecastConfig {
            min_observations: 10,
        });
        let result = forecaster
            .predict(&[80.0, 85.0, 78.0, 90.0, 84.0, 88.0, 92.0])
            .unwrap();
        assert_eq!(result.method, ForecastMethod::FallbackMean);
    }

    #[test]
    fn series_adapter_forwards_the_values() {
        let mut series = Series::new("Industrial");
        for (i, value) in [80.0, 85.0, 78.0].into_iter().enumerate() {
            series
                .push(Reading {
                    timestamp: i as u64 + 1,
                    value,
                })
                .unwrap();
        }
        let result = Forecaster::default().predict_series(&series).unwrap();
        assert_eq!(result.value, 81.0);
        assert_eq!(result.method, ForecastMethod::FallbackMean);
    }
}
