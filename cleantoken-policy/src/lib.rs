use cleantoken_types::ForecastResult;
use serde::{Deserialize, Serialize};

/// Alert level above which eco-actions earn double tokens.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 100.0;

/// Maps a forecast to a mint multiplier. Pure; the threshold is
/// configuration, not baked-in domain knowledge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct IncentivePolicy {
    pub alert_threshold: f64,
}

impl Default for IncentivePolicy {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl IncentivePolicy {
    pub fn new(alert_threshold: f64) -> Self {
        Self { alert_threshold }
    }

    /// 2.0 when the forecast is strictly above the alert threshold,
    /// otherwise 1.0. A forecast exactly at the threshold does not
    /// trigger the alert.
    pub fn multiplier(&self, forecast: &ForecastResult) -> f64 {
        if forecast.value > self.alert_threshold {
            2.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleantoken_types::ForecastMethod;

    fn forecast(value: f64) -> ForecastResult {
        ForecastResult {
            value,
            method: ForecastMethod::Model,
        }
    }

    #[test]
    fn high_pollution_doubles_the_reward() {
        let policy = IncentivePolicy::default();
        assert_eq!(policy.multiplier(&forecast(100.1)), 2.0);
        assert_eq!(policy.multiplier(&forecast(250.0)), 2.0);
    }

    #[test]
    fn threshold_is_a_strict_boundary() {
        let policy = IncentivePolicy::default();
        assert_eq!(policy.multiplier(&forecast(100.0)), 1.0);
        assert_eq!(policy.multiplier(&forecast(42.0)), 1.0);
    }

    #[test]
    fn threshold_is_caller_overridable() {
        let policy = IncentivePolicy::new(50.0);
        assert_eq!(policy.multiplier(&forecast(60.0)), 2.0);
        assert_eq!(policy.multiplier(&forecast(50.0)), 1.0);
    }
}
