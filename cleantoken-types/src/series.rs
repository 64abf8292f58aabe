use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One pollution observation: unix-seconds timestamp plus a
/// concentration value (µg/m³ or equivalent).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: u64,
    pub value: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("reading at {timestamp} does not follow the latest reading at {latest}")]
    OutOfOrder { timestamp: u64, latest: u64 },
}

/// Chronologically ordered readings for one monitored area.
///
/// Timestamps are strictly increasing; duplicates are rejected at
/// insertion so every snapshot handed to the forecaster is already
/// well ordered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    area: String,
    readings: Vec<Reading>,
}

#[derive(Deserialize)]
struct RawSeries {
    area: String,
    readings: Vec<Reading>,
}

impl TryFrom<RawSeries> for Series {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Series::from_readings(raw.area, raw.readings)
    }
}

impl Series {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            readings: Vec::new(),
        }
    }

    pub fn from_readings(
        area: impl Into<String>,
        readings: Vec<Reading>,
    ) -> Result<Self, SeriesError> {
        let mut series = Self::new(area);
        for reading in readings {
            series.push(reading)?;
        }
        Ok(series)
    }

    pub fn push(&mut self, reading: Reading) -> Result<(), SeriesError> {
        if let Some(last) = self.readings.last() {
            if reading.timestamp <= last.timestamp {
                return Err(SeriesError::OutOfOrder {
                    timestamp: reading.timestamp,
                    latest: last.timestamp,
                });
            }
        }
        self.readings.push(reading);
        Ok(())
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp: u64, value: f64) -> Reading {
        Reading { timestamp, value }
    }

    #[test]
    fn push_keeps_chronological_order() {
        let mut series = Series::new("Downtown");
        series.push(reading(100, 80.0)).unwrap();
        series.push(reading(200, 85.0)).unwrap();
        assert_eq!(series.values(), vec![80.0, 85.0]);
    }

    #[test]
    fn push_rejects_duplicate_and_stale_timestamps() {
        let mut series = Series::new("Downtown");
        series.push(reading(100, 80.0)).unwrap();

        let dup = series.push(reading(100, 81.0));
        assert_eq!(
            dup,
            Err(SeriesError::OutOfOrder {
                timestamp: 100,
                latest: 100
            })
        );

        let stale = series.push(reading(50, 79.0));
        assert!(stale.is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn deserialization_enforces_ordering() {
        let good = r#"{"area":"Suburbs","readings":[{"timestamp":1,"value":50.0},{"timestamp":2,"value":52.0}]}"#;
        let series: Series = serde_json::from_str(good).unwrap();
        assert_eq!(series.area(), "Suburbs");
        assert_eq!(series.len(), 2);

        let bad = r#"{"area":"Suburbs","readings":[{"timestamp":2,"value":50.0},{"timestamp":1,"value":52.0}]}"#;
        assert!(serde_json::from_str::<Series>(bad).is_err());
    }
}
