// src/types/history.rs
use std::collections::VecDeque;
use std::fmt::Write;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TelemetryError;

pub const HISTORY_CAPACITY: usize = 60;

/// Fixed-capacity FIFO window of recent temperature, pressure and battery samples.
///
/// The three series always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingHistory {
    temperature: VecDeque<f64>,
    pressure: VecDeque<f64>,
    battery: VecDeque<f64>,
    #[serde(skip)]
    capacity: usize,
}

#[derive(Deserialize)]
struct RawHistory {
    temperature: Vec<f64>,
    pressure: Vec<f64>,
    battery: Vec<f64>,
}

impl RollingHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            temperature: VecDeque::with_capacity(capacity),
            pressure: VecDeque::with_capacity(capacity),
            battery: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from server-provided series. The server decides the length.
    pub fn from_series(
        temperature: Vec<f64>,
        pressure: Vec<f64>,
        battery: Vec<f64>,
    ) -> Result<Self, TelemetryError> {
        if temperature.len() != pressure.len() || temperature.len() != battery.len() {
            return Err(TelemetryError::Malformed(format!(
                "history series lengths differ: temperature={}, pressure={}, battery={}",
                temperature.len(),
                pressure.len(),
                battery.len()
            )));
        }

        let all_finite = temperature
            .iter()
            .chain(pressure.iter())
            .chain(battery.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(TelemetryError::Malformed("history contains a non-finite sample".into()));
        }

        Ok(Self {
            capacity: temperature.len(),
            temperature: temperature.into(),
            pressure: pressure.into(),
            battery: battery.into(),
        })
    }

    /// Demo seed: a full window of gently drifting samples.
    pub fn seeded<R: Rng>(rng: &mut R) -> Self {
        let mut history = Self::new();

        let mut t: f64 = 23.0;
        let mut p: f64 = 1013.0;
        let mut b: f64 = 4.0;

        for _ in 0..HISTORY_CAPACITY {
            t += rng.gen_range(-0.2_f64..0.2);
            p += rng.gen_range(-0.15_f64..0.15);
            b -= rng.gen_range(0.0_f64..0.003);
            history.push(t, p, b);
        }

        history
    }

    /// Append one sample to each series, evicting the oldest once full.
    pub fn push(&mut self, temperature: f64, pressure: f64, battery: f64) {
        if self.capacity == 0 {
            return;
        }

        self.temperature.push_back(temperature);
        self.pressure.push_back(pressure);
        self.battery.push_back(battery);

        while self.temperature.len() > self.capacity {
            self.temperature.pop_front();
            self.pressure.pop_front();
            self.battery.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn temperature(&self) -> &VecDeque<f64> {
        &self.temperature
    }

    pub fn pressure(&self) -> &VecDeque<f64> {
        &self.pressure
    }

    pub fn battery(&self) -> &VecDeque<f64> {
        &self.battery
    }

    /// CSV export, oldest sample first.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Index,Temperature (°C),Pressure (hPa),Battery (V)\n");

        let rows = self
            .temperature
            .iter()
            .zip(self.pressure.iter())
            .zip(self.battery.iter());

        for (i, ((t, p), b)) in rows.enumerate() {
            let _ = writeln!(out, "{},{:.2},{:.2},{:.3}", i, t, p, b);
        }

        out
    }
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for RollingHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawHistory::deserialize(deserializer)?;
        RollingHistory::from_series(raw.temperature, raw.pressure, raw.battery)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut history = RollingHistory::with_capacity(3);
        history.push(1.0, 10.0, 3.1);
        history.push(2.0, 20.0, 3.2);
        history.push(3.0, 30.0, 3.3);
        history.push(4.0, 40.0, 3.4);

        assert_eq!(history.len(), 3);
        assert_eq!(history.temperature().iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.pressure().iter().copied().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
        assert_eq!(history.battery().iter().copied().collect::<Vec<_>>(), vec![3.2, 3.3, 3.4]);
    }

    #[test]
    fn test_push_below_capacity_grows() {
        let mut history = RollingHistory::new();
        history.push(20.0, 1000.0, 3.7);

        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_seeded_history_is_full() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut history = RollingHistory::seeded(&mut rng);

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.pressure().len(), HISTORY_CAPACITY);
        assert_eq!(history.battery().len(), HISTORY_CAPACITY);

        let second = history.temperature()[1];
        history.push(99.0, 1.0, 1.0);
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.temperature()[0], second);
        assert_eq!(history.temperature().back(), Some(&99.0));
    }

    #[test]
    fn test_deserialize_server_history() {
        let json = r#"{"temperature":[21.0,21.5],"pressure":[1010.0,1010.2],"battery":[3.9,3.89]}"#;
        let history: RollingHistory = serde_json::from_str(json).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), 2);
    }

    #[test]
    fn test_deserialize_rejects_unequal_lengths() {
        let json = r#"{"temperature":[21.0,21.5],"pressure":[1010.0],"battery":[3.9,3.89]}"#;
        assert!(serde_json::from_str::<RollingHistory>(json).is_err());
    }

    #[test]
    fn test_csv_export() {
        let mut history = RollingHistory::with_capacity(2);
        history.push(23.4567, 1013.251, 3.91234);
        history.push(23.5, 1013.0, 3.9);

        let csv = history.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Index,Temperature (°C),Pressure (hPa),Battery (V)");
        assert_eq!(lines[1], "0,23.46,1013.25,3.912");
        assert_eq!(lines[2], "1,23.50,1013.00,3.900");
        assert_eq!(lines.len(), 3);
    }
}
