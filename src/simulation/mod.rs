// src/simulation/mod.rs
//! Local synthesis of plausible device readings.
//!
//! Temperature follows a damped random walk around its baseline; every other
//! field is fresh jitter around a fixed baseline each tick. Health and trend are
//! re-rolled independently per tick, so a degraded health reading is coarse
//! fault injection rather than anything the device reported.

mod clock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use crate::types::reading::clamp_percent;
use crate::types::{HealthState, PowerProfile, Reading, RollingHistory, WeatherTrend};

pub const BASE_TEMPERATURE: f64 = 23.5;
pub const BASE_HUMIDITY: f64 = 45.0;
pub const BASE_PRESSURE: f64 = 1013.25;
pub const BASE_ALTITUDE: f64 = 20.0;
pub const BASE_BATTERY: f64 = 3.8;
pub const TEMPERATURE_DAMPING: f64 = 0.9;
pub const DEGRADED_PROBABILITY: f64 = 0.1;
pub const INITIAL_UPTIME_SECS: u64 = 3600;

pub use clock::UptimeClock;

#[derive(Debug)]
pub struct Simulator {
    rng: StdRng,
    clock: UptimeClock,
}

impl Simulator {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy(), clock: UptimeClock::new() }
    }

    /// Deterministic simulator for tests
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), clock: UptimeClock::new() }
    }

    /// Symmetric jitter in `[-half_width, half_width)`
    fn jitter(&mut self, half_width: f64) -> f64 {
        self.rng.gen_range(-half_width..half_width)
    }

    /// Uniform sample in `[base, base + span)`.
    fn above(&mut self, base: f64, span: f64) -> f64 {
        base + self.rng.gen_range(0.0..span)
    }

    pub fn seed_history(&mut self) -> RollingHistory {
        RollingHistory::seeded(&mut self.rng)
    }

    /// Next reading taken at `now`; uptime advances by the real time since the last sample.
    pub fn sample(&mut self, prev: Option<&Reading>, now: Instant) -> Reading {
        let elapsed_secs = self.clock.advance(now);
        self.next_reading(prev, elapsed_secs)
    }

    pub fn next_reading(&mut self, prev: Option<&Reading>, elapsed_secs: u64) -> Reading {
        let carried = prev
            .map(|p| (p.temperature - BASE_TEMPERATURE) * TEMPERATURE_DAMPING)
            .unwrap_or(0.0);
        let temperature = BASE_TEMPERATURE + self.jitter(1.0) + carried;

        let humidity = clamp_percent(BASE_HUMIDITY + self.jitter(2.5));
        let pressure = BASE_PRESSURE + self.jitter(1.0);
        let altitude = BASE_ALTITUDE + self.jitter(1.0);

        let battery = BASE_BATTERY + self.jitter(0.1);
        let battery_percent = clamp_percent((75.0 + self.jitter(5.0)).round());

        let free_heap = self.above(35000.0, 5000.0).round();
        let heap_percent = clamp_percent(self.above(55.0, 10.0).round());
        let cpu_load = clamp_percent(self.above(15.0, 20.0).round());

        let wifi_rssi = self.above(-55.0, 20.0).round();
        let wifi_quality = clamp_percent(self.above(75.0, 20.0).round());

        let uptime = match prev {
            Some(p) => p.uptime.saturating_add(elapsed_secs),
            None => INITIAL_UPTIME_SECS,
        };

        let health = if self.rng.gen_bool(DEGRADED_PROBABILITY) {
            HealthState::Degraded
        } else {
            HealthState::Normal
        };
        let trend = WeatherTrend::ALL[self.rng.gen_range(0..WeatherTrend::ALL.len())];
        let pressure_rate = self.jitter(1.0);

        let mut reading = Reading {
            temperature,
            humidity,
            pressure,
            altitude,
            battery,
            battery_percent,
            free_heap,
            heap_percent,
            cpu_load,
            wifi_rssi,
            wifi_quality,
            uptime,
            health: 0,
            health_text: String::new(),
            health_class: String::new(),
            trend: 0,
            trend_text: String::new(),
            pressure_rate,
            profile: 0,
            profile_name: String::new(),
            runtime_text: "180 min".to_string(),
            dht_valid: true,
            bmp_valid: true,
        };
        reading.set_health(health);
        reading.set_trend(trend);
        reading.set_profile(PowerProfile::Balanced);

        reading
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
