//! Time utilities for the fixed-step simulation

use std::time::{Duration, Instant};

/// Simulation rate in ticks per second
pub const SIMULATION_TPS: u32 = 30;
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// Fixed step in seconds
pub fn tick_delta() -> f32 {
    1.0 / SIMULATION_TPS as f32
}

/// Wall-clock period of one tick
pub fn tick_period() -> Duration {
    Duration::from_micros(TICK_DURATION_MICROS)
}

/// Convert seconds to whole ticks, rounding up
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs.max(0.0) * SIMULATION_TPS as f32).ceil() as u32
}

/// Convert ticks to seconds
pub fn ticks_to_secs(ticks: u32) -> f32 {
    ticks as f32 / SIMULATION_TPS as f32
}

/// A simple timer for measuring how long a tick took
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_conversions() {
        assert_eq!(tick_period(), Duration::from_micros(33_333));
        assert_eq!(secs_to_ticks(5.0), 150);
        assert_eq!(secs_to_ticks(0.01), 1);
        assert_eq!(secs_to_ticks(-1.0), 0);
        assert!((ticks_to_secs(15) - 0.5).abs() < 1e-6);
        assert!((tick_delta() * SIMULATION_TPS as f32 - 1.0).abs() < 1e-6);
    }
}
