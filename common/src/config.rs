use serde::{Deserialize, Serialize};

use crate::types::Mode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub sample_interval_ms: u64,
    /// Decision cadence. The control loop currently re-evaluates the engine
    /// on every pass and does not gate on this value.
    pub decision_interval_ms: u64,
    pub smoothing_window: usize,
    pub hysteresis_f: f32,
    /// Readings below this are treated as a failed sensor; the device is
    /// forced off until the reading recovers.
    pub fail_safe_floor_f: f32,
    pub min_off_time_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1_000,
            decision_interval_ms: 5_000,
            smoothing_window: 60,
            hysteresis_f: 0.05,
            fail_safe_floor_f: 1.0,
            min_off_time_ms: 300_000,
        }
    }
}

/// The record persisted across power cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermostatSettings {
    pub setpoint_f: f32,
    pub power_on: bool,
    pub mode: Mode,
}

impl Default for ThermostatSettings {
    fn default() -> Self {
        Self {
            setpoint_f: 73.5,
            power_on: false,
            mode: Mode::Heat,
        }
    }
}
