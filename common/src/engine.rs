use crate::{
    config::{ControllerConfig, ThermostatSettings},
    types::Mode,
};

/// Heat/cool hysteresis state machine.
///
/// Carries only what must survive between ticks: the previous decision and
/// the timestamp of the last shutdown that arms the compressor restart
/// guard. Everything else arrives as inputs, making `evaluate` a total
/// function with no failure path.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    last_requested: bool,
    shutdown_at_ms: u64,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_requested(&self) -> bool {
        self.last_requested
    }

    /// Decides whether the device should be energized this tick.
    ///
    /// Rule order: fail-safe floor beats everything, then the power
    /// switch, then the per-mode hysteresis. Heat mode resolves the band
    /// interior to off; cool mode holds its previous decision there and
    /// additionally gates the energize transition on the minimum off-time.
    pub fn evaluate(
        &mut self,
        smoothed_temp: f32,
        settings: &ThermostatSettings,
        config: &ControllerConfig,
        now_ms: u64,
    ) -> bool {
        let previous = self.last_requested;
        let fail_safe = smoothed_temp < config.fail_safe_floor_f;

        let requested = if fail_safe || !settings.power_on {
            false
        } else {
            match settings.mode {
                Mode::Heat => smoothed_temp <= settings.setpoint_f - config.hysteresis_f,
                Mode::Cool => {
                    if smoothed_temp >= settings.setpoint_f + config.hysteresis_f
                        && self.restart_guard_elapsed(config, now_ms)
                    {
                        true
                    } else if smoothed_temp <= settings.setpoint_f {
                        false
                    } else {
                        previous
                    }
                }
            }
        };

        // One shutdown timestamp is shared across every cause that arms the
        // restart guard: fail-safe, power off, and the cool-mode off rule.
        // Heat-mode off edges leave it alone.
        let arms_guard = fail_safe || !settings.power_on || settings.mode == Mode::Cool;
        if previous && !requested && arms_guard {
            self.shutdown_at_ms = now_ms;
        }

        self.last_requested = requested;
        requested
    }

    // Wrapping difference, not deadline comparison: stays correct if the
    // millisecond clock ever rolls over. Starting at zero also keeps
    // cooling locked out for the first min_off_time_ms of uptime.
    fn restart_guard_elapsed(&self, config: &ControllerConfig, now_ms: u64) -> bool {
        now_ms.wrapping_sub(self.shutdown_at_ms) >= config.min_off_time_ms
    }
}
