use crate::{
    config::{ControllerConfig, ThermostatSettings},
    engine::DecisionEngine,
    latch::OutputLatch,
    sensor::{raw_to_degrees_f, OutputDevice, TemperatureSensor},
    smoothing::TemperatureSmoother,
    types::{ControllerStatus, Mode},
};

/// The whole per-device control state: settings, smoothing ring, decision
/// engine, and output latch, driven by `tick`. Nothing here is global;
/// the process owns exactly one of these and serializes access to it, so
/// settings requests apply between ticks, never inside one.
#[derive(Debug)]
pub struct Controller {
    config: ControllerConfig,
    settings: ThermostatSettings,
    smoother: TemperatureSmoother,
    engine: DecisionEngine,
    latch: OutputLatch,
    smoothed_temp_f: f32,
    last_sample_ms: Option<u64>,
}

impl Controller {
    pub fn new(config: ControllerConfig, settings: ThermostatSettings) -> Self {
        let smoother = TemperatureSmoother::new(config.smoothing_window);
        Self {
            config,
            settings,
            smoother,
            engine: DecisionEngine::new(),
            latch: OutputLatch::new(),
            smoothed_temp_f: 0.0,
            last_sample_ms: None,
        }
    }

    /// One pass of the control loop: sample on the sampling cadence,
    /// evaluate the decision engine every pass, and latch the output.
    pub fn tick(
        &mut self,
        sensor: &mut impl TemperatureSensor,
        output: &mut impl OutputDevice,
        now_ms: u64,
    ) {
        if self.sample_due(now_ms) {
            self.last_sample_ms = Some(now_ms);
            let raw = sensor.read_raw();
            self.smoothed_temp_f = self.smoother.update(raw_to_degrees_f(raw));
        }

        let requested = self
            .engine
            .evaluate(self.smoothed_temp_f, &self.settings, &self.config, now_ms);
        self.latch.apply(requested, output);
    }

    fn sample_due(&self, now_ms: u64) -> bool {
        match self.last_sample_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.config.sample_interval_ms,
            None => true,
        }
    }

    pub fn setpoint_up(&mut self) -> f32 {
        self.settings.setpoint_f += 0.1;
        self.settings.setpoint_f
    }

    pub fn setpoint_down(&mut self) -> f32 {
        self.settings.setpoint_f -= 0.1;
        self.settings.setpoint_f
    }

    pub fn set_power(&mut self, on: bool) -> bool {
        if self.settings.power_on != on {
            self.settings.power_on = on;
            true
        } else {
            false
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.settings.mode != mode {
            self.settings.mode = mode;
            true
        } else {
            false
        }
    }

    pub fn settings(&self) -> &ThermostatSettings {
        &self.settings
    }

    pub fn device_on(&self) -> bool {
        self.latch.last_applied()
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            current_temp: self.smoothed_temp_f,
            setpoint: self.settings.setpoint_f,
            device_on: self.engine.last_requested(),
            power_on: self.settings.power_on,
            mode: self.settings.mode.as_str(),
        }
    }
}
