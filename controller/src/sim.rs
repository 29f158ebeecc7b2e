use tracing::info;

use webtherm_common::{sensor::VOLTS_PER_COUNT, OutputDevice, TemperatureSensor};

/// Host-build sensor stand-in.
///
/// Hardware integration point: replace with a real ADC channel driver on
/// device builds. Emits raw counts for a room temperature drifting
/// slowly around `base_f` so the hysteresis band actually gets exercised.
pub struct SimulatedSensor {
    base_f: f32,
    tick: u64,
}

impl SimulatedSensor {
    pub fn new(base_f: f32) -> Self {
        Self { base_f, tick: 0 }
    }
}

impl TemperatureSensor for SimulatedSensor {
    fn read_raw(&mut self) -> f32 {
        self.tick = self.tick.wrapping_add(1);
        // Triangle wave, +-1.2 F over a 240-sample period.
        let phase = (self.tick % 240) as f32;
        let offset = if phase < 120.0 { phase } else { 240.0 - phase } * 0.01;
        degrees_to_raw(self.base_f + offset)
    }
}

/// Inverse of the core's reading conversion, for synthesizing counts.
pub fn degrees_to_raw(degrees_f: f32) -> f32 {
    let degrees_c = (degrees_f - 32.0) * 5.0 / 9.0;
    (degrees_c / 100.0 + 0.5) / VOLTS_PER_COUNT
}

/// Relay stand-in that logs transitions; the GPIO write hooks in here on
/// device builds.
pub struct RelayPin;

impl OutputDevice for RelayPin {
    fn set_output(&mut self, on: bool) {
        info!(on, "relay output changed");
    }
}
