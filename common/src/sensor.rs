/// Raw analog reading source. Implementations return the unconverted ADC
/// count; conversion to engineering units happens in [`raw_to_degrees_f`].
pub trait TemperatureSensor {
    fn read_raw(&mut self) -> f32;
}

/// Single boolean actuator (relay, SSR, ...). Called only on latched state
/// changes, never every tick.
pub trait OutputDevice {
    fn set_output(&mut self, on: bool);
}

// 3.1 V across a 10-bit ADC range.
pub const VOLTS_PER_COUNT: f32 = 0.003_027_343_75;

pub fn raw_to_degrees_f(raw: f32) -> f32 {
    let volts = raw * VOLTS_PER_COUNT;
    let degrees_c = (volts - 0.5) * 100.0;
    degrees_c * (9.0 / 5.0) + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_volt_reads_as_freezing() {
        // 0.5 V is the sensor's 0 C point.
        let raw = 0.5 / VOLTS_PER_COUNT;
        assert!((raw_to_degrees_f(raw) - 32.0).abs() < 1e-3);
    }

    #[test]
    fn room_temperature_conversion() {
        // 0.71 V -> 21 C -> 69.8 F
        let raw = 0.71 / VOLTS_PER_COUNT;
        assert!((raw_to_degrees_f(raw) - 69.8).abs() < 1e-3);
    }

    #[test]
    fn zero_count_is_far_below_fail_safe() {
        assert!((raw_to_degrees_f(0.0) - (-58.0)).abs() < 1e-3);
    }
}
