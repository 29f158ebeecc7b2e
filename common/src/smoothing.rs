/// Rolling-average noise filter over a fixed window of sensor readings.
///
/// Slots the ring has not yet seen read as 0.0 and are included in the
/// mean, so the average is biased low until `window` samples have been
/// collected. That warm-up bias is intentional; callers wanting a
/// corrected ramp-up should gate on uptime instead.
#[derive(Debug, Clone)]
pub struct TemperatureSmoother {
    samples: Vec<f32>,
    write_index: usize,
}

impl TemperatureSmoother {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "smoothing window must be non-zero");
        Self {
            samples: vec![0.0; window],
            write_index: 0,
        }
    }

    /// Stores one reading and returns the mean of the whole window.
    pub fn update(&mut self, degrees_f: f32) -> f32 {
        self.samples[self.write_index] = degrees_f;
        self.write_index = (self.write_index + 1) % self.samples.len();
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn window(&self) -> usize {
        self.samples.len()
    }
}
