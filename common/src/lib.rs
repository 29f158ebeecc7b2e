pub mod config;
pub mod controller;
pub mod engine;
pub mod latch;
pub mod sensor;
pub mod smoothing;
pub mod store;
pub mod types;

pub use config::{ControllerConfig, ThermostatSettings};
pub use controller::Controller;
pub use engine::DecisionEngine;
pub use latch::OutputLatch;
pub use sensor::{raw_to_degrees_f, OutputDevice, TemperatureSensor};
pub use smoothing::TemperatureSmoother;
pub use store::{decode, encode, SettingsMedium, SettingsStore};
pub use types::{ControllerStatus, Mode, SaveReport};
