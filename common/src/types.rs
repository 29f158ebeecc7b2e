use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Heat,
    Cool,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
        }
    }

    /// Persisted flag byte: Heat = 0, Cool = 1.
    pub fn to_flag(self) -> u8 {
        match self {
            Self::Heat => 0,
            Self::Cool => 1,
        }
    }

    pub fn from_flag(byte: u8) -> Self {
        if byte == 0 {
            Self::Heat
        } else {
            Self::Cool
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    #[serde(rename = "currentTemp")]
    pub current_temp: f32,
    pub setpoint: f32,
    #[serde(rename = "deviceOn")]
    pub device_on: bool,
    #[serde(rename = "powerOn")]
    pub power_on: bool,
    pub mode: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    #[serde(rename = "setpointWritten")]
    pub setpoint_written: bool,
    #[serde(rename = "powerWritten")]
    pub power_written: bool,
    #[serde(rename = "modeWritten")]
    pub mode_written: bool,
}

impl SaveReport {
    pub fn any_written(&self) -> bool {
        self.setpoint_written || self.power_written || self.mode_written
    }
}
