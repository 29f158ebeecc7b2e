use crate::{
    config::ThermostatSettings,
    types::{Mode, SaveReport},
};

// Fixed storage image. Layout is load-bearing: existing devices already
// carry settings at these addresses.
pub const MARKER_ADDR: u16 = 0;
pub const SETPOINT_HI_ADDR: u16 = 5;
pub const SETPOINT_LO_ADDR: u16 = 6;
pub const POWER_ADDR: u16 = 10;
pub const MODE_ADDR: u16 = 11;
pub const IMAGE_LEN: usize = 12;

/// Marker sentinel meaning valid settings follow.
pub const MARKER_VALID: u8 = 0x99;
/// Marker sentinel written by an explicit erase. Any marker other than
/// [`MARKER_VALID`] decodes as "no data".
pub const MARKER_ERASED: u8 = 0x98;

/// Setpoint is stored to one decimal place as a 16-bit word.
pub fn setpoint_word(setpoint_f: f32) -> u16 {
    (setpoint_f * 10.0).round() as u16
}

pub fn encode(settings: &ThermostatSettings) -> [u8; IMAGE_LEN] {
    let mut image = [0u8; IMAGE_LEN];
    let word = setpoint_word(settings.setpoint_f);
    image[MARKER_ADDR as usize] = MARKER_VALID;
    image[SETPOINT_HI_ADDR as usize] = (word >> 8) as u8;
    image[SETPOINT_LO_ADDR as usize] = (word & 0xff) as u8;
    image[POWER_ADDR as usize] = settings.power_on as u8;
    image[MODE_ADDR as usize] = settings.mode.to_flag();
    image
}

/// `None` unless the marker byte says valid data is present. Never returns
/// partial data; absent settings mean "use the compiled-in defaults".
pub fn decode(image: &[u8; IMAGE_LEN]) -> Option<ThermostatSettings> {
    if image[MARKER_ADDR as usize] != MARKER_VALID {
        return None;
    }

    let word = u16::from_be_bytes([
        image[SETPOINT_HI_ADDR as usize],
        image[SETPOINT_LO_ADDR as usize],
    ]);

    Some(ThermostatSettings {
        setpoint_f: word as f32 / 10.0,
        power_on: image[POWER_ADDR as usize] != 0,
        mode: Mode::from_flag(image[MODE_ADDR as usize]),
    })
}

/// Byte-addressable non-volatile medium. Writes are buffered and not
/// durable until `commit`.
pub trait SettingsMedium {
    type Error;

    fn read(&mut self, addr: u16) -> Result<u8, Self::Error>;
    fn write(&mut self, addr: u16, value: u8) -> Result<(), Self::Error>;
    fn commit(&mut self) -> Result<(), Self::Error>;
}

/// Owns the medium plus a mirror of the last value known to be stored for
/// each field, so a save writes only what actually changed. Storage media
/// have bounded write endurance; a no-op save must produce zero traffic.
#[derive(Debug)]
pub struct SettingsStore<M> {
    medium: M,
    stored_setpoint_word: u16,
    stored_power: bool,
    stored_mode: Mode,
}

impl<M: SettingsMedium> SettingsStore<M> {
    pub fn new(medium: M) -> Self {
        Self {
            medium,
            stored_setpoint_word: 0,
            stored_power: false,
            stored_mode: Mode::Heat,
        }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Reads the image back and decodes it, refreshing the dirty-tracking
    /// mirrors when valid settings are present.
    pub fn load(&mut self) -> Result<Option<ThermostatSettings>, M::Error> {
        let mut image = [0u8; IMAGE_LEN];
        for (addr, slot) in image.iter_mut().enumerate() {
            *slot = self.medium.read(addr as u16)?;
        }

        let settings = decode(&image);
        if let Some(settings) = &settings {
            self.stored_setpoint_word = setpoint_word(settings.setpoint_f);
            self.stored_power = settings.power_on;
            self.stored_mode = settings.mode;
        }
        Ok(settings)
    }

    /// Writes the fields that differ from the stored mirrors. The valid
    /// marker is written, and the medium committed, only if at least one
    /// field changed.
    pub fn save(&mut self, settings: &ThermostatSettings) -> Result<SaveReport, M::Error> {
        let mut report = SaveReport::default();

        let word = setpoint_word(settings.setpoint_f);
        if word != self.stored_setpoint_word {
            self.stored_setpoint_word = word;
            self.medium.write(SETPOINT_HI_ADDR, (word >> 8) as u8)?;
            self.medium.write(SETPOINT_LO_ADDR, (word & 0xff) as u8)?;
            report.setpoint_written = true;
        }

        if settings.power_on != self.stored_power {
            self.stored_power = settings.power_on;
            self.medium.write(POWER_ADDR, settings.power_on as u8)?;
            report.power_written = true;
        }

        if settings.mode != self.stored_mode {
            self.stored_mode = settings.mode;
            self.medium.write(MODE_ADDR, settings.mode.to_flag())?;
            report.mode_written = true;
        }

        if report.any_written() {
            self.medium.write(MARKER_ADDR, MARKER_VALID)?;
            self.medium.commit()?;
        }

        Ok(report)
    }

    /// Marks the stored data invalid. Value bytes are left in place; only
    /// the marker changes, so a later decode yields `None`.
    pub fn erase(&mut self) -> Result<(), M::Error> {
        self.medium.write(MARKER_ADDR, MARKER_ERASED)?;
        self.medium.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// RAM medium that counts write and commit traffic.
    struct MockMedium {
        image: [u8; 64],
        writes: usize,
        commits: usize,
    }

    impl MockMedium {
        fn blank() -> Self {
            Self {
                image: [0u8; 64],
                writes: 0,
                commits: 0,
            }
        }
    }

    impl SettingsMedium for MockMedium {
        type Error = std::convert::Infallible;

        fn read(&mut self, addr: u16) -> Result<u8, Self::Error> {
            Ok(self.image[addr as usize])
        }

        fn write(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
            self.image[addr as usize] = value;
            self.writes += 1;
            Ok(())
        }

        fn commit(&mut self) -> Result<(), Self::Error> {
            self.commits += 1;
            Ok(())
        }
    }

    fn sample_settings() -> ThermostatSettings {
        ThermostatSettings {
            setpoint_f: 73.5,
            power_on: true,
            mode: Mode::Cool,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let settings = sample_settings();
        assert_eq!(decode(&encode(&settings)), Some(settings));
    }

    #[test]
    fn encode_lays_out_the_agreed_image() {
        let image = encode(&sample_settings());
        assert_eq!(image[0], MARKER_VALID);
        // 73.5 F -> 735 -> 0x02DF big-endian at bytes 5..=6.
        assert_eq!(image[5], 0x02);
        assert_eq!(image[6], 0xdf);
        assert_eq!(image[10], 1);
        assert_eq!(image[11], 1);
    }

    #[test]
    fn decode_rejects_erased_and_unknown_markers() {
        let mut image = encode(&sample_settings());
        image[MARKER_ADDR as usize] = MARKER_ERASED;
        assert_eq!(decode(&image), None);

        image[MARKER_ADDR as usize] = 0x42;
        assert_eq!(decode(&image), None);
    }

    #[test]
    fn load_from_blank_medium_is_absent() {
        let mut store = SettingsStore::new(MockMedium::blank());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips_through_the_medium() {
        let mut store = SettingsStore::new(MockMedium::blank());
        let settings = sample_settings();

        let report = store.save(&settings).unwrap();
        assert!(report.setpoint_written && report.power_written && report.mode_written);
        assert_eq!(store.load().unwrap(), Some(settings));
    }

    #[test]
    fn unchanged_save_produces_zero_traffic() {
        let mut store = SettingsStore::new(MockMedium::blank());
        let settings = sample_settings();
        store.save(&settings).unwrap();

        let before = (store.medium().writes, store.medium().commits);
        let report = store.save(&settings).unwrap();

        assert_eq!(report, SaveReport::default());
        assert_eq!((store.medium().writes, store.medium().commits), before);
    }

    #[test]
    fn save_writes_only_the_dirty_field() {
        let mut store = SettingsStore::new(MockMedium::blank());
        let mut settings = sample_settings();
        store.save(&settings).unwrap();

        settings.power_on = false;
        let writes_before = store.medium().writes;
        let report = store.save(&settings).unwrap();

        assert_eq!(
            report,
            SaveReport {
                power_written: true,
                ..SaveReport::default()
            }
        );
        // Power byte plus the marker, nothing else.
        assert_eq!(store.medium().writes, writes_before + 2);
    }

    #[test]
    fn erase_invalidates_but_keeps_the_payload() {
        let mut store = SettingsStore::new(MockMedium::blank());
        store.save(&sample_settings()).unwrap();
        store.erase().unwrap();

        assert_eq!(store.medium().image[5], 0x02);
        assert_eq!(store.medium().image[6], 0xdf);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_after_erase_with_no_changes_leaves_the_marker_erased() {
        // Write-cycle conservation wins: nothing dirty means nothing is
        // written, marker included.
        let mut store = SettingsStore::new(MockMedium::blank());
        let settings = sample_settings();
        store.save(&settings).unwrap();
        store.erase().unwrap();

        let report = store.save(&settings).unwrap();
        assert_eq!(report, SaveReport::default());
        assert_eq!(store.medium().image[MARKER_ADDR as usize], MARKER_ERASED);
    }

    #[test]
    fn one_decimal_setpoints_survive_the_word_encoding() {
        for tenths in 600..=840 {
            let settings = ThermostatSettings {
                setpoint_f: tenths as f32 / 10.0,
                power_on: false,
                mode: Mode::Heat,
            };
            let decoded = decode(&encode(&settings)).unwrap();
            assert_eq!(setpoint_word(decoded.setpoint_f), tenths as u16);
        }
    }
}
