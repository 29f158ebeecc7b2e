use std::{fs, io, path::PathBuf};

use thiserror::Error;

use webtherm_common::SettingsMedium;

/// Size of the persisted image; the device reserves a 512-byte EEPROM page.
pub const IMAGE_SIZE: usize = 512;

#[derive(Debug, Error)]
pub enum MediumError {
    #[error("storage image i/o: {0}")]
    Io(#[from] io::Error),
    #[error("address {0:#06x} outside the {IMAGE_SIZE}-byte image")]
    OutOfRange(u16),
}

/// EEPROM-style medium backed by a small file. The whole image lives in
/// RAM; `write` touches only the buffer and nothing reaches disk until
/// `commit`.
#[derive(Debug)]
pub struct EepromFile {
    path: PathBuf,
    image: [u8; IMAGE_SIZE],
}

impl EepromFile {
    /// A missing file is never-written storage: a blank image.
    pub fn open(path: PathBuf) -> Result<Self, MediumError> {
        let mut image = [0u8; IMAGE_SIZE];
        match fs::read(&path) {
            Ok(bytes) => {
                let len = bytes.len().min(IMAGE_SIZE);
                image[..len].copy_from_slice(&bytes[..len]);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        Ok(Self { path, image })
    }
}

impl SettingsMedium for EepromFile {
    type Error = MediumError;

    fn read(&mut self, addr: u16) -> Result<u8, MediumError> {
        self.image
            .get(addr as usize)
            .copied()
            .ok_or(MediumError::OutOfRange(addr))
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), MediumError> {
        match self.image.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MediumError::OutOfRange(addr)),
        }
    }

    fn commit(&mut self) -> Result<(), MediumError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.image.as_slice())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("webtherm-{}-{name}.bin", std::process::id()))
    }

    #[test]
    fn missing_file_opens_blank() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);

        let mut medium = EepromFile::open(path).unwrap();
        assert_eq!(medium.read(0).unwrap(), 0);
        assert_eq!(medium.read((IMAGE_SIZE - 1) as u16).unwrap(), 0);
    }

    #[test]
    fn writes_are_invisible_until_commit() {
        let path = scratch_path("buffered");
        let _ = fs::remove_file(&path);

        let mut medium = EepromFile::open(path.clone()).unwrap();
        medium.write(3, 0xab).unwrap();

        // No commit yet: reopening sees the blank image.
        let mut reopened = EepromFile::open(path.clone()).unwrap();
        assert_eq!(reopened.read(3).unwrap(), 0);

        medium.commit().unwrap();
        let mut committed = EepromFile::open(path.clone()).unwrap();
        assert_eq!(committed.read(3).unwrap(), 0xab);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn out_of_range_addresses_are_rejected() {
        let path = scratch_path("range");
        let _ = fs::remove_file(&path);

        let mut medium = EepromFile::open(path).unwrap();
        assert!(matches!(
            medium.read(IMAGE_SIZE as u16),
            Err(MediumError::OutOfRange(_))
        ));
        assert!(matches!(
            medium.write(IMAGE_SIZE as u16, 1),
            Err(MediumError::OutOfRange(_))
        ));
    }
}
