//! Wi-Fi credentials persisted in the last flash sector.
//!
//! The record is small and self-checking:
//!
//! - Magic number (4 bytes): `0x4443_4643` ('DCFC')
//! - Type hash (4 bytes): FNV-1a hash of the record's type name
//! - Payload length (2 bytes)
//! - Payload: postcard-serialized [`StoredNetwork`]
//! - CRC32 (4 bytes) over everything before it
//!
//! Erased flash reads as no record. A record that was written but fails its checks is
//! reported as corrupted.
//!
//! A factory reset does not erase the sector. It writes a record with no credentials, so the
//! next boot stays offline instead of falling back to the build-time defaults.

use crc32fast::Hasher;
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const MAGIC: u32 = 0x4443_4643; // 'DCFC'
const HEADER_SIZE: usize = 4 + 4 + 2;
const CRC_SIZE: usize = 4;

/// Bytes read and written per record. Large enough for the longest SSID and passphrase.
pub const RECORD_LEN: usize = 256;
const MAX_PAYLOAD_SIZE: usize = RECORD_LEN - HEADER_SIZE - CRC_SIZE;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String<32>,
    pub password: String<64>,
}

impl WifiCredentials {
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the SSID is over 32 bytes or the password over 64.
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|()| Error::Format)?,
            password: String::try_from(password).map_err(|()| Error::Format)?,
        })
    }
}

/// What is kept in flash.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StoredNetwork {
    /// `None` after a factory reset.
    pub credentials: Option<WifiCredentials>,
}

impl StoredNetwork {
    #[must_use]
    pub const fn forgotten() -> Self {
        Self { credentials: None }
    }
}

/// Serialize `network` into `record`. Bytes past the CRC are left as erased flash (`0xFF`).
///
/// # Errors
///
/// Returns [`Error::Format`] if the payload does not fit.
pub fn encode_record(network: &StoredNetwork, record: &mut [u8; RECORD_LEN]) -> Result<()> {
    record.fill(0xFF);

    let (header, rest) = record.split_at_mut(HEADER_SIZE);
    let payload_area = rest.get_mut(..MAX_PAYLOAD_SIZE).ok_or(Error::Format)?;
    let payload_len = postcard::to_slice(network, payload_area)
        .map_err(|_| Error::Format)?
        .len();
    let payload_len_u16 = u16::try_from(payload_len).map_err(|_| Error::Format)?;

    let mut header_bytes = [0_u8; HEADER_SIZE];
    header_bytes[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    header_bytes[4..8].copy_from_slice(&compute_type_hash::<StoredNetwork>().to_le_bytes());
    header_bytes[8..10].copy_from_slice(&payload_len_u16.to_le_bytes());
    header.copy_from_slice(&header_bytes);

    let crc_offset = HEADER_SIZE + payload_len;
    let crc = compute_crc(record.get(..crc_offset).ok_or(Error::Format)?);
    record
        .get_mut(crc_offset..crc_offset + CRC_SIZE)
        .ok_or(Error::Format)?
        .copy_from_slice(&crc.to_le_bytes());
    Ok(())
}

/// Parse a record read back from flash.
///
/// Returns `Ok(None)` for erased flash or a record of another type.
///
/// # Errors
///
/// Returns [`Error::CredentialStorageCorrupted`] if the length, CRC or payload is bad.
pub fn decode_record(record: &[u8; RECORD_LEN]) -> Result<Option<StoredNetwork>> {
    if read_u32(record, 0) != Some(MAGIC) {
        return Ok(None);
    }
    if read_u32(record, 4) != Some(compute_type_hash::<StoredNetwork>()) {
        #[cfg(feature = "defmt")]
        defmt::info!("Credential record has a different layout; ignoring it");
        return Ok(None);
    }

    let payload_len = record
        .get(8..10)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u16::from_le_bytes)
        .map(usize::from)
        .ok_or(Error::CredentialStorageCorrupted)?;
    if payload_len > MAX_PAYLOAD_SIZE {
        #[cfg(feature = "defmt")]
        defmt::error!("Credential record length {} is invalid", payload_len);
        return Err(Error::CredentialStorageCorrupted);
    }

    let crc_offset = HEADER_SIZE + payload_len;
    let computed_crc = compute_crc(
        record
            .get(..crc_offset)
            .ok_or(Error::CredentialStorageCorrupted)?,
    );
    if read_u32(record, crc_offset) != Some(computed_crc) {
        #[cfg(feature = "defmt")]
        defmt::error!("Credential record CRC mismatch");
        return Err(Error::CredentialStorageCorrupted);
    }

    let payload = record
        .get(HEADER_SIZE..crc_offset)
        .ok_or(Error::CredentialStorageCorrupted)?;
    postcard::from_bytes(payload)
        .map(Some)
        .map_err(|_| Error::CredentialStorageCorrupted)
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at.checked_add(4)?)
        .and_then(|word| word.try_into().ok())
        .map(u32::from_le_bytes)
}

/// FNV-1a of the type name, so a record written by an older layout is not misread.
fn compute_type_hash<T>() -> u32 {
    const FNV_PRIME: u32 = 16_777_619;
    const FNV_OFFSET: u32 = 2_166_136_261;

    core::any::type_name::<T>()
        .bytes()
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(feature = "device")]
pub use flash::{CredentialStore, INTERNAL_FLASH_SIZE};

#[cfg(feature = "device")]
mod flash {
    use defmt::{info, warn};
    use embassy_rp::flash::{Blocking, ERASE_SIZE, Flash};
    use embassy_rp::peripherals::FLASH;

    use super::{RECORD_LEN, StoredNetwork, WifiCredentials, decode_record, encode_record};
    use crate::{Error, Result};

    /// Internal flash size for Raspberry Pi Pico 2 (4 MB).
    #[cfg(feature = "pico2")]
    pub const INTERNAL_FLASH_SIZE: usize = 4 * 1024 * 1024;

    /// Internal flash size for Raspberry Pi Pico 1 W (2 MB).
    #[cfg(not(feature = "pico2"))]
    pub const INTERNAL_FLASH_SIZE: usize = 2 * 1024 * 1024;

    // Last sector of flash, well past the firmware image.
    const RECORD_OFFSET: u32 = (INTERNAL_FLASH_SIZE - ERASE_SIZE) as u32;

    /// The credential record in the last flash sector.
    pub struct CredentialStore {
        flash: Flash<'static, FLASH, Blocking, INTERNAL_FLASH_SIZE>,
    }

    impl CredentialStore {
        #[must_use]
        pub const fn new(flash: Flash<'static, FLASH, Blocking, INTERNAL_FLASH_SIZE>) -> Self {
            Self { flash }
        }

        /// # Errors
        ///
        /// Returns [`Error::Flash`] if the read fails, or
        /// [`Error::CredentialStorageCorrupted`] if the record does not check out.
        pub fn load(&mut self) -> Result<Option<StoredNetwork>> {
            let mut record = [0_u8; RECORD_LEN];
            self.flash
                .blocking_read(RECORD_OFFSET, &mut record)
                .map_err(Error::Flash)?;
            decode_record(&record)
        }

        /// Erase the sector and write `network`. Takes on the order of 100 ms.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Flash`] if the erase or write fails.
        pub fn save(&mut self, network: &StoredNetwork) -> Result<()> {
            let mut record = [0_u8; RECORD_LEN];
            encode_record(network, &mut record)?;
            self.flash
                .blocking_erase(RECORD_OFFSET, RECORD_OFFSET + ERASE_SIZE as u32)
                .map_err(Error::Flash)?;
            self.flash
                .blocking_write(RECORD_OFFSET, &record)
                .map_err(Error::Flash)?;
            info!("Saved WiFi credential record");
            Ok(())
        }

        /// Replace whatever is stored with an explicit "no credentials" record.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Flash`] if the erase or write fails.
        pub fn forget(&mut self) -> Result<()> {
            self.save(&StoredNetwork::forgotten())
        }

        /// The credentials to join with.
        ///
        /// On first boot (no record yet) the build-time defaults are written and returned. A
        /// corrupted record is treated the same way. A forgotten record stays forgotten.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Flash`] if flash access fails, or [`Error::Format`] if the
        /// defaults are too long.
        pub fn load_or_seed(
            &mut self,
            default_ssid: &str,
            default_password: &str,
        ) -> Result<Option<WifiCredentials>> {
            match self.load() {
                Ok(Some(stored)) => {
                    if stored.credentials.is_none() {
                        info!("WiFi credentials were forgotten; staying offline");
                    }
                    return Ok(stored.credentials);
                }
                Ok(None) => info!("No WiFi credential record; seeding from build config"),
                Err(Error::CredentialStorageCorrupted) => {
                    warn!("WiFi credential record corrupted; reseeding from build config");
                }
                Err(err) => return Err(err),
            }

            let credentials = if default_ssid.is_empty() {
                None
            } else {
                Some(WifiCredentials::new(default_ssid, default_password)?)
            };
            self.save(&StoredNetwork {
                credentials: credentials.clone(),
            })?;
            Ok(credentials)
        }
    }
}
