//! Host-level tests for the flash record holding the Wi-Fi credentials.

use dcf_clock::Error;
use dcf_clock::credential_store::{
    RECORD_LEN, StoredNetwork, WifiCredentials, decode_record, encode_record,
};

fn home_network() -> StoredNetwork {
    StoredNetwork {
        credentials: Some(WifiCredentials::new("HomeNet", "correct horse battery").unwrap()),
    }
}

#[test]
fn saved_credentials_read_back() {
    let mut record = [0_u8; RECORD_LEN];
    encode_record(&home_network(), &mut record).unwrap();
    assert_eq!(decode_record(&record).unwrap(), Some(home_network()));
}

#[test]
fn forgotten_record_reads_back_as_no_credentials() {
    let mut record = [0_u8; RECORD_LEN];
    encode_record(&StoredNetwork::forgotten(), &mut record).unwrap();
    let stored = decode_record(&record).unwrap().unwrap();
    assert_eq!(stored.credentials, None);
}

#[test]
fn erased_flash_is_no_record() {
    let record = [0xFF_u8; RECORD_LEN];
    assert_eq!(decode_record(&record).unwrap(), None);
}

#[test]
fn flipped_payload_byte_is_corruption() {
    let mut record = [0_u8; RECORD_LEN];
    encode_record(&home_network(), &mut record).unwrap();
    record[12] ^= 0x01;
    assert!(matches!(
        decode_record(&record),
        Err(Error::CredentialStorageCorrupted)
    ));
}

#[test]
fn oversized_length_is_corruption() {
    let mut record = [0_u8; RECORD_LEN];
    encode_record(&home_network(), &mut record).unwrap();
    record[8..10].copy_from_slice(&u16::MAX.to_le_bytes());
    assert!(matches!(
        decode_record(&record),
        Err(Error::CredentialStorageCorrupted)
    ));
}

#[test]
fn overlong_ssid_is_rejected() {
    let ssid = "x".repeat(33);
    assert!(matches!(
        WifiCredentials::new(&ssid, "secret"),
        Err(Error::Format)
    ));
    assert!(WifiCredentials::new(&"x".repeat(32), &"y".repeat(64)).is_ok());
}

#[test]
fn longest_credentials_fit_in_a_record() {
    let network = StoredNetwork {
        credentials: Some(WifiCredentials::new(&"s".repeat(32), &"p".repeat(64)).unwrap()),
    };
    let mut record = [0_u8; RECORD_LEN];
    encode_record(&network, &mut record).unwrap();
    assert_eq!(decode_record(&record).unwrap(), Some(network));
}
