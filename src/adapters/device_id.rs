//! Device identity derived from the ESP32 factory MAC address.
//!
//! The broker client id is the configured prefix followed by the eFuse MAC
//! read as a little-endian 48-bit number and printed as 12 uppercase hex
//! digits: the top 16 bits (`mac[5]mac[4]`) then the low 32 bits
//! (`mac[3]..mac[0]`). It is stable across reboots.

use core::fmt::Write;

use crate::app::ports::ClientId;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: writes exactly six bytes into `mac`.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Build `<prefix><HHHH><LLLLLLLL>` from the MAC.
///
/// The prefix is truncated if it would not leave room for the suffix.
pub fn client_id(prefix: &str, mac: &MacAddress) -> ClientId {
    let mut packed = [0u8; 8];
    packed[..6].copy_from_slice(mac);
    let chip = u64::from_le_bytes(packed);
    let high = (chip >> 32) as u16;
    let low = chip as u32;

    let mut id = ClientId::new();
    for ch in prefix.chars() {
        if id.len() + ch.len_utf8() + 12 > id.capacity() {
            break;
        }
        let _ = id.push(ch);
    }
    let _ = write!(id, "{:04X}{:08X}", high, low);
    id
}
