//! Testcases that need real hardware: an i2c-dev bus on the board header and/or a connected
//! i2c-tiny-usb adapter. They're not run by default, include them with:
//! `cargo test --features hw-tests`

use serial_test::serial;

use crate::{scan_range, TinyUsbBus};

#[test]
#[serial]
pub fn test_connect_usb_adapter() {
    TinyUsbBus::open_single_device().unwrap();
}

#[test]
#[serial]
pub fn test_scan_usb_adapter() {
    let mut bus = TinyUsbBus::open_single_device().unwrap();
    // nothing to assert about what's attached, but a scan must not fail midway
    let found = scan_range(&mut bus, 0x03..=0x77);
    assert!(found.len() <= 0x75);
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
pub fn test_open_default_bus() {
    let mut bus = crate::LinuxBus::open_default().unwrap();
    let found = scan_range(&mut bus, 0x03..=0x77);
    assert!(found.iter().all(|address| (0x03..=0x77).contains(address)));
}
