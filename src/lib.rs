//! Bounds-checked convenience calls over an I2C/SMBus bus.
//!
//! An `I2cDevice` wraps any `Bus` together with a device address. Every call checks its
//! register and value arguments (0-255, or 0-65535 for words), hands the transfer to the bus
//! and returns the result. Two buses are provided: `LinuxBus` for the kernel's `/dev/i2c-N`
//! devices, and `TinyUsbBus` for i2c-tiny-usb compatible USB adapters.
//!
//! ```no_run
//! use pi_i2c::{ByteOrder, I2cDevice, LinuxBus};
//!
//! let bus = LinuxBus::open_default()?;
//! let mut sensor = I2cDevice::new(bus, 0x48)?.with_verbose(true);
//! let raw = sensor.read_word_signed(0x00, ByteOrder::Big)?;
//! println!("T = {:.2}°C", (raw >> 4) as f32 * 0.0625);
//! # Ok::<(), pi_i2c::Error>(())
//! ```

pub mod bits;
mod bus;
mod config;
mod connection;
mod device;
mod error;
#[cfg(target_os = "linux")]
mod linux;
mod probe;
mod protocol;
pub mod revision;
mod tiny_usb;

#[cfg(all(test, feature = "hw-tests"))]
mod hw_tests;

pub use bus::Bus;
pub use config::{bus_path, BusConfig};
pub use connection::Connection;
pub use device::{ByteOrder, I2cDevice};
pub use error::*;
#[cfg(target_os = "linux")]
pub use linux::LinuxBus;
pub use probe::{probe, scan, scan_range};
pub use protocol::KNOWN_VENDOR_PRODUCT_IDS;
pub use tiny_usb::{devices, TinyUsbBus};
pub use rusb;
