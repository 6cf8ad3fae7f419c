use std::path::{Path, PathBuf};

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;

use crate::{config, Bus, BusConfig, Result};

/// A bus exposed by the kernel through `/dev/i2c-N`. The kernel driver owns the I2C/SMBus
/// framing; this only keeps track of which slave address is currently selected.
pub struct LinuxBus {
    path: PathBuf,
    device: LinuxI2CDevice,
    selected: u8,
}

impl LinuxBus {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let device = LinuxI2CDevice::new(&path, 0)?;
        log::debug!("opened i2c bus {}", path.display());
        Ok(Self {
            path,
            device,
            selected: 0,
        })
    }

    pub fn open_number(number: u32) -> Result<Self> {
        Self::open(config::bus_path(number))
    }

    pub fn from_config(config: &BusConfig) -> Result<Self> {
        Self::open(config.device_path())
    }

    /// Opens the bus routed to the header of the running board.
    pub fn open_default() -> Result<Self> {
        Self::from_config(&BusConfig::default())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn select(&mut self, address: u8) -> Result<&mut LinuxI2CDevice> {
        if address != self.selected {
            self.device.set_slave_address(address.into())?;
            self.selected = address;
        }
        Ok(&mut self.device)
    }
}

impl Bus for LinuxBus {
    fn write_quick(&mut self, address: u8, bit: bool) -> Result<()> {
        Ok(self.select(address)?.smbus_write_quick(bit)?)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8> {
        Ok(self.select(address)?.smbus_read_byte()?)
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
        Ok(self.select(address)?.smbus_write_byte(value)?)
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8> {
        Ok(self.select(address)?.smbus_read_byte_data(command)?)
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<()> {
        Ok(self.select(address)?.smbus_write_byte_data(command, value)?)
    }

    fn read_word_data(&mut self, address: u8, command: u8) -> Result<u16> {
        Ok(self.select(address)?.smbus_read_word_data(command)?)
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<()> {
        Ok(self.select(address)?.smbus_write_word_data(command, value)?)
    }

    fn read_i2c_block_data(&mut self, address: u8, command: u8, len: u8) -> Result<Vec<u8>> {
        Ok(self.select(address)?.smbus_read_i2c_block_data(command, len)?)
    }

    fn write_i2c_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        Ok(self.select(address)?.smbus_write_i2c_block_data(command, data)?)
    }

    fn read_block_data(&mut self, address: u8, command: u8) -> Result<Vec<u8>> {
        Ok(self.select(address)?.smbus_read_block_data(command)?)
    }

    fn write_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        Ok(self.select(address)?.smbus_write_block_data(command, data)?)
    }
}
