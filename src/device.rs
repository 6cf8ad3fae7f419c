use std::fmt;

use log::Level;

use crate::error::{check_block_len, check_byte, check_word, Field, Operation};
use crate::{Bus, Result};

/// Byte order of a 16-bit register. SMBus words travel low byte first; many sensors store
/// them the other way around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// One device on a bus. Arguments are range-checked before the bus is touched; failures are
/// logged and handed back to the caller.
///
/// With `verbose` set, each transfer is reported at `info` level, otherwise at `debug`.
pub struct I2cDevice<B: Bus> {
    bus: B,
    address: u8,
    verbose: bool,
}

impl<B: Bus> I2cDevice<B> {
    pub fn new(bus: B, address: i32) -> Result<Self> {
        let address = check_byte(Operation::Initialization, Field::Address, address)
            .inspect_err(|err| log::warn!("{}", err))?;
        Ok(Self {
            bus,
            address,
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    fn report(&self, args: fmt::Arguments) {
        let level = if self.verbose { Level::Info } else { Level::Debug };
        log::log!(level, "I2C: {}", args);
    }

    fn check(&self, operation: Operation, field: Field, value: i32) -> Result<u8> {
        check_byte(operation, field, value).inspect_err(|err| log::warn!("{}", err))
    }

    fn check_len(&self, len: usize) -> Result<()> {
        check_block_len(len).inspect_err(|err| log::warn!("{}", err))
    }

    fn transfer<T>(&mut self, op: impl FnOnce(&mut B, u8) -> Result<T>) -> Result<T> {
        let address = self.address;
        op(&mut self.bus, address).inspect_err(|err| {
            log::error!(
                "Error with device 0x{:02X}, perhaps the address is wrong ({})",
                address,
                err
            )
        })
    }

    /// Reads a byte without naming a register.
    pub fn receive_byte(&mut self) -> Result<u8> {
        let value = self.transfer(|bus, address| bus.read_byte(address))?;
        self.report(format_args!(
            "The device with address 0x{:02X} returned value 0x{:02X}",
            self.address, value
        ));
        Ok(value)
    }

    pub fn receive_byte_signed(&mut self) -> Result<i8> {
        Ok(self.receive_byte()? as i8)
    }

    pub fn read_byte(&mut self, register: i32) -> Result<u8> {
        let register = self.check(Operation::Reading, Field::Register, register)?;
        let value = self.transfer(|bus, address| bus.read_byte_data(address, register))?;
        self.report(format_args!(
            "The device with address 0x{:02X} returned value 0x{:02X} from register/command 0x{:02X}",
            self.address, value, register
        ));
        Ok(value)
    }

    pub fn read_byte_signed(&mut self, register: i32) -> Result<i8> {
        Ok(self.read_byte(register)? as i8)
    }

    /// Reads a 16-bit register. With `ByteOrder::Big` the two bytes are swapped after the
    /// transfer.
    pub fn read_word(&mut self, register: i32, order: ByteOrder) -> Result<u16> {
        let register = self.check(Operation::Reading, Field::Register, register)?;
        let raw = self.transfer(|bus, address| bus.read_word_data(address, register))?;
        let value = match order {
            ByteOrder::Little => raw,
            ByteOrder::Big => raw.swap_bytes(),
        };
        self.report(format_args!(
            "The device with address 0x{:02X} returned value 0x{:04X} from register/command 0x{:02X}",
            self.address, value, register
        ));
        Ok(value)
    }

    pub fn read_word_signed(&mut self, register: i32, order: ByteOrder) -> Result<i16> {
        Ok(self.read_word(register, order)? as i16)
    }

    /// Reads `len` bytes starting at `register` as a plain I2C transfer (no count byte).
    pub fn read_block(&mut self, register: i32, len: usize) -> Result<Vec<u8>> {
        self.check_len(len)?;
        let register = self.check(Operation::Reading, Field::Register, register)?;
        // checked above, fits in a u8
        let len = len as u8;
        let values =
            self.transfer(|bus, address| bus.read_i2c_block_data(address, register, len))?;
        self.report_block_read(register, &values);
        Ok(values)
    }

    /// SMBus block read; the device decides how many bytes (at most 32) come back.
    pub fn read_smbus_block(&mut self, register: i32) -> Result<Vec<u8>> {
        let register = self.check(Operation::Reading, Field::Register, register)?;
        let values = self.transfer(|bus, address| bus.read_block_data(address, register))?;
        self.check_len(values.len())?;
        self.report_block_read(register, &values);
        Ok(values)
    }

    fn report_block_read(&self, register: u8, values: &[u8]) {
        self.report(format_args!(
            "The device with address 0x{:02X} returned {:?} from register/command 0x{:02X}",
            self.address, values, register
        ));
    }

    /// Writes a byte without naming a register.
    pub fn send_byte(&mut self, value: i32) -> Result<()> {
        let value = self.check(Operation::Writing, Field::Value, value)?;
        self.transfer(|bus, address| bus.write_byte(address, value))?;
        self.report(format_args!(
            "Wrote value 0x{:02X} to device 0x{:02X}",
            value, self.address
        ));
        Ok(())
    }

    pub fn write_byte(&mut self, register: i32, value: i32) -> Result<()> {
        let register = self.check(Operation::Writing, Field::Register, register)?;
        let value = self.check(Operation::Writing, Field::Value, value)?;
        self.transfer(|bus, address| bus.write_byte_data(address, register, value))?;
        self.report(format_args!(
            "Wrote value 0x{:02X} to register/with command 0x{:02X}",
            value, register
        ));
        Ok(())
    }

    /// Writes a 16-bit value, low byte first.
    pub fn write_word(&mut self, register: i32, value: i32) -> Result<()> {
        let register = self.check(Operation::Writing, Field::Register, register)?;
        let value =
            check_word(Operation::Writing, value).inspect_err(|err| log::warn!("{}", err))?;
        self.transfer(|bus, address| bus.write_word_data(address, register, value))?;
        self.report(format_args!(
            "Wrote value 0x{:04X} to register pair 0x{:02X},0x{:02X} or with command 0x{:02X}",
            value,
            register,
            u16::from(register) + 1,
            register
        ));
        Ok(())
    }

    /// Writes `data` after `register` as a plain I2C transfer (no count byte).
    pub fn write_block(&mut self, register: i32, data: &[u8]) -> Result<()> {
        let register = self.check(Operation::Writing, Field::Register, register)?;
        self.check_len(data.len())?;
        self.report(format_args!(
            "Writing data to register/with command 0x{:02X}: {:?}",
            register, data
        ));
        self.transfer(|bus, address| bus.write_i2c_block_data(address, register, data))
    }

    /// SMBus block write; the count byte is sent ahead of `data`.
    pub fn write_smbus_block(&mut self, register: i32, data: &[u8]) -> Result<()> {
        let register = self.check(Operation::Writing, Field::Register, register)?;
        self.check_len(data.len())?;
        self.report(format_args!(
            "Writing data to register/with command 0x{:02X}: {:?}",
            register, data
        ));
        self.transfer(|bus, address| bus.write_block_data(address, register, data))
    }
}

impl<B: Bus> fmt::Debug for I2cDevice<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("I2cDevice")
            .field("address", &format_args!("0x{:02X}", self.address))
            .field("verbose", &self.verbose)
            .finish()
    }
}
