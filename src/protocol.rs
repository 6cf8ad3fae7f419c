//! The i2c-tiny-usb vendor protocol: every I2C message is one control transfer, followed by a
//! status query that tells an address NACK apart from other failures.

use i2c::{Message, ReadFlags, WriteFlags};
use std::time::Duration;

use crate::{Connection, Error, Result};

// i2c-tiny-usb and compatible adapters ship with several USB VID+PID combinations
pub const KNOWN_VENDOR_PRODUCT_IDS: [(u16, u16); 2] = [
    (0x0403, 0xc631), // FTDI
    (0x1c40, 0x0534), // EZPrototypes
];

#[allow(dead_code)]
pub(crate) mod constants {
    pub const CMD_ECHO: u8 = 0;
    pub const CMD_GET_FUNC: u8 = 1;
    pub const CMD_SET_DELAY: u8 = 2;
    pub const CMD_GET_STATUS: u8 = 3;
    pub const CMD_I2C_IO: u8 = 4;

    // OR'd into CMD_I2C_IO to frame a transaction
    pub const CMD_I2C_BEGIN: u8 = 1;
    pub const CMD_I2C_END: u8 = 2;

    pub const STATUS_IDLE: u8 = 0;
    pub const STATUS_ADDRESS_ACK: u8 = 1;
    pub const STATUS_ADDRESS_NAK: u8 = 2;

    // CMD_GET_FUNC bits, same meaning as the kernel's I2C_FUNC_*
    pub const I2C_FUNC_I2C: u32 = 0x0000_0001;
    pub const I2C_FUNC_PROTOCOL_MANGLING: u32 = 0x0000_0004;

    // message flags, same meaning as the kernel's I2C_M_*
    pub const I2C_M_RD: u16 = 0x0001;
    pub const I2C_M_NOSTART: u16 = 0x4000;
    pub const I2C_M_REV_DIR_ADDR: u16 = 0x2000;
    pub const I2C_M_IGNORE_NAK: u16 = 0x1000;
    pub const I2C_M_NO_RD_ACK: u16 = 0x0800;
}
use constants::*;

pub const TIMEOUT: Duration = Duration::from_secs(1);

const ECHO_PATTERNS: [u16; 8] = [0, 0xaaaa, 0x5555, 0xffff, 0x55aa, 0xaa55, 0x0f0f, 0xf0f0];

fn request_type_in() -> u8 {
    use rusb::constants::*;
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_INTERFACE | LIBUSB_ENDPOINT_IN
}

fn request_type_out() -> u8 {
    use rusb::constants::*;
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_INTERFACE | LIBUSB_ENDPOINT_OUT
}

fn read_flag_bits(flags: ReadFlags) -> u16 {
    let mut bits = I2C_M_RD;
    if flags.contains(ReadFlags::NACK) {
        bits |= I2C_M_NO_RD_ACK;
    }
    if flags.contains(ReadFlags::REVERSE_RW) {
        bits |= I2C_M_REV_DIR_ADDR;
    }
    if flags.contains(ReadFlags::NO_START) {
        bits |= I2C_M_NOSTART;
    }
    bits
}

fn write_flag_bits(flags: WriteFlags) -> u16 {
    let mut bits = 0;
    if flags.contains(WriteFlags::IGNORE_NACK) {
        bits |= I2C_M_IGNORE_NAK;
    }
    if flags.contains(WriteFlags::REVERSE_RW) {
        bits |= I2C_M_REV_DIR_ADDR;
    }
    if flags.contains(WriteFlags::NO_START) {
        bits |= I2C_M_NOSTART;
    }
    bits
}

fn control_in(
    dev: &impl Connection,
    command: u8,
    value: u16,
    index: u16,
    data: &mut [u8],
) -> Result<()> {
    let n = dev.read_control(request_type_in(), command, value, index, data, TIMEOUT)?;
    if n != data.len() {
        return Err(rusb::Error::Io.into());
    }
    Ok(())
}

fn control_out(
    dev: &impl Connection,
    command: u8,
    value: u16,
    index: u16,
    data: &[u8],
) -> Result<()> {
    let n = dev.write_control(request_type_out(), command, value, index, data, TIMEOUT)?;
    if n != data.len() {
        return Err(rusb::Error::Io.into());
    }
    Ok(())
}

fn status(dev: &impl Connection) -> Result<u8> {
    let mut buf = [0u8; 1];
    control_in(dev, CMD_GET_STATUS, I2C_M_RD, 0, &mut buf)?;
    Ok(buf[0])
}

/// Runs `messages` as one I2C transaction: START before the first, STOP after the last and
/// repeated STARTs in between.
pub(crate) fn transfer(dev: &impl Connection, messages: &mut [Message]) -> Result<()> {
    let last = match messages.len().checked_sub(1) {
        None => return Ok(()),
        Some(x) => x,
    };
    for (i, message) in messages.iter_mut().enumerate() {
        let mut cmd = CMD_I2C_IO;
        if i == 0 {
            cmd |= CMD_I2C_BEGIN;
        }
        if i == last {
            cmd |= CMD_I2C_END;
        }

        let result = match message {
            Message::Read {
                address,
                data,
                flags,
            } => control_in(dev, cmd, read_flag_bits(*flags), *address, data),
            Message::Write {
                address,
                data,
                flags,
            } => control_out(dev, cmd, write_flag_bits(*flags), *address, data),
        };

        // a NACKed address usually fails the control transfer as well, the status tells us why
        if status(dev)? == STATUS_ADDRESS_NAK {
            return Err(Error::Nack);
        }
        result?;
    }
    Ok(())
}

/// Queries the adapter's functionality and round-trips a few echo patterns. Returns the
/// message flags the adapter can honour.
pub(crate) fn check_device(dev: &impl Connection) -> Result<(ReadFlags, WriteFlags)> {
    let mut func = [0u8; 4];
    control_in(dev, CMD_GET_FUNC, I2C_M_RD, 0, &mut func)?;
    let func = u32::from_le_bytes(func);
    if func & I2C_FUNC_I2C == 0 {
        return Err(rusb::Error::NotSupported.into());
    }

    let supported = if func & I2C_FUNC_PROTOCOL_MANGLING != 0 {
        (
            ReadFlags::NACK | ReadFlags::REVERSE_RW | ReadFlags::NO_START,
            WriteFlags::IGNORE_NACK | WriteFlags::REVERSE_RW | WriteFlags::NO_START,
        )
    } else {
        Default::default()
    };

    for pattern in ECHO_PATTERNS {
        // CMD_ECHO returns wValue, so the pattern goes where the flags normally would
        let mut echo = [0u8; 2];
        control_in(dev, CMD_ECHO, pattern, 0, &mut echo)?;
        if u16::from_le_bytes(echo) != pattern {
            return Err(rusb::Error::Other.into());
        }
    }

    Ok(supported)
}
