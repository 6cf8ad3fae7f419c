use i2c::{Message, ReadFlags, WriteFlags};
use rusb::{Device, DeviceHandle, GlobalContext, UsbContext};

use crate::protocol::{self, KNOWN_VENDOR_PRODUCT_IDS};
use crate::{Bus, Connection, Error, Result, MAX_BLOCK_LEN};

/// Lists attached adapters that speak the i2c-tiny-usb protocol.
pub fn devices() -> Result<Vec<Device<GlobalContext>>> {
    let mut found = Vec::new();
    for device in rusb::devices()?.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(x) => x,
            Err(err) => {
                log::debug!("skipping USB device without descriptor: {}", err);
                continue;
            }
        };
        let ids = (descriptor.vendor_id(), descriptor.product_id());
        if KNOWN_VENDOR_PRODUCT_IDS.contains(&ids) {
            found.push(device);
        }
    }
    Ok(found)
}

/// A bus behind an i2c-tiny-usb compatible USB-to-I2C adapter. The adapter only moves raw I2C
/// messages, so each SMBus command is composed here from a command-byte write and a payload.
pub struct TinyUsbBus<C: Connection> {
    connection: C,
}

/// Largest 7-bit address. The adapter shifts the address left within a byte, so anything above
/// this would alias a lower address on the wire.
const MAX_ADDRESS: u8 = 0x7f;

fn wire_address(address: u8) -> Result<u16> {
    if address > MAX_ADDRESS {
        return Err(rusb::Error::InvalidParam.into());
    }
    Ok(address.into())
}

impl<T: UsbContext> TinyUsbBus<DeviceHandle<T>> {
    pub fn open(device: &Device<T>) -> Result<Self> {
        let handle = device.open()?;
        handle.claim_interface(0)?;
        Self::new(handle)
    }
}

impl TinyUsbBus<DeviceHandle<GlobalContext>> {
    /// Opens the only attached adapter. Fails with `rusb::Error::NoDevice` if there is none and
    /// `rusb::Error::Other` if the choice is ambiguous.
    pub fn open_single_device() -> Result<Self> {
        let devices = devices()?;
        match devices.as_slice() {
            [] => Err(rusb::Error::NoDevice.into()),
            [device] => Self::open(device),
            _ => Err(rusb::Error::Other.into()),
        }
    }
}

impl<C: Connection> TinyUsbBus<C> {
    /// Wraps an already claimed connection after checking that it answers like an adapter.
    pub fn new(connection: C) -> Result<Self> {
        let flags = protocol::check_device(&connection)?;
        log::debug!("i2c-tiny-usb adapter ready, flags {:?}", flags);
        Ok(Self { connection })
    }

    fn write(&self, address: u8, data: &[u8]) -> Result<()> {
        let address = wire_address(address)?;
        protocol::transfer(
            &self.connection,
            &mut [Message::Write {
                address,
                data,
                flags: WriteFlags::empty(),
            }],
        )
    }

    fn read(&self, address: u8, buf: &mut [u8]) -> Result<()> {
        let address = wire_address(address)?;
        protocol::transfer(
            &self.connection,
            &mut [Message::Read {
                address,
                data: buf,
                flags: ReadFlags::empty(),
            }],
        )
    }

    fn write_read(&self, address: u8, command: u8, buf: &mut [u8]) -> Result<()> {
        let address = wire_address(address)?;
        protocol::transfer(
            &self.connection,
            &mut [
                Message::Write {
                    address,
                    data: &[command],
                    flags: WriteFlags::empty(),
                },
                Message::Read {
                    address,
                    data: buf,
                    flags: ReadFlags::empty(),
                },
            ],
        )
    }

    fn write_prefixed(&self, address: u8, prefix: &[u8], data: &[u8]) -> Result<()> {
        let mut payload = Vec::with_capacity(prefix.len() + data.len());
        payload.extend_from_slice(prefix);
        payload.extend_from_slice(data);
        self.write(address, &payload)
    }
}

impl<C: Connection> Bus for TinyUsbBus<C> {
    fn write_quick(&mut self, address: u8, bit: bool) -> Result<()> {
        if bit {
            self.read(address, &mut [])
        } else {
            self.write(address, &[])
        }
    }

    fn read_byte(&mut self, address: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(address, &mut buf)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
        self.write(address, &[value])
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.write_read(address, command, &mut buf)?;
        Ok(buf[0])
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<()> {
        self.write(address, &[command, value])
    }

    fn read_word_data(&mut self, address: u8, command: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.write_read(address, command, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.write(address, &[command, lo, hi])
    }

    fn read_i2c_block_data(&mut self, address: u8, command: u8, len: u8) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        self.write_read(address, command, &mut buf)?;
        Ok(buf)
    }

    fn write_i2c_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        self.write_prefixed(address, &[command], data)
    }

    fn read_block_data(&mut self, address: u8, command: u8) -> Result<Vec<u8>> {
        // the adapter can't end a read on the count byte, so read the largest block and trim
        let mut buf = [0u8; MAX_BLOCK_LEN + 1];
        self.write_read(address, command, &mut buf)?;
        let count = buf[0] as usize;
        if count > MAX_BLOCK_LEN {
            return Err(Error::BlockTooLong(count));
        }
        Ok(buf[1..=count].to_vec())
    }

    fn write_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        let len = u8::try_from(data.len()).map_err(|_| Error::BlockTooLong(data.len()))?;
        self.write_prefixed(address, &[command, len], data)
    }
}
