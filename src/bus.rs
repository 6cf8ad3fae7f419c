use crate::Result;

/// SMBus-level access to a system bus handle. Every call names the device address, the handle is
/// responsible for selecting it. Implemented by `LinuxBus` and `TinyUsbBus`; can be replaced with
/// `MockBus` for testing.
pub trait Bus {
    /// Sends a single bit in place of the Rd/Wr bit. `false` is a write.
    fn write_quick(&mut self, address: u8, bit: bool) -> Result<()>;

    /// Reads a byte without naming a register ("receive byte").
    fn read_byte(&mut self, address: u8) -> Result<u8>;

    /// Writes a byte without naming a register ("send byte").
    fn write_byte(&mut self, address: u8, value: u8) -> Result<()>;

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8>;

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<()>;

    /// Reads two bytes from `command`, low byte first on the wire.
    fn read_word_data(&mut self, address: u8, command: u8) -> Result<u16>;

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<()>;

    /// Reads `len` bytes after writing `command`, without a count byte.
    fn read_i2c_block_data(&mut self, address: u8, command: u8, len: u8) -> Result<Vec<u8>>;

    fn write_i2c_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()>;

    /// SMBus block read; the device sends the count byte.
    fn read_block_data(&mut self, address: u8, command: u8) -> Result<Vec<u8>>;

    fn write_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn write_quick(&mut self, address: u8, bit: bool) -> Result<()> {
        (**self).write_quick(address, bit)
    }

    #[inline]
    fn read_byte(&mut self, address: u8) -> Result<u8> {
        (**self).read_byte(address)
    }

    #[inline]
    fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
        (**self).write_byte(address, value)
    }

    #[inline]
    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8> {
        (**self).read_byte_data(address, command)
    }

    #[inline]
    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<()> {
        (**self).write_byte_data(address, command, value)
    }

    #[inline]
    fn read_word_data(&mut self, address: u8, command: u8) -> Result<u16> {
        (**self).read_word_data(address, command)
    }

    #[inline]
    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<()> {
        (**self).write_word_data(address, command, value)
    }

    #[inline]
    fn read_i2c_block_data(&mut self, address: u8, command: u8, len: u8) -> Result<Vec<u8>> {
        (**self).read_i2c_block_data(address, command, len)
    }

    #[inline]
    fn write_i2c_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        (**self).write_i2c_block_data(address, command, data)
    }

    #[inline]
    fn read_block_data(&mut self, address: u8, command: u8) -> Result<Vec<u8>> {
        (**self).read_block_data(address, command)
    }

    #[inline]
    fn write_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
        (**self).write_block_data(address, command, data)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::Error;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Op {
        Quick(u8, bool),
        Read(u8, Option<u8>),
        Write(u8, Option<u8>, Vec<u8>),
        WriteBlock(u8, u8, Vec<u8>),
    }

    /// Devices listed in `present` acknowledge; reads are served from the scheduled queue.
    #[derive(Default)]
    pub struct MockBus {
        pub present: Vec<u8>,
        pub ops: Vec<Op>,
        next_reads: VecDeque<Vec<u8>>,
    }

    impl MockBus {
        pub fn with_devices(present: &[u8]) -> Self {
            Self {
                present: present.into(),
                ..Default::default()
            }
        }

        pub fn schedule_read(&mut self, data: &[u8]) {
            self.next_reads.push_back(data.into());
        }

        fn ack(&self, address: u8) -> Result<()> {
            if self.present.contains(&address) {
                Ok(())
            } else {
                Err(Error::Nack)
            }
        }

        fn read(&mut self, address: u8, command: Option<u8>) -> Result<Vec<u8>> {
            self.ack(address)?;
            self.ops.push(Op::Read(address, command));
            self.next_reads.pop_front().ok_or(Error::Nack)
        }

        fn write(&mut self, address: u8, command: Option<u8>, data: &[u8]) -> Result<()> {
            self.ack(address)?;
            self.ops.push(Op::Write(address, command, data.into()));
            Ok(())
        }
    }

    impl Bus for MockBus {
        fn write_quick(&mut self, address: u8, bit: bool) -> Result<()> {
            self.ops.push(Op::Quick(address, bit));
            self.ack(address)
        }

        fn read_byte(&mut self, address: u8) -> Result<u8> {
            Ok(self.read(address, None)?[0])
        }

        fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
            self.write(address, None, &[value])
        }

        fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8> {
            Ok(self.read(address, Some(command))?[0])
        }

        fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<()> {
            self.write(address, Some(command), &[value])
        }

        fn read_word_data(&mut self, address: u8, command: u8) -> Result<u16> {
            let data = self.read(address, Some(command))?;
            Ok(u16::from_le_bytes([data[0], data[1]]))
        }

        fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<()> {
            self.write(address, Some(command), &value.to_le_bytes())
        }

        fn read_i2c_block_data(&mut self, address: u8, command: u8, len: u8) -> Result<Vec<u8>> {
            let mut data = self.read(address, Some(command))?;
            data.truncate(len as usize);
            Ok(data)
        }

        fn write_i2c_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
            self.write(address, Some(command), data)
        }

        fn read_block_data(&mut self, address: u8, command: u8) -> Result<Vec<u8>> {
            self.read(address, Some(command))
        }

        fn write_block_data(&mut self, address: u8, command: u8, data: &[u8]) -> Result<()> {
            self.ack(address)?;
            self.ops.push(Op::WriteBlock(address, command, data.into()));
            Ok(())
        }
    }
}
