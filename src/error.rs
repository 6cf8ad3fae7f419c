use std::fmt;

/// Which call a bounds check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialization,
    Probing,
    Reading,
    Writing,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Operation::Initialization => "initialization",
            Operation::Probing => "probing",
            Operation::Reading => "reading",
            Operation::Writing => "writing",
        })
    }
}

/// The argument that failed a bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address,
    Register,
    Value,
    Word,
}

impl Field {
    /// Largest accepted value for this field.
    pub fn max(self) -> i64 {
        match self {
            Field::Word => 0xffff,
            _ => 0xff,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Field::Address => "address",
            Field::Register => "register address/command",
            Field::Value => "value to write",
            Field::Word => "word to write",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error with operation: {operation}, reason: {field} is out of range (0-{})", .field.max())]
    OutOfRange {
        operation: Operation,
        field: Field,
        value: i64,
    },

    #[error("block of {0} bytes exceeds the capabilities of SMBus devices (32 bytes)")]
    BlockTooLong(usize),

    #[error("bit position {index} is outside a {length}-bit string")]
    BitIndex { index: usize, length: usize },

    #[cfg(target_os = "linux")]
    #[error("i2c-dev error: {0}")]
    Linux(#[from] i2cdev::linux::LinuxI2CError),

    #[error("USB error")]
    Usb(#[from] rusb::Error),

    #[error("no acknowledgement from the i2c device")]
    Nack,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Largest block an SMBus transfer can carry.
pub const MAX_BLOCK_LEN: usize = 32;

/// Checks that `value` fits `field` and narrows it to a byte.
pub(crate) fn check_byte(operation: Operation, field: Field, value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::OutOfRange {
        operation,
        field,
        value: value.into(),
    })
}

pub(crate) fn check_word(operation: Operation, value: i32) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::OutOfRange {
        operation,
        field: Field::Word,
        value: value.into(),
    })
}

pub(crate) fn check_block_len(len: usize) -> Result<()> {
    if len > MAX_BLOCK_LEN {
        Err(Error::BlockTooLong(len))
    } else {
        Ok(())
    }
}
