//! Helpers for building and printing register bit patterns as strings, most significant bit
//! first.

use crate::{Error, Result};

/// Character a bit string is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
        }
    }

    fn flipped(self) -> Bit {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}

/// Binary representation of `value`, left-padded with zeros to `width`. Longer values are
/// not truncated.
pub fn pad_binary(value: u64, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}

/// Like `pad_binary` for a value that is already a binary string, with or without a `0b`
/// prefix.
pub fn pad_binary_str(text: &str, width: usize) -> String {
    let digits = text.strip_prefix("0b").unwrap_or(text);
    format!("{:0>width$}", digits, width = width)
}

pub fn blank_binary_string(length: usize, fill: Bit) -> String {
    std::iter::repeat(fill.as_char()).take(length).collect()
}

/// A `length`-bit string filled with `fill`, with the characters at `places` set to the other
/// bit. Positions count from the left.
pub fn build_binary_string(places: &[usize], length: usize, fill: Bit) -> Result<String> {
    let mut bits = vec![fill; length];
    for &index in places {
        match bits.get_mut(index) {
            Some(bit) => *bit = fill.flipped(),
            None => return Err(Error::BitIndex { index, length }),
        }
    }
    Ok(bits.into_iter().map(Bit::as_char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_binary() {
        assert_eq!(pad_binary(5, 8), "00000101");
        assert_eq!(pad_binary(0, 4), "0000");
        assert_eq!(pad_binary(0x1ff, 4), "111111111");
    }

    #[test]
    fn test_pad_binary_str() {
        assert_eq!(pad_binary_str("0b101", 8), "00000101");
        assert_eq!(pad_binary_str("11", 3), "011");
    }

    #[test]
    fn test_blank_binary_string() {
        assert_eq!(blank_binary_string(4, Bit::Zero), "0000");
        assert_eq!(blank_binary_string(3, Bit::One), "111");
        assert_eq!(blank_binary_string(0, Bit::One), "");
    }

    #[test]
    fn test_build_binary_string() {
        assert_eq!(build_binary_string(&[0, 7], 8, Bit::Zero).unwrap(), "10000001");
        assert_eq!(build_binary_string(&[1], 4, Bit::One).unwrap(), "1011");
        assert_eq!(build_binary_string(&[], 2, Bit::Zero).unwrap(), "00");
    }

    #[test]
    fn test_build_binary_string_bad_index() {
        assert!(matches!(
            build_binary_string(&[8], 8, Bit::Zero),
            Err(Error::BitIndex {
                index: 8,
                length: 8
            })
        ));
    }
}
