use std::ops::RangeInclusive;

use crate::error::{check_byte, Field, Operation};
use crate::Bus;

/// Checks whether a device acknowledges `address` by sending an SMBus quick write. Any
/// failure, including an out-of-range address, counts as absent.
pub fn probe<B: Bus + ?Sized>(bus: &mut B, address: i32) -> bool {
    let address = match check_byte(Operation::Probing, Field::Address, address) {
        Ok(x) => x,
        Err(err) => {
            log::warn!("{}", err);
            return false;
        }
    };
    match bus.write_quick(address, false) {
        Ok(()) => true,
        Err(err) => {
            log::trace!("no answer at 0x{:02X}: {}", address, err);
            false
        }
    }
}

/// Probes every address in `range` and returns those that answered.
pub fn scan_range<B: Bus + ?Sized>(bus: &mut B, range: RangeInclusive<u8>) -> Vec<u8> {
    range
        .filter(|&address| {
            log::debug!("Probing 0x{:02X}", address);
            probe(&mut *bus, address.into())
        })
        .collect()
}

/// Probes the whole 0-255 range.
pub fn scan<B: Bus + ?Sized>(bus: &mut B) -> Vec<u8> {
    let found = scan_range(bus, 0..=u8::MAX);
    log::info!(
        "Found a total of {} i2c devices connected: {:02X?}",
        found.len(),
        found
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{MockBus, Op};

    #[test]
    fn test_probe() {
        let mut bus = MockBus::with_devices(&[0x68]);
        assert!(probe(&mut bus, 0x68));
        assert!(!probe(&mut bus, 0x69));
        assert_eq!(bus.ops, vec![Op::Quick(0x68, false), Op::Quick(0x69, false)]);
    }

    #[test]
    fn test_probe_out_of_range() {
        let mut bus = MockBus::with_devices(&[0x00]);
        assert!(!probe(&mut bus, -1));
        assert!(!probe(&mut bus, 256));
        assert!(bus.ops.is_empty());
    }

    #[test]
    fn test_scan() {
        let mut bus = MockBus::with_devices(&[0x76, 0x03, 0xff]);
        assert_eq!(scan(&mut bus), vec![0x03, 0x76, 0xff]);
        assert_eq!(bus.ops.len(), 256);
    }

    #[test]
    fn test_scan_range() {
        let mut bus = MockBus::with_devices(&[0x01, 0x20, 0x50, 0x7f]);
        assert_eq!(scan_range(&mut bus, 0x03..=0x77), vec![0x20, 0x50]);
    }
}
