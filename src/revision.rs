//! Board revision detection, used to pick the default I2C bus on a Raspberry Pi. Revision 1
//! boards expose the header I2C pins on bus 0, later boards on bus 1.

use std::fs;

const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Extracts the board revision from the contents of `/proc/cpuinfo`. Returns 0 if there is no
/// `Revision` line.
pub fn parse_revision(cpuinfo: &str) -> u8 {
    let line = match cpuinfo.lines().find(|line| line.starts_with("Revision")) {
        None => return 0,
        Some(x) => x,
    };
    match line.trim_end().chars().last() {
        Some('0' | '2' | '3') => 1,
        Some(_) => 2,
        None => 0,
    }
}

/// Board revision of the running system, or 0 if it can't be determined.
pub fn board_revision() -> u8 {
    match fs::read_to_string(CPUINFO_PATH) {
        Ok(cpuinfo) => parse_revision(&cpuinfo),
        Err(err) => {
            log::debug!("could not read {}: {}", CPUINFO_PATH, err);
            0
        }
    }
}

/// Number of the bus routed to the header on this board.
pub fn default_bus_number() -> u32 {
    bus_for_revision(board_revision())
}

pub(crate) fn bus_for_revision(revision: u8) -> u32 {
    if revision > 1 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO_REV1: &str = "processor\t: 0\n\
        model name\t: ARMv6-compatible processor rev 7 (v6l)\n\
        Hardware\t: BCM2708\n\
        Revision\t: 0003\n\
        Serial\t\t: 00000000deadbeef\n";

    const CPUINFO_REV2: &str = "processor\t: 0\n\
        Hardware\t: BCM2835\n\
        Revision\t: 000f  \n";

    #[test]
    fn test_parse_revision() {
        assert_eq!(parse_revision(CPUINFO_REV1), 1);
        assert_eq!(parse_revision(CPUINFO_REV2), 2);
        assert_eq!(parse_revision("Revision\t: 000e\n"), 2);
        assert_eq!(parse_revision("Revision\t: 0002"), 1);
    }

    #[test]
    fn test_parse_revision_missing() {
        assert_eq!(parse_revision(""), 0);
        assert_eq!(parse_revision("processor\t: 0\nHardware\t: generic\n"), 0);
    }

    #[test]
    fn test_bus_for_revision() {
        assert_eq!(bus_for_revision(0), 0);
        assert_eq!(bus_for_revision(1), 0);
        assert_eq!(bus_for_revision(2), 1);
    }
}
