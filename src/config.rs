use std::path::PathBuf;

use crate::revision;

/// Selects which i2c-dev bus to open. An explicit path wins over a bus number; with neither set
/// the bus routed to the board header is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusConfig {
    pub number: Option<u32>,
    pub path: Option<PathBuf>,
}

impl BusConfig {
    pub fn with_number(number: u32) -> Self {
        Self {
            number: Some(number),
            path: None,
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            number: None,
            path: Some(path.into()),
        }
    }

    /// Character device this config points at.
    pub fn device_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let number = self.number.unwrap_or_else(revision::default_bus_number);
        bus_path(number)
    }
}

pub fn bus_path(number: u32) -> PathBuf {
    PathBuf::from(format!("/dev/i2c-{}", number))
}
