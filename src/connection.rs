use std::time::Duration;

use rusb::{DeviceHandle, UsbContext};

/// Control-transfer access to an i2c-tiny-usb adapter. The adapter protocol uses nothing but
/// vendor control transfers, so this is all `crate::protocol` needs. Can be replaced with
/// `MockConnection` for testing.
pub trait Connection {
    fn read_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize>;

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> rusb::Result<usize>;
}

impl<T: UsbContext> Connection for DeviceHandle<T> {
    #[inline]
    fn read_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::read_control(self, request_type, request, value, index, buf, timeout)
    }

    #[inline]
    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::write_control(self, request_type, request, value, index, buf, timeout)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// One control transfer: `request` is the adapter command, `value` carries the message
    /// flags and `index` the I2C address.
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct Transfer {
        pub request: u8,
        pub value: u16,
        pub index: u16,
        pub data: Vec<u8>,
    }

    impl Transfer {
        pub fn new(request: u8, value: u16, index: u16, data: &[u8]) -> Self {
            Self {
                request,
                value,
                index,
                data: data.into(),
            }
        }
    }

    /// Replays scheduled IN transfers in order and records OUT transfers. An IN transfer that
    /// doesn't match the next scheduled one fails with `rusb::Error::Io`.
    #[derive(Default)]
    pub struct MockConnection {
        writes: RefCell<Vec<Transfer>>,
        reads: RefCell<VecDeque<Transfer>>,
    }

    impl Connection for MockConnection {
        fn read_control(
            &self,
            _request_type: u8,
            request: u8,
            value: u16,
            index: u16,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> rusb::Result<usize> {
            let next = self.reads.borrow_mut().pop_front().ok_or(rusb::Error::Io)?;
            if (next.request, next.value, next.index) != (request, value, index) {
                return Err(rusb::Error::Io);
            }
            // a device may send fewer bytes than requested
            let n = next.data.len().min(buf.len());
            buf[..n].copy_from_slice(&next.data[..n]);
            Ok(n)
        }

        fn write_control(
            &self,
            _request_type: u8,
            request: u8,
            value: u16,
            index: u16,
            buf: &[u8],
            _timeout: Duration,
        ) -> rusb::Result<usize> {
            self.writes
                .borrow_mut()
                .push(Transfer::new(request, value, index, buf));
            Ok(buf.len())
        }
    }

    impl MockConnection {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn schedule_read(&self, request: u8, value: u16, index: u16, data: &[u8]) {
            self.reads
                .borrow_mut()
                .push_back(Transfer::new(request, value, index, data));
        }

        /// Takes every OUT transfer recorded so far, oldest first.
        pub fn take_writes(&self) -> Vec<Transfer> {
            self.writes.take()
        }

        pub fn pending_reads(&self) -> usize {
            self.reads.borrow().len()
        }
    }
}
