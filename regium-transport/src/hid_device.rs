//! hidapi-backed transport

use std::time::Duration;

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::types::{ReportType, TransportDeviceInfo};
use crate::Transport;

/// Delay after every report. Firmware drops or misapplies reports sent faster.
pub const DEFAULT_WRITE_DELAY_MS: u64 = 10;

/// HID transport for a single opened collection
pub struct HidTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
    write_delay_ms: u64,
}

impl HidTransport {
    /// Wrap an opened HID device
    ///
    /// The device is switched to non-blocking mode; nothing is ever read back.
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Result<Self, TransportError> {
        device.set_blocking_mode(false)?;
        Ok(Self {
            device: Mutex::new(device),
            info,
            write_delay_ms: DEFAULT_WRITE_DELAY_MS,
        })
    }

    /// Set delay after each report (default 10ms)
    pub fn set_write_delay(&mut self, ms: u64) {
        self.write_delay_ms = ms;
    }

    pub fn write_delay(&self) -> u64 {
        self.write_delay_ms
    }
}

impl Transport for HidTransport {
    fn write_report(&self, report_type: ReportType, data: &[u8]) -> Result<(), TransportError> {
        debug!(
            "Writing {} report ({} bytes): {:02X?}",
            report_type.name(),
            data.len(),
            &data[..data.len().min(9)]
        );

        {
            let device = self.device.lock();
            match report_type {
                ReportType::Feature => device.send_feature_report(data)?,
                ReportType::Output => {
                    let written = device.write(data)?;
                    if written < data.len() {
                        return Err(TransportError::ShortWrite {
                            written,
                            expected: data.len(),
                        });
                    }
                }
            }
        }

        if self.write_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.write_delay_ms));
        }
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidTransport {
    fn drop(&mut self) {
        debug!(
            "HidTransport for {:04X}:{:04X} dropped",
            self.info.vid, self.info.pid
        );
    }
}
