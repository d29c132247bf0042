//! Transport layer for Regium keyboards
//!
//! Encoded command buffers are delivered to a keyboard as HID feature or
//! output reports. This crate owns everything between a finished buffer and
//! the device node:
//!
//! - [`HidDiscovery`] enumerates HID collections matching known models
//! - [`HidTransport`] writes reports through hidapi with inter-write pacing
//! - [`PrinterTransport`] / [`RecordingTransport`] for monitoring and dry runs

pub mod error;
pub mod printer;
pub mod types;

mod discovery;
mod hid_device;

pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid_device::{HidTransport, DEFAULT_WRITE_DELAY_MS};
pub use printer::{PrinterConfig, PrinterTransport, RecordedReport, RecordingTransport};
pub use types::{DeviceMatch, DiscoveredDevice, ReportType, TransportDeviceInfo};

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// Writes are blocking and sequential. Implementations that talk to real
/// hardware are expected to pace consecutive writes themselves.
pub trait Transport: Send + Sync {
    /// Write one report to the device
    ///
    /// # Arguments
    /// * `report_type` - Feature or output report, as declared by the profile
    /// * `data` - Full report including the leading report ID byte
    fn write_report(&self, report_type: ReportType, data: &[u8]) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Write several reports in order, stopping at the first failure
    fn write_sequence(
        &self,
        report_type: ReportType,
        reports: &[Vec<u8>],
    ) -> Result<(), TransportError> {
        for report in reports {
            self.write_report(report_type, report)?;
        }
        Ok(())
    }
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;
