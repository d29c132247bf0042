//! Monitoring and dry-run transports
//!
//! [`PrinterTransport`] wraps any [`Transport`] and prints every report that
//! passes through it. [`RecordingTransport`] never touches hardware; it keeps
//! the reports in memory, which is what `--dry-run` and the tests use.
//!
//! # Example
//!
//! ```ignore
//! use regium_transport::{PrinterConfig, PrinterTransport, RecordingTransport};
//!
//! let recorder = Arc::new(RecordingTransport::new(info));
//! let monitored = PrinterTransport::wrap(recorder.clone(), PrinterConfig::default());
//! ```

use std::sync::Arc;

use crossterm::style::Stylize;
use parking_lot::Mutex;

use crate::{ReportType, Transport, TransportDeviceInfo, TransportError};

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Print every byte instead of trimming trailing zero padding
    pub show_padding: bool,
}

impl PrinterConfig {
    pub fn with_padding(mut self, show: bool) -> Self {
        self.show_padding = show;
        self
    }
}

/// Transport middleware that prints all reports
pub struct PrinterTransport {
    inner: Arc<dyn Transport>,
    config: PrinterConfig,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>, config: PrinterConfig) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            config,
        })
    }

    /// Render a report as hex, trimming zero padding unless configured not to
    pub fn format_report(&self, data: &[u8]) -> String {
        let shown = if self.config.show_padding {
            data
        } else {
            let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            &data[..end]
        };

        let mut hex = shown
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        if shown.len() < data.len() {
            hex.push_str(&format!(" .. ({} zero bytes)", data.len() - shown.len()));
        }
        hex
    }

    fn print_report(&self, report_type: ReportType, data: &[u8]) {
        eprintln!(
            "{} {} {:>3}B  {}",
            ">>>".cyan(),
            report_type.name().cyan().bold(),
            data.len(),
            self.format_report(data)
        );
    }
}

impl Transport for PrinterTransport {
    fn write_report(&self, report_type: ReportType, data: &[u8]) -> Result<(), TransportError> {
        self.print_report(report_type, data);
        self.inner.write_report(report_type, data)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}

/// A report captured by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReport {
    pub report_type: ReportType,
    pub data: Vec<u8>,
}

/// In-memory transport that records every write
pub struct RecordingTransport {
    info: TransportDeviceInfo,
    reports: Mutex<Vec<RecordedReport>>,
}

impl RecordingTransport {
    pub fn new(info: TransportDeviceInfo) -> Self {
        Self {
            info,
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything written so far
    pub fn reports(&self) -> Vec<RecordedReport> {
        self.reports.lock().clone()
    }

    /// Drain recorded reports
    pub fn take(&self) -> Vec<RecordedReport> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl Transport for RecordingTransport {
    fn write_report(&self, report_type: ReportType, data: &[u8]) -> Result<(), TransportError> {
        self.reports.lock().push(RecordedReport {
            report_type,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
