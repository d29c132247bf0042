//! Common types for transport layer

use serde::Serialize;

/// How a buffer is delivered to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ReportType {
    /// HID feature report (`send_feature_report`)
    Feature = 0x02,
    /// HID output report (`write`)
    Output = 0x03,
}

impl ReportType {
    /// Protocol byte used in profile tables
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short label for printing
    pub fn name(self) -> &'static str {
        match self {
            Self::Feature => "FEATURE",
            Self::Output => "OUTPUT",
        }
    }
}

impl TryFrom<u8> for ReportType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x02 => Ok(Self::Feature),
            0x03 => Ok(Self::Output),
            other => Err(other),
        }
    }
}

/// Device identification information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB interface number
    pub interface_number: i32,
    /// HID usage page of the opened collection
    pub usage_page: u16,
    /// HID usage of the opened collection
    pub usage: u16,
    /// Device path (hidraw node or platform equivalent)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

/// A HID collection a profile model can be driven through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceMatch {
    pub vid: u16,
    pub pid: u16,
    pub usage_page: u16,
    pub usage: u16,
}

impl DeviceMatch {
    pub fn new(vid: u16, pid: u16, usage_page: u16, usage: u16) -> Self {
        Self {
            vid,
            pid,
            usage_page,
            usage,
        }
    }

    /// Check if enumerated device info belongs to this match
    pub fn matches(&self, info: &TransportDeviceInfo) -> bool {
        self.vid == info.vid
            && self.pid == info.pid
            && self.usage_page == info.usage_page
            && self.usage == info.usage
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}
