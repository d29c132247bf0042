//! Device discovery over hidapi

use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid_device::HidTransport;
use crate::types::{DeviceMatch, DiscoveredDevice, TransportDeviceInfo};

/// HID device discovery for known keyboard collections
#[derive(Debug, Clone, Default)]
pub struct HidDiscovery {
    /// Collections to look for
    known_devices: Vec<DeviceMatch>,
}

impl HidDiscovery {
    /// Create a discovery instance for the given collections
    pub fn new(known_devices: Vec<DeviceMatch>) -> Self {
        Self { known_devices }
    }

    /// Add a collection to discover
    pub fn add_device(&mut self, device: DeviceMatch) {
        if !self.known_devices.contains(&device) {
            self.known_devices.push(device);
        }
    }

    /// Check if enumerated info matches a known collection
    fn is_known_device(&self, info: &TransportDeviceInfo) -> bool {
        self.known_devices.iter().any(|m| m.matches(info))
    }

    fn to_info(device_info: &hidapi::DeviceInfo) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid: device_info.vendor_id(),
            pid: device_info.product_id(),
            interface_number: device_info.interface_number(),
            usage_page: device_info.usage_page(),
            usage: device_info.usage(),
            device_path: device_info.path().to_string_lossy().to_string(),
            serial: device_info.serial_number().map(|s| s.to_string()),
            product_name: device_info.product_string().map(|s| s.to_string()),
        }
    }

    /// Filter enumerated interfaces down to known collections
    ///
    /// A product ID filter is only meaningful together with a vendor ID.
    pub fn select<I>(
        &self,
        interfaces: I,
        vid: Option<u16>,
        pid: Option<u16>,
    ) -> Result<Vec<DiscoveredDevice>, TransportError>
    where
        I: IntoIterator<Item = TransportDeviceInfo>,
    {
        if vid.is_none() && pid.is_some() {
            return Err(TransportError::InvalidFilter(
                "cannot filter by product id without vendor id".into(),
            ));
        }

        let devices = interfaces
            .into_iter()
            .filter(|info| vid.is_none_or(|v| v == info.vid))
            .filter(|info| pid.is_none_or(|p| p == info.pid))
            .filter(|info| self.is_known_device(info))
            .map(|info| {
                debug!(
                    "Found device: VID={:04X} PID={:04X} if={} page={:04X} usage={:04X} path={}",
                    info.vid,
                    info.pid,
                    info.interface_number,
                    info.usage_page,
                    info.usage,
                    info.device_path
                );
                DiscoveredDevice { info }
            })
            .collect();

        Ok(devices)
    }

    /// List currently connected devices, optionally narrowed by VID/PID
    pub fn list_devices(
        &self,
        vid: Option<u16>,
        pid: Option<u16>,
    ) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let devices = self.select(api.device_list().map(Self::to_info), vid, pid)?;
        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    /// Open a previously discovered device
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<HidTransport, TransportError> {
        let api = HidApi::new()?;

        let device_info = api
            .device_list()
            .find(|d| d.path().to_string_lossy() == device.info.device_path)
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!(
                    "{:04X}:{:04X} at {}",
                    device.info.vid, device.info.pid, device.info.device_path
                ))
            })?;

        let hid_device = device_info.open_device(&api)?;
        info!(
            "Opened {:04X}:{:04X} interface {}",
            device.info.vid, device.info.pid, device.info.interface_number
        );

        HidTransport::new(hid_device, device.info.clone())
    }
}
