// Device detection
// Matches enumerated HID interfaces against registered keyboard profiles

use std::sync::Arc;

use regium_keyboard::{Keyboard, KeyboardError, Model, Profile};
use regium_transport::{
    DiscoveredDevice, HidDiscovery, PrinterConfig, PrinterTransport, RecordingTransport,
    Transport, TransportDeviceInfo, TransportError,
};
use tracing::{debug, info};

use crate::profile::ProfileRegistry;

/// Device path reported for simulated keyboards
pub const DRY_RUN_PATH: &str = "dry-run";

/// A connected interface that a registered profile can drive
#[derive(Debug, Clone)]
pub struct DetectedKeyboard {
    pub profile: Arc<Profile>,
    pub model: Model,
    pub device: DiscoveredDevice,
}

impl DetectedKeyboard {
    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn long_name(&self) -> &str {
        &self.model.long_name
    }

    /// CLI commands this model accepts
    pub fn supported_commands(&self) -> Vec<&'static str> {
        supported_commands(&self.model)
    }

    pub fn is_simulated(&self) -> bool {
        self.device.info.device_path == DRY_RUN_PATH
    }
}

/// CLI commands a model accepts
pub fn supported_commands(model: &Model) -> Vec<&'static str> {
    let mut commands = Vec::new();
    if model.has_rgb {
        commands.push("set-color");
    }
    if model.has_anim {
        commands.push("set-anim");
    }
    if model.has_custom_anim {
        commands.push("set-custom-anim");
    }
    commands
}

/// Pair discovered interfaces with the profiles serving them
///
/// Interfaces without a profile are dropped. The result is sorted by name
/// and long name so `--device` indices stay stable between runs.
pub fn match_devices(
    registry: &ProfileRegistry,
    devices: Vec<DiscoveredDevice>,
) -> Vec<DetectedKeyboard> {
    let mut detected: Vec<_> = devices
        .into_iter()
        .filter_map(|device| {
            let info = &device.info;
            let profile = registry.find_by_vid_pid(info.vid, info.pid)?;
            let model = profile.model(info.vid, info.pid)?.clone();
            Some(DetectedKeyboard {
                profile,
                model,
                device,
            })
        })
        .collect();

    detected.sort_by(|a, b| {
        (a.name(), a.long_name(), &a.device.info.device_path).cmp(&(
            b.name(),
            b.long_name(),
            &b.device.info.device_path,
        ))
    });
    detected
}

/// Enumerate connected keyboards that a registered profile supports
pub fn detect_keyboards(
    registry: &ProfileRegistry,
    vid: Option<u16>,
    pid: Option<u16>,
) -> Result<Vec<DetectedKeyboard>, TransportError> {
    let discovery = HidDiscovery::new(registry.device_matches());
    let devices = discovery.list_devices(vid, pid)?;
    let detected = match_devices(registry, devices);
    debug!("{} supported keyboards detected", detected.len());
    Ok(detected)
}

/// One simulated keyboard per registered model, for `--dry-run`
pub fn simulated_keyboards(registry: &ProfileRegistry) -> Vec<DetectedKeyboard> {
    let devices = registry
        .models()
        .into_iter()
        .map(|(_, model)| DiscoveredDevice {
            info: TransportDeviceInfo {
                vid: model.vid,
                pid: model.pid,
                interface_number: model.interface_number,
                usage_page: model.usage_page,
                usage: model.usage,
                device_path: DRY_RUN_PATH.to_string(),
                serial: None,
                product_name: Some(model.long_name.clone()),
            },
        })
        .collect();
    match_devices(registry, devices)
}

/// Open a keyboard session on real hardware
///
/// With a printer config, every report is also printed as it is written.
/// `write_delay` overrides the pause after each report, in milliseconds.
pub fn open_keyboard(
    detected: &DetectedKeyboard,
    printer: Option<PrinterConfig>,
    write_delay: Option<u64>,
) -> Result<Keyboard, KeyboardError> {
    let discovery = HidDiscovery::new(vec![detected.model.device_match()]);
    let mut hid = discovery.open_device(&detected.device)?;
    if let Some(ms) = write_delay {
        hid.set_write_delay(ms);
    }
    debug!("Write delay for {}: {} ms", detected.long_name(), hid.write_delay());

    let transport: Arc<dyn Transport> = Arc::new(hid);
    let transport = match printer {
        Some(config) => PrinterTransport::wrap(transport, config),
        None => transport,
    };

    info!("Opened {}", detected.long_name());
    Keyboard::new(detected.profile.clone(), transport)
}

/// Open a keyboard session that records and prints instead of writing
pub fn open_dry_run(
    detected: &DetectedKeyboard,
    printer: PrinterConfig,
) -> Result<(Keyboard, Arc<RecordingTransport>), KeyboardError> {
    let recorder = Arc::new(RecordingTransport::new(detected.device.info.clone()));
    let transport = PrinterTransport::wrap(recorder.clone(), printer);
    let keyboard = Keyboard::new(detected.profile.clone(), transport)?;
    Ok((keyboard, recorder))
}

/// A keyboard session for reading the profile only
///
/// Reports go to a recorder, so nothing is printed or sent.
pub fn inspect(detected: &DetectedKeyboard) -> Result<Keyboard, KeyboardError> {
    let recorder = Arc::new(RecordingTransport::new(detected.device.info.clone()));
    Keyboard::new(detected.profile.clone(), recorder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::{PRODUCT_ID_RK68, VENDOR_ID_RK};

    fn discovered(vid: u16, pid: u16, path: &str) -> DiscoveredDevice {
        DiscoveredDevice {
            info: TransportDeviceInfo {
                vid,
                pid,
                usage_page: 1,
                usage: 128,
                device_path: path.to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_match_devices_drops_unknown() {
        let registry = ProfileRegistry::with_builtins();
        let detected = match_devices(
            &registry,
            vec![
                discovered(0x1234, 0x5678, "/dev/hidraw0"),
                discovered(VENDOR_ID_RK, PRODUCT_ID_RK68, "/dev/hidraw3"),
            ],
        );
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].name(), "Royal Kludge RK68");
        assert_eq!(detected[0].device.info.device_path, "/dev/hidraw3");
        assert_eq!(detected[0].supported_commands(), vec!["set-color", "set-anim"]);
        assert!(!detected[0].is_simulated());
    }

    #[test]
    fn test_match_devices_sorted() {
        let registry = ProfileRegistry::with_builtins();
        let detected = match_devices(
            &registry,
            vec![
                discovered(VENDOR_ID_RK, PRODUCT_ID_RK68, "/dev/hidraw7"),
                discovered(VENDOR_ID_RK, PRODUCT_ID_RK68, "/dev/hidraw2"),
            ],
        );
        let paths: Vec<_> = detected
            .iter()
            .map(|d| d.device.info.device_path.as_str())
            .collect();
        assert_eq!(paths, vec!["/dev/hidraw2", "/dev/hidraw7"]);
    }

    #[test]
    fn test_dry_run_records_reports() {
        let registry = ProfileRegistry::with_builtins();
        let simulated = simulated_keyboards(&registry);
        assert_eq!(simulated.len(), 1);
        assert!(simulated[0].is_simulated());

        let (mut keyboard, recorder) =
            open_dry_run(&simulated[0], PrinterConfig::default()).unwrap();
        let packets = keyboard.apply_color(Some((255, 0, 0))).unwrap();
        let reports = recorder.reports();
        assert_eq!(reports.len(), packets.len());
        assert_eq!(reports[0].data, packets[0]);
    }

    #[test]
    fn test_inspect_reads_profile() {
        let registry = ProfileRegistry::with_builtins();
        let detected = match_devices(
            &registry,
            vec![discovered(VENDOR_ID_RK, PRODUCT_ID_RK68, "/dev/hidraw4")],
        );
        let keyboard = inspect(&detected[0]).unwrap();
        assert_eq!(keyboard.len(), 68);
        assert!(keyboard.valid_keys().contains(&"ESC"));
        assert!(keyboard.anim_options().contains(&"neon_stream"));
    }

    #[test]
    #[ignore] // Requires a connected keyboard
    fn test_detect_real_keyboards() {
        let registry = ProfileRegistry::with_builtins();
        let detected = detect_keyboards(&registry, None, None).unwrap();
        assert!(!detected.is_empty());
    }
}
