//! Command handlers for the CLI application.
//!
//! - `udev`: print or install udev rules
//! - `list`: detected keyboards and supported models
//! - `keys`: key labels of a keyboard
//! - `color`: static colors (set-color)
//! - `anim`: built-in animations (set-anim)

pub mod anim;
pub mod color;
pub mod keys;
pub mod list;
pub mod udev;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use regium::devices::{self, DetectedKeyboard};
use regium::profile::ProfileRegistry;
use regium_keyboard::Keyboard;
use regium_transport::{PrinterConfig, RecordingTransport};

/// Options shared by every device command
pub struct Session {
    pub registry: ProfileRegistry,
    pub device: usize,
    pub dry_run: bool,
    pub printer: Option<PrinterConfig>,
    /// Pause after each report on real devices, in milliseconds
    pub write_delay: Option<u64>,
}

/// An open keyboard, plus the recorder behind it on dry runs
pub struct OpenKeyboard {
    pub keyboard: Keyboard,
    pub recorder: Option<Arc<RecordingTransport>>,
}

impl Session {
    /// Keyboards available to act on
    ///
    /// On a dry run every registered model stands in for a connected device.
    pub fn keyboards(&self) -> Result<Vec<DetectedKeyboard>> {
        if self.dry_run {
            return Ok(devices::simulated_keyboards(&self.registry));
        }
        devices::detect_keyboards(&self.registry, None, None)
            .context("Failed to enumerate HID devices")
    }

    /// The keyboard picked with --device
    pub fn selected(&self) -> Result<DetectedKeyboard> {
        let mut keyboards = self.keyboards()?;
        if keyboards.is_empty() {
            bail!("No supported keyboards detected.");
        }
        if self.device >= keyboards.len() {
            bail!(
                "Invalid device number {} ({} detected). \
                 Use \"regium list\" for a list of detected devices.",
                self.device,
                keyboards.len()
            );
        }
        Ok(keyboards.swap_remove(self.device))
    }

    /// Open a session on the keyboard picked with --device
    pub fn open(&self) -> Result<OpenKeyboard> {
        let detected = self.selected()?;
        self.open_detected(&detected)
    }

    /// Open a session on a given keyboard
    pub fn open_detected(&self, detected: &DetectedKeyboard) -> Result<OpenKeyboard> {
        if self.dry_run {
            let printer = self.printer.clone().unwrap_or_default();
            let (keyboard, recorder) = devices::open_dry_run(detected, printer)?;
            return Ok(OpenKeyboard {
                keyboard,
                recorder: Some(recorder),
            });
        }

        let keyboard = devices::open_keyboard(detected, self.printer.clone(), self.write_delay)
            .with_context(|| format!("Failed to open {}", detected.long_name()))?;
        Ok(OpenKeyboard {
            keyboard,
            recorder: None,
        })
    }
}

impl OpenKeyboard {
    /// Reports captured instead of sent, if this is a dry run
    pub fn recorded(&self) -> Option<usize> {
        self.recorder.as_ref().map(|r| r.reports().len())
    }

    /// Tell the user nothing reached a device on a dry run
    pub fn report_dry_run(&self) {
        if let Some(count) = self.recorded() {
            println!("Dry run: {count} reports encoded, nothing was sent.");
        }
    }
}

/// Create printer config from CLI flags
///
/// Dry runs always print; real devices only with --monitor.
pub fn create_printer_config(monitor: bool, padding: bool, dry_run: bool) -> Option<PrinterConfig> {
    (monitor || dry_run).then(|| PrinterConfig::default().with_padding(padding))
}

/// Make sure the installed udev rules allow hidraw access
///
/// Skipped off Linux and when running as root.
pub fn check_udev_rules(path: &Path) -> Result<()> {
    if !cfg!(target_os = "linux") {
        return Ok(());
    }
    if is_root() {
        return Ok(());
    }

    if !path.is_file() {
        bail!("Udev rules were not found. Run \"regium udev -w\" as root to write the rules.");
    }
    if !regium::udev::is_up_to_date(path)? {
        bail!("Udev rules are not up to date. Run \"regium udev -w\" as root to update the rules.");
    }
    Ok(())
}

#[cfg(unix)]
fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}
