// udev rules for unprivileged hidraw access
// One usb and one hidraw rule per registered VID/PID

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::profile::ProfileRegistry;

/// Where `udev -w` writes by default
pub const DEFAULT_RULES_PATH: &str = "/etc/udev/rules.d/99-regium.rules";

/// Version stamped into the rules header
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const HEADER_PREFIX: &str = "# Regium ";

#[derive(Debug, Error)]
pub enum UdevError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("udevadm {args} failed: {reason}")]
    Udevadm { args: String, reason: String },
}

fn rule_pair(vid: u16, pid: u16) -> String {
    let mut rules = String::new();
    for subsystem in ["usb", "hidraw"] {
        rules.push_str(&format!(
            "SUBSYSTEM==\"{subsystem}\", ATTRS{{idVendor}}==\"{vid:04x}\", \
             ATTRS{{idProduct}}==\"{pid:04x}\", MODE=\"0666\"\n"
        ));
    }
    rules
}

/// Render the rules file for every model in the registry
pub fn rules_text(registry: &ProfileRegistry) -> String {
    let mut text = format!(
        "{HEADER_PREFIX}{VERSION}\n\
         # This file should not be edited manually.\n\
         # Run \"regium udev -w\" as root to regenerate the rules.\n\n"
    );

    // Models sharing a profile share one comment
    let mut by_profile: BTreeMap<String, (Vec<String>, Vec<(u16, u16)>)> = BTreeMap::new();
    for (profile, model) in registry.models() {
        let entry = by_profile.entry(profile.name.clone()).or_default();
        entry.0.push(model.long_name.clone());
        entry.1.push((model.vid, model.pid));
    }

    for (name, (long_names, ids)) in by_profile {
        text.push_str(&format!(
            "# Rules for device {name}. {}\n",
            long_names.join(", ")
        ));
        for (vid, pid) in ids {
            text.push_str(&rule_pair(vid, pid));
        }
        text.push('\n');
    }
    text
}

/// Version recorded in a rules file header
pub fn rules_version(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| line.strip_prefix(HEADER_PREFIX))
        .map(str::trim)
}

/// Write the rules file
pub fn write_rules(registry: &ProfileRegistry, path: &Path) -> Result<(), UdevError> {
    fs::write(path, rules_text(registry)).map_err(|source| UdevError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!("Wrote udev rules to {}", path.display());
    Ok(())
}

fn udevadm(args: &[&str]) -> Result<(), UdevError> {
    let failed = |reason: String| UdevError::Udevadm {
        args: args.join(" "),
        reason,
    };
    let status = Command::new("udevadm")
        .args(args)
        .status()
        .map_err(|e| failed(e.to_string()))?;
    if !status.success() {
        return Err(failed(status.to_string()));
    }
    debug!("udevadm {} done", args.join(" "));
    Ok(())
}

/// Ask udev to reload its rules and re-trigger devices
pub fn reload_rules() -> Result<(), UdevError> {
    udevadm(&["control", "--reload"])?;
    udevadm(&["trigger"])
}

/// Write the rules then reload them
pub fn setup_rules(registry: &ProfileRegistry, path: &Path) -> Result<(), UdevError> {
    write_rules(registry, path)?;
    reload_rules()
}

/// Check whether the installed rules were written by this version
///
/// A missing file is not an error, just out of date.
pub fn is_up_to_date(path: &Path) -> Result<bool, UdevError> {
    if !path.is_file() {
        return Ok(false);
    }
    let text = fs::read_to_string(path).map_err(|source| UdevError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(rules_version(&text) == Some(VERSION))
}
