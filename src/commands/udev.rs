//! udev command handler.

use std::path::Path;

use anyhow::{Context, Result};
use regium::profile::ProfileRegistry;
use regium::udev;

/// Print the rules (-r), or write and reload them (-w)
///
/// Returns false when neither was asked for, so the caller can show help.
pub fn run(registry: &ProfileRegistry, read: bool, write: bool, path: &Path) -> Result<bool> {
    if read {
        print!("{}", udev::rules_text(registry));
        return Ok(true);
    }
    if write {
        udev::setup_rules(registry, path)
            .with_context(|| format!("Failed to install udev rules at {}", path.display()))?;
        println!("Udev rules have been successfully written to {}.", path.display());
        return Ok(true);
    }
    Ok(false)
}
