//! list command handler.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use crossterm::style::Stylize;
use regium::devices::supported_commands;

use super::Session;

/// Print detected keyboards with the commands they accept
pub fn detected(session: &Session) -> Result<()> {
    let keyboards = session.keyboards()?;
    if keyboards.is_empty() {
        bail!("Unable to find any supported keyboards.");
    }

    println!("{}", "Detected and supported devices".bold());
    for (index, keyboard) in keyboards.iter().enumerate() {
        let path = &keyboard.device.info.device_path;
        println!(
            "[{}] {} {}",
            index.to_string().cyan(),
            keyboard.long_name(),
            format!("({path})").dark_grey()
        );
        println!("    - {}", keyboard.supported_commands().join(", "));
    }
    Ok(())
}

/// Print every supported model, grouped by keyboard
pub fn all(session: &Session) -> Result<()> {
    let mut families: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (profile, model) in session.registry.models() {
        let commands = supported_commands(&model).join(", ");
        families.entry(profile.name.clone()).or_default().push(format!(
            "{} [{:04x}:{:04x}] {}",
            model.long_name, model.vid, model.pid, commands
        ));
    }

    println!("{}", "Supported devices".bold());
    for (name, mut models) in families {
        models.sort();
        println!("\n{}", name.green());
        for model in models {
            println!("  - {model}");
        }
    }
    Ok(())
}
