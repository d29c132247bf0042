//! set-anim command handler.

use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use regium::devices;
use regium_keyboard::{KeyboardError, ParamValue};

use super::Session;
use crate::cli::user_params;

/// List animations and their parameters for every available keyboard
pub fn list(session: &Session) -> Result<()> {
    let keyboards = session.keyboards()?;
    if keyboards.is_empty() {
        bail!("No supported keyboards detected.");
    }

    println!("Accepted animations for detected keyboards.");
    for detected in &keyboards {
        let keyboard = devices::inspect(detected)?;
        let long_name = keyboard.long_name();
        println!("{}", "-".repeat(long_name.len()));
        println!("{}", long_name.bold());

        if !keyboard.has_anim() {
            println!("  Animations not supported");
            continue;
        }

        let options = &keyboard.profile().animations.options;
        let names: Vec<String> = keyboard
            .anim_options()
            .into_iter()
            .map(|id| match options.get(id) {
                Some(option) => format!("{} ({})", id.cyan(), option.name),
                None => id.to_string(),
            })
            .collect();
        println!("Options: {}", names.join(", "));
        println!("Parameters:");
        for choice in keyboard.anim_param_choices() {
            println!("  -p {choice}");
        }
        if keyboard.has_custom_anim() {
            println!("  Custom animations are supported as well");
        }
    }
    Ok(())
}

/// Build and send an animation to the selected keyboard
pub fn run(session: &Session, animation: &str, params: Vec<(String, ParamValue)>) -> Result<()> {
    let mut open = session.open()?;
    let keyboard = &mut open.keyboard;

    if !keyboard.has_anim() {
        bail!("{} does not support animations.", keyboard.long_name());
    }

    let params = user_params(params);
    match keyboard.set_animation(animation, params.as_ref()) {
        Ok(()) => {}
        Err(e @ KeyboardError::UnknownAnimation { .. }) => {
            return Err(e).context(format!("Invalid animation for {}", keyboard.long_name()));
        }
        Err(e) => {
            return Err(e).context(
                "Invalid animation parameters. Run \"regium set-anim\" for the options \
                 available on each keyboard",
            );
        }
    }

    let packet = keyboard.apply_animation()?;
    println!(
        "{}: animation {} started ({} bytes)",
        keyboard.long_name(),
        animation,
        packet.len()
    );
    open.report_dry_run();
    Ok(())
}
