//! set-color command handler.

use anyhow::{bail, Context, Result};
use regium::color::parse_color;
use regium_keyboard::{ParamValue, RgbColor};

use super::Session;
use crate::cli::user_params;

/// Set a static color on every key, or only on `keys`
pub fn run(
    session: &Session,
    color: &[String],
    keys: &[String],
    params: Vec<(String, ParamValue)>,
) -> Result<()> {
    let rgb = parse_color(color)?;
    let mut open = session.open()?;
    let keyboard = &mut open.keyboard;

    if !keyboard.has_rgb() {
        bail!("{} does not support color changing.", keyboard.long_name());
    }

    if let Some(params) = user_params(params) {
        keyboard.set_color_params(Some(&params)).with_context(|| {
            format!(
                "Invalid color parameters. Accepted: {}",
                keyboard.color_param_choices().join("; ")
            )
        })?;
    }

    let packets = if keys.is_empty() {
        keyboard.apply_color(Some(rgb))?
    } else {
        for key in keys {
            keyboard.set_key_color(key, rgb)?;
        }
        keyboard.apply_color(None)?
    };

    let shown = RgbColor::try_from(rgb)?;
    let target = if keys.is_empty() {
        "all keys".to_string()
    } else {
        keys.join(", ")
    };
    println!(
        "{}: {} set to {} ({} reports)",
        keyboard.long_name(),
        target,
        shown,
        packets.len()
    );
    open.report_dry_run();
    Ok(())
}
