//! keys command handler.

use anyhow::Result;
use crossterm::style::Stylize;
use regium::devices;
use regium_keyboard::LayoutCell;

use super::Session;

/// Characters per key unit when drawing the layout
const UNIT_WIDTH: f32 = 6.0;

/// Print the key labels of the selected keyboard
///
/// Keys are drawn in their physical rows when the profile has a layout.
pub fn run(session: &Session) -> Result<()> {
    let keyboard = devices::inspect(&session.selected()?)?;
    let profile = keyboard.profile();

    println!(
        "{} ({} keys, {}x{})",
        keyboard.long_name().bold(),
        keyboard.len(),
        keyboard.width(),
        keyboard.height()
    );
    if profile.layout.is_empty() {
        for chunk in keyboard.valid_keys().chunks(12) {
            println!("  {}", chunk.join(" "));
        }
    } else {
        for row in render_layout(&profile.layout) {
            println!("  {row}");
        }
    }

    let choices = keyboard.color_param_choices();
    if !choices.is_empty() {
        println!("\n{}", "set-color parameters".bold());
        for choice in choices {
            println!("  -p {choice}");
        }
    }
    Ok(())
}

/// Render layout rows, each cell padded to its width
pub fn render_layout(rows: &[Vec<LayoutCell>]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let line: String = row
                .iter()
                .map(|cell| {
                    let width = (cell.width * UNIT_WIDTH).round() as usize;
                    format!("{:<width$}", cell.label.as_deref().unwrap_or(""))
                })
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
