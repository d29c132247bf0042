// CLI definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use regium::udev::DEFAULT_RULES_PATH;
use regium_keyboard::{ParamValue, UserParams};

#[derive(Parser)]
#[command(name = "regium")]
#[command(
    author,
    version,
    about = "RGB lighting control for Royal Kludge keyboards",
    after_help = "Every supported keyboard was reverse engineered. Use at your own risk."
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Index of the device to act on, as shown by "regium list"
    #[arg(short, long, global = true, default_value_t = 0)]
    pub device: usize,

    /// Encode and print reports without touching any device
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print every report written to the device
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show zero padding when printing reports
    #[arg(long, global = true)]
    pub padding: bool,

    /// Pause after each report written to a device, in milliseconds (default 10)
    #[arg(long, global = true, value_name = "MS")]
    pub write_delay: Option<u64>,

    /// Directory with additional JSON keyboard profiles
    #[arg(long, global = true, env = "REGIUM_PROFILES", value_name = "DIR")]
    pub profiles: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print or install udev rules for unprivileged access
    Udev {
        /// Print the rules instead of writing them
        #[arg(short, long)]
        read: bool,

        /// Write the rules and reload udev (requires root)
        #[arg(short, long)]
        write: bool,

        /// Where to write the rules
        #[arg(short, long, value_name = "WRITE_PATH", default_value = DEFAULT_RULES_PATH)]
        path: PathBuf,
    },

    /// List detected keyboards, or every supported model with --all
    #[command(visible_alias = "ls")]
    List {
        /// Include models that are not connected
        #[arg(short, long)]
        all: bool,
    },

    /// Show the key labels of the selected keyboard
    Keys,

    /// Set a static color on all keys or on selected keys
    #[command(visible_alias = "color")]
    SetColor {
        /// Color name (red, green, blue, orange, pink, cyan, magenta, purple),
        /// #RRGGBB, or three values 0-255
        #[arg(short, long, num_args = 1..=3, required = true, allow_negative_numbers = true)]
        color: Vec<String>,

        /// Only color these keys; the rest are turned off
        #[arg(short, long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Color command parameter, e.g. -p sleep=2
        #[arg(
            short,
            long = "param",
            value_name = "NAME=VALUE[,VALUE..]",
            value_parser = parse_param
        )]
        params: Vec<(String, ParamValue)>,
    },

    /// Start a built-in animation; without a name, list the available ones
    #[command(visible_alias = "anim")]
    SetAnim {
        /// Animation name
        #[arg(short, long)]
        animation: Option<String>,

        /// Animation parameter, e.g. -p speed=3 or -p color=255,0,0
        #[arg(
            short,
            long = "param",
            value_name = "NAME=VALUE[,VALUE..]",
            value_parser = parse_param
        )]
        params: Vec<(String, ParamValue)>,
    },
}

/// Parse `name=v` or `name=v1,v2,..`
pub fn parse_param(s: &str) -> Result<(String, ParamValue), String> {
    let (name, values) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in {s:?}"));
    }

    let values = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid value {v:?} for {name}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let value = match values.as_slice() {
        [single] => ParamValue::Single(*single),
        _ => ParamValue::Sequence(values),
    };
    Ok((name.to_string(), value))
}

/// Collect repeated `-p` flags; a later flag for the same name wins
pub fn user_params(params: Vec<(String, ParamValue)>) -> Option<UserParams> {
    if params.is_empty() {
        None
    } else {
        Some(params.into_iter().collect())
    }
}
