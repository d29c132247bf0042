//! Regium keyboard RGB CLI
//!
//! A command-line interface for static colors and built-in animations on
//! supported keyboards.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use regium::profile::ProfileRegistry;
use regium::udev::DEFAULT_RULES_PATH;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::Session;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "regium=info",
        1 => "regium=debug",
        _ => "regium=trace",
    };
    let mut filter = EnvFilter::from_default_env();
    for crate_name in ["regium", "regium_keyboard", "regium_transport"] {
        let directive = level.replacen("regium", crate_name, 1);
        filter = filter.add_directive(directive.parse().context("Invalid log directive")?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_registry(extra: Option<&Path>) -> Result<ProfileRegistry> {
    let mut registry = ProfileRegistry::with_builtins();
    if let Some(dir) = extra {
        let count = registry
            .load_from_directory(dir)
            .with_context(|| format!("Failed to load profiles from {}", dir.display()))?;
        debug!("Loaded {count} profiles from {}", dir.display());
    }
    Ok(registry)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let registry = load_registry(cli.profiles.as_deref())?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Device commands need hidraw access unless nothing is opened
    let needs_device = match &command {
        Commands::Udev { .. } => false,
        Commands::List { all } => !all,
        _ => true,
    };
    if needs_device && !cli.dry_run {
        commands::check_udev_rules(Path::new(DEFAULT_RULES_PATH))?;
    }

    let session = Session {
        registry,
        device: cli.device,
        dry_run: cli.dry_run,
        printer: commands::create_printer_config(cli.monitor, cli.padding, cli.dry_run),
        write_delay: cli.write_delay,
    };

    match command {
        Commands::Udev { read, write, path } => {
            if !commands::udev::run(&session.registry, read, write, &path)? {
                let mut cmd = Cli::command();
                if let Some(udev) = cmd.find_subcommand_mut("udev") {
                    udev.print_help()?;
                }
            }
        }
        Commands::List { all: true } => commands::list::all(&session)?,
        Commands::List { all: false } => commands::list::detected(&session)?,
        Commands::Keys => commands::keys::run(&session)?,
        Commands::SetColor {
            color,
            keys,
            params,
        } => commands::color::run(&session, &color, &keys, params)?,
        Commands::SetAnim {
            animation: None, ..
        } => commands::anim::list(&session)?,
        Commands::SetAnim {
            animation: Some(animation),
            params,
        } => commands::anim::run(&session, &animation, params)?,
    }

    Ok(())
}
