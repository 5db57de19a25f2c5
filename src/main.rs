use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use osmfind::{Config, Geocoder, HttpTransport};

const SUBCOMMANDS: &[&str] = &["s", "search", "r", "reverse"];

/// Look up OpenStreetMap places with Nominatim
///
/// Examples:
///   # Find places matching a name, grouped by category and type
///   osmfind s "Brandenburger Tor"
///
///   # What is at this point?
///   osmfind r 52.5163 13.3777
///
///   # Same, then load the surrounding area in JOSM (remote control on port 8111)
///   osmfind r 52.5163 13.3777 josm
#[derive(Parser, Debug)]
#[command(name = "osmfind")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Args {
    /// Path to config file (optional, auto-searches osmfind.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forward geocode a free-text query
    #[command(name = "s", visible_alias = "search")]
    Search {
        /// Place name or address
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Reverse geocode a point: <lat> <lon> [josm]
    #[command(name = "r", visible_alias = "reverse")]
    Reverse {
        /// Latitude, longitude and an optional third token that loads the area in JOSM
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = match Args::try_parse_from(normalize_subcommand(std::env::args_os())) {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    log::debug!("Configuration: {:?}", config);

    let transport = HttpTransport::new(&config.nominatim)?;
    let geocoder =
        Geocoder::new(&transport, &config).with_progress(std::io::stderr().is_terminal());
    let mut stdout = std::io::stdout().lock();

    match &args.command {
        Command::Search { query } => geocoder.run_search(query, &mut stdout)?,
        Command::Reverse { args } => geocoder.run_reverse(args, &mut stdout)?,
    }

    Ok(())
}

/// Accept the subcommand in any case and with stray whitespace (`" S "`).
fn normalize_subcommand(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    let mut skip_value = false;
    for arg in args.iter_mut().skip(1) {
        let Some(text) = arg.to_str() else {
            break;
        };
        if std::mem::take(&mut skip_value) {
            continue;
        }
        if text == "--config" {
            skip_value = true;
            continue;
        }
        if text.starts_with('-') {
            continue;
        }

        let name = text.trim().to_lowercase();
        if SUBCOMMANDS.contains(&name.as_str()) {
            *arg = OsString::from(name);
        }
        break;
    }
    args
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
