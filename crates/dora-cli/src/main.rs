//! `dora-pulse` - browse the filter index and owner metrics from a terminal

mod render;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dora_core::prelude::*;
use dora_core::SourceConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("dora-pulse")
        .version(dora_core::VERSION)
        .about("Delivery performance dashboard")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("fixture")
                .long("fixture")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Read payloads from a JSON fixture instead of the API"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand_required(true)
        .subcommand(Command::new("filters").about("List divisions, CIOs and owners"))
        .subcommand(
            Command::new("owner")
                .about("Show the four metric panels of one owner")
                .arg(Arg::new("division").long("division").required(true))
                .arg(Arg::new("cio").long("cio").required(true))
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .help("Owner name; defaults to the first owner under the CIO"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<DashboardConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::new(),
    };
    if let Some(path) = matches.get_one::<PathBuf>("fixture") {
        config = config.with_source(SourceConfig::Fixture { path: path.clone() });
    }
    Ok(config)
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = load_config(&matches)?;
    let mut controller = DashboardController::from_config(&config)
        .await
        .context("cannot start dashboard")?;

    if let Some(message) = controller.refresh().await.failure() {
        bail!("{message}");
    }
    tracing::info!(
        source = %controller.source_description(),
        phase = ?controller.phase(),
        "dashboard loaded"
    );
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("filters", _)) => {
            let Some(snapshot) = controller.snapshot() else {
                bail!("no data loaded");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(snapshot.index())?);
            } else {
                print!("{}", render::filters(snapshot.index()));
            }
        }
        Some(("owner", args)) => {
            controller.select_division(Some(required(args, "division")?))?;
            controller.select_cio(Some(required(args, "cio")?))?;
            match args.get_one::<String>("owner") {
                Some(owner) => controller.select_owner(Some(owner))?,
                None => {
                    controller.navigate_owner(Direction::Next)?;
                }
            }

            let view = controller.owner_view().context("no owner selected")?;
            tracing::debug!(owner = %view.owner, periods = view.periods.len(), "rendering owner");
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::owner(&view));
            }
        }
        _ => {}
    }
    Ok(())
}
