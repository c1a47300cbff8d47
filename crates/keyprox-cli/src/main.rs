use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use keyprox_core::config::ProximityConfig;
use keyprox_core::{ProximityBuildParams, ProximityInfo};
use std::io;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the proximity index of a keyboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short = 'k',
        long,
        default_value = "data/keyboards/qwerty.json"
    )]
    keyboard: String,

    /// JSON file with proximity settings. Command-line flags win over it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grid parameters and the per-cell proximity table.
    Inspect(cmd::inspect::InspectArgs),
    /// Nearest keys and decoding candidates for one touch point.
    Query(cmd::query::QueryArgs),
    /// Native contract or gesture layout as JSON.
    Export(cmd::export::ExportArgs),
}

impl Commands {
    fn proximity_config(&self) -> &ProximityConfig {
        match self {
            Commands::Inspect(args) => &args.config,
            Commands::Query(args) => &args.config,
            Commands::Export(args) => &args.config,
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let Some((_, sub_matches)) = matches.subcommand() else {
        error!("No subcommand given");
        process::exit(2);
    };
    let config = resolve_config(&cli, sub_matches);

    info!("📂 Loading Keyboard: {}", cli.keyboard);
    let info = load_index(&cli.keyboard, config).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Inspect(args) => cmd::inspect::run(&args, &info),
        Commands::Query(args) => cmd::query::run(&args, &info),
        Commands::Export(args) => cmd::export::run(&args, &info),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn resolve_config(cli: &Cli, sub_matches: &ArgMatches) -> ProximityConfig {
    let from_cli = cli.command.proximity_config();
    let Some(path) = &cli.config else {
        return from_cli.clone();
    };

    info!("⚙️  Loading proximity config from: {}", path);
    let mut config = ProximityConfig::load_from_file(path).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });
    config.merge_from_cli(from_cli, sub_matches);
    config
}

fn load_index(path: &str, config: ProximityConfig) -> keyprox_core::KpResult<ProximityInfo> {
    ProximityBuildParams::load_from_file(path, Some(config))?.build()
}
