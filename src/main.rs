use clap::Parser;

use benchplot::config::ChartConfig;
use benchplot::styling::{eprintln, error_message};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Overlay;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ChartConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Ipc(args) => commands::handle_ipc(args, &config),
        Commands::Latency(args) => commands::handle_overlay(Overlay::Latency, args, &config),
        Commands::Multi(args) => commands::handle_overlay(Overlay::Multi, args, &config),
        Commands::Types(args) => commands::handle_types(args, &config),
        Commands::Withload(args) => commands::handle_withload(args, &config),
        Commands::Montage(args) => commands::handle_montage(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{}", error_message(format!("{err:#}")));
        std::process::exit(1);
    }
}
