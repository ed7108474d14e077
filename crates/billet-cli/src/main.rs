//! Billet CLI - Command-line interface for the assignment engine.

use billet_cli::commands::{self, Service};
use billet_cli::{Cli, Command, Config, Formatter};
use billet_store::SqliteStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Load config, falling back to defaults
    let config = Config::load().unwrap_or_default();

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &config, &formatter) {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &Config, formatter: &Formatter) -> billet_cli::Result<()> {
    let database = config.database_path(cli.database.as_deref())?;
    tracing::debug!("Opening database {}", database);
    let store = SqliteStore::new(&database)?;
    let mut service = Service::new(store, config.service.clone());

    match cli.command {
        Command::Import(args) => commands::execute_import(args, &mut service, formatter),
        Command::SuggestPeers(args) => commands::execute_suggest_peers(args, &service, formatter),
        Command::Optimize(args) => commands::execute_optimize(args, &mut service, formatter),
        Command::Apply(args) => commands::execute_apply(args, &mut service, formatter),
        Command::SuggestSupervisors(args) => {
            commands::execute_suggest_supervisors(args, &service, formatter)
        }
        Command::Assign(args) => commands::execute_assign(args, &mut service, formatter),
        Command::Rate(args) => commands::execute_rate(args, &mut service, formatter),
        Command::Assignments(args) => commands::execute_assignments(args, &service, formatter),
    }
}
