//! Billet server binary
//!
//! Serves the assignment engine over HTTP.

use billet_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using an in-memory database");
        eprintln!("Usage: billet-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    init_tracing(&config.log_filter);
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Billet Server - Compatibility-Based Assignment Engine");
    println!();
    println!("USAGE:");
    println!("    billet-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite database file");
    println!("    - log_filter: tracing filter when RUST_LOG is unset (default: 'info')");
    println!("    - peer_suggestion_limit: roommate suggestions per request (default: 10)");
    println!("    - supervisor_suggestion_limit: supervisor suggestions per request (default: 5)");
    println!("    - large_cohort_warning: cohort size that logs a warning (default: 500)");
    println!();
}
