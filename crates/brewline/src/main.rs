// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Brewline - a Telegram beverage-order intake bot.
//!
//! This is the binary entry point for the Brewline service.

mod health;
mod import;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Brewline - a Telegram beverage-order intake bot.
#[derive(Parser, Debug)]
#[command(name = "brewline", version, about, long_about = None)]
struct Cli {
    /// Explicit config file path (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the order bot.
    Serve,
    /// Import or update the product assortment from a TOML file.
    ImportCatalog { path: PathBuf },
    /// Print the resolved configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            brewline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            if let Err(errors) = brewline_config::validate_for_serve(&config) {
                brewline_config::render_errors(&errors);
                std::process::exit(1);
            }
            serve::run_serve(config).await
        }
        Some(Commands::ImportCatalog { path }) => import::run_import(&config, &path).await,
        Some(Commands::Config) => {
            print_config_summary(&config);
            Ok(())
        }
        None => {
            println!("brewline: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<brewline_config::BrewlineConfig, Vec<brewline_config::ConfigError>> {
    match path {
        Some(path) => brewline_config::load_config_from_path(path)
            .map_err(brewline_config::diagnostic::figment_to_config_errors),
        None => brewline_config::load_and_validate(),
    }
}

/// Prints the resolved configuration without leaking credentials.
fn print_config_summary(config: &brewline_config::BrewlineConfig) {
    println!("agent.name       = {}", config.agent.name);
    println!("agent.log_level  = {}", config.agent.log_level);
    println!(
        "telegram         = token {}, {} admin(s)",
        redacted(config.telegram.bot_token.as_deref()),
        config.telegram.admin_ids.len()
    );
    println!(
        "parser           = {} (key {}), max_tokens {}, timeout {}s",
        config.parser.model,
        redacted(config.parser.api_key.as_deref()),
        config.parser.max_tokens,
        config.parser.timeout_secs
    );
    println!("storage          = {}", config.storage.database_path);
    println!(
        "ledger           = {}",
        match config.ledger.spreadsheet_id.as_deref() {
            Some(id) => format!("spreadsheet {id} / {}", config.ledger.worksheet_name),
            None => "disabled".to_string(),
        }
    );
    println!(
        "server           = {}:{}",
        config.server.host, config.server.port
    );
}

fn redacted(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "set",
        _ => "unset",
    }
}
