// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier - a WhatsApp relay bot backed by a hosted completion API.
//!
//! This is the binary entry point. Configuration is loaded and validated
//! before anything else; missing required settings exit non-zero with
//! rendered diagnostics.

mod serve;

use clap::{Parser, Subcommand};

/// Courier - a WhatsApp relay bot backed by a hosted completion API.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay bot (default).
    Serve,
    /// Print the resolved configuration and exit.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match courier_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            courier_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("courier: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Prints the resolved configuration with the credential redacted.
fn print_config(config: &courier_config::CourierConfig) {
    println!("bot.name = {}", config.bot.name);
    println!("bot.log_level = {}", config.bot.log_level);
    println!("gateway.api_key = <set>");
    println!("gateway.base_url = {}", config.gateway.base_url);
    println!("gateway.model = {}", config.gateway.model);
    println!("gateway.temperature = {}", config.gateway.temperature);
    println!("gateway.max_tokens = {}", config.gateway.max_tokens);
    println!("gateway.top_p = {}", config.gateway.top_p);
    println!("quota.daily_limit = {}", config.quota.daily_limit);
    println!("context.history_limit = {}", config.context.history_limit);
    println!(
        "storage.database_path = {}",
        config.storage.database_path.as_deref().unwrap_or_default()
    );
    println!(
        "storage.destructive_resync = {}",
        config.storage.destructive_resync
    );
    println!("bridge.url = {}", config.bridge.url);
}
