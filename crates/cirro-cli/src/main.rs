mod auth;
mod cli;
mod commands;
mod config;
mod output;

use std::time::Duration;

use anyhow::Result;
use cirro_client::{ApiClient, ClientConfig};
use cirro_provision::engine::Mode;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputFormat};
use output::print_error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;
    let format = resolve_format(&cli)?;
    let mode = if cli.check { Mode::Check } else { Mode::Apply };

    match &cli.command {
        Commands::Login(args) => {
            let endpoint = config::resolve_endpoint(&cli.endpoint, profile)?;
            commands::auth::login(&endpoint, args, &cli.api_key, &cli.api_secret, profile).await?;
        }
        Commands::Logout => {
            commands::auth::logout(profile)?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Endpoint".cyan(),
                    cfg.endpoint.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("json")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "endpoint" => cfg.endpoint = Some(set_args.value.clone()),
                    "format" => cfg.format = Some(set_args.value.clone()),
                    other => {
                        anyhow::bail!("Unknown config key: {other}. Valid keys: endpoint, format")
                    }
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Ping => {
            let client = make_client(&cli)?;
            let pong = cirro_provision::ping::ping(&client).await?;
            output::print_success(pong);
        }
        Commands::Environment(cmd) => {
            let client = make_client(&cli)?;
            commands::environment::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::Cluster(cmd) => {
            let client = make_client(&cli)?;
            commands::cluster::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::ServiceAccount(cmd) => {
            let client = make_client(&cli)?;
            commands::service_account::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::ApiKey(cmd) => {
            let client = make_client(&cli)?;
            commands::api_key::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::User(cmd) => {
            let client = make_client(&cli)?;
            commands::user::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::RoleBinding(cmd) => {
            let client = make_client(&cli)?;
            commands::role_binding::run(&client, &cmd.command, mode, format).await?;
        }
        Commands::Connector(cmd) => {
            let client = make_client(&cli)?;
            commands::connector::run(&client, &cmd.command, mode, format).await?;
        }
    }

    Ok(())
}

fn resolve_format(cli: &Cli) -> Result<OutputFormat> {
    if let Some(format) = cli.format {
        return Ok(format);
    }
    let stored = config::load_profile(&cli.profile)?.format;
    Ok(stored
        .and_then(|s| <OutputFormat as clap::ValueEnum>::from_str(&s, true).ok())
        .unwrap_or_default())
}

fn make_client(cli: &Cli) -> Result<ApiClient> {
    let endpoint = config::resolve_endpoint(&cli.endpoint, &cli.profile)?;
    let (api_key, api_secret) =
        config::resolve_credentials(&cli.api_key, &cli.api_secret, &cli.profile)?;
    let mut config = ClientConfig::new(api_key, api_secret).with_endpoint(endpoint);
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }
    Ok(ApiClient::new(config)?)
}
