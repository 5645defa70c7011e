use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use cirro_client::ApiClient;
use cirro_core::Selector;
use cirro_provision::connector::{self, ConnectorSpec, ConnectorState};
use cirro_provision::engine::Mode;

use crate::cli::{ConnectorApplyArgs, ConnectorCommands, ConnectorTargetArgs, OutputFormat};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &ConnectorCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConnectorCommands::Apply(args) => {
            let spec = spec_from_apply(args)?;
            let outcome = connector::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ConnectorCommands::Delete(args) => {
            let spec = target_spec(args, ConnectorState::Absent);
            let outcome = connector::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ConnectorCommands::Pause(args) => {
            let spec = target_spec(args, ConnectorState::Paused);
            let outcome = connector::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ConnectorCommands::Resume(args) => {
            let spec = target_spec(args, ConnectorState::Running);
            let outcome = connector::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ConnectorCommands::List(args) => {
            let selector = Selector::new()
                .axis("names", args.names.clone())
                .axis("types", args.types.clone())
                .axis("classes", args.classes.clone());
            let records =
                connector::find(client, &args.environment, &args.cluster, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}

fn spec_from_apply(args: &ConnectorApplyArgs) -> Result<ConnectorSpec> {
    Ok(ConnectorSpec {
        environment: args.environment.clone(),
        cluster: args.cluster.clone(),
        name: args.name.clone(),
        connector_class: args.connector_class.clone(),
        kafka_key: args.kafka_key.clone(),
        kafka_secret: args.kafka_secret.clone(),
        props: read_props(&args.props)?,
        state: args.state,
    })
}

fn target_spec(args: &ConnectorTargetArgs, state: ConnectorState) -> ConnectorSpec {
    ConnectorSpec {
        environment: args.environment.clone(),
        cluster: args.cluster.clone(),
        name: args.name.clone(),
        state,
        ..Default::default()
    }
}

/// Reads class-specific config from a JSON file, or stdin for "-".
/// A flat object of string values is expected.
fn read_props(source: &Option<String>) -> Result<BTreeMap<String, String>> {
    let content = match source.as_deref() {
        None => return Ok(BTreeMap::new()),
        Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read props from stdin")?;
            buf
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
    };
    serde_json::from_str(&content).context("Invalid props JSON (expected string-to-string object)")
}
