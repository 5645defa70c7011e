use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::cluster::{self, ClusterSpec};
use cirro_provision::engine::Mode;

use crate::cli::{ClusterCommands, OutputFormat};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &ClusterCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ClusterCommands::Apply(args) => {
            let spec = ClusterSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                environment: args.environment.clone(),
                availability: args.availability,
                cloud: args.cloud,
                region: args.region.clone(),
                kind: args.kind,
                cku: args.cku,
                encryption_key: args.encryption_key.clone(),
                network: args.network.clone(),
                state: args.state,
            };
            let outcome = cluster::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ClusterCommands::Delete(args) => {
            let spec = ClusterSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                environment: args.environment.clone(),
                state: DesiredState::Absent,
                ..Default::default()
            };
            let outcome = cluster::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ClusterCommands::List(args) => {
            let selector = Selector::new()
                .axis("ids", args.ids.clone())
                .axis("names", args.names.clone());
            let records = cluster::find(client, &args.environment, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
