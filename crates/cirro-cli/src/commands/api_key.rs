use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::api_key::{self, ApiKeySpec};
use cirro_provision::engine::Mode;

use crate::cli::{ApiKeyCommands, OutputFormat};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &ApiKeyCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ApiKeyCommands::Apply(args) => {
            let spec = ApiKeySpec {
                id: args.id.clone(),
                name: args.name.clone(),
                description: args.description.clone(),
                owner: args.owner.clone(),
                resource: args.resource.clone(),
                state: args.state,
            };
            let outcome = api_key::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ApiKeyCommands::Delete(args) => {
            let spec = ApiKeySpec {
                id: args.id.clone(),
                name: args.name.clone(),
                state: DesiredState::Absent,
                ..Default::default()
            };
            let outcome = api_key::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ApiKeyCommands::List(args) => {
            let selector = Selector::new()
                .axis("ids", args.ids.clone())
                .axis("owners", args.owners.clone())
                .axis("names", args.names.clone());
            let records = api_key::find(client, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
