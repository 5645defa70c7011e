use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::engine::Mode;
use cirro_provision::service_account::{self, ServiceAccountSpec};

use crate::cli::{OutputFormat, ServiceAccountCommands};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &ServiceAccountCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ServiceAccountCommands::Apply(args) => {
            let spec = ServiceAccountSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                description: args.description.clone(),
                state: args.state,
            };
            let outcome = service_account::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ServiceAccountCommands::Delete(args) => {
            let spec = ServiceAccountSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                description: None,
                state: DesiredState::Absent,
            };
            let outcome = service_account::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        ServiceAccountCommands::List(args) => {
            let selector = Selector::new()
                .axis("ids", args.ids.clone())
                .axis("names", args.names.clone());
            let records = service_account::find(client, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
