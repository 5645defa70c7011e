use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::engine::Mode;
use cirro_provision::environment::{self, EnvironmentSpec};

use crate::cli::{EnvironmentCommands, OutputFormat};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &EnvironmentCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        EnvironmentCommands::Apply(args) => {
            let spec = EnvironmentSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                state: args.state,
            };
            let outcome = environment::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        EnvironmentCommands::Delete(args) => {
            let spec = EnvironmentSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                state: DesiredState::Absent,
            };
            let outcome = environment::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        EnvironmentCommands::List(args) => {
            let selector = Selector::new()
                .axis("ids", args.ids.clone())
                .axis("names", args.names.clone());
            let records = environment::find(client, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
