use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::engine::Mode;
use cirro_provision::user::{self, UserSpec};

use crate::cli::{OutputFormat, UserCommands};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &UserCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        UserCommands::Apply(args) => {
            let spec = UserSpec {
                id: args.id.clone(),
                name: args.name.clone(),
                email: args.email.clone(),
                state: args.state,
            };
            let outcome = user::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        UserCommands::Delete(args) => {
            let spec = UserSpec {
                id: args.id.clone(),
                name: None,
                email: args.email.clone(),
                state: DesiredState::Absent,
            };
            let outcome = user::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        UserCommands::List(args) => {
            let selector = Selector::new()
                .axis("ids", args.ids.clone())
                .axis("emails", args.emails.clone())
                .axis("names", args.names.clone());
            let records = user::find(client, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
