use anyhow::Result;
use cirro_client::ApiClient;
use cirro_core::{DesiredState, Selector};
use cirro_provision::engine::Mode;
use cirro_provision::role_binding::{self, RoleBindingSpec};

use crate::cli::{OutputFormat, RoleBindingCommands};
use crate::output;

pub async fn run(
    client: &ApiClient,
    command: &RoleBindingCommands,
    mode: Mode,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RoleBindingCommands::Apply(args) => {
            let spec = RoleBindingSpec {
                id: args.id.clone(),
                resource_uri: args.resource_uri.clone(),
                role: args.role.clone(),
                principal: args.principal.clone(),
                state: args.state,
            };
            let outcome = role_binding::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        RoleBindingCommands::Delete(args) => {
            let spec = RoleBindingSpec {
                id: args.id.clone(),
                resource_uri: args.resource_uri.clone(),
                role: args.role.clone(),
                principal: args.principal.clone(),
                state: DesiredState::Absent,
            };
            let outcome = role_binding::apply(client, &spec, mode).await?;
            output::print_outcome(&outcome, format);
        }
        RoleBindingCommands::List(args) => {
            let selector = Selector::new()
                .axis("principals", args.principals.clone())
                .axis("roles", args.roles.clone());
            let records = role_binding::find(client, &args.resource_uri, &selector).await?;
            output::print_collection(&records, format);
        }
    }
    Ok(())
}
