use anyhow::Result;
use cirro_client::{ApiClient, ClientConfig};
use colored::Colorize;

use crate::auth::{self, StoredCredentials};
use crate::cli::LoginArgs;
use crate::output::{print_error, print_success};

/// Verifies the credentials against the control plane, then stores them
/// for the profile.
pub async fn login(
    endpoint: &str,
    args: &LoginArgs,
    cli_key: &Option<String>,
    cli_secret: &Option<String>,
    profile: &str,
) -> Result<()> {
    let api_key = args
        .api_key
        .clone()
        .or_else(|| cli_key.clone())
        .ok_or_else(|| anyhow::anyhow!("--api-key is required for login"))?;
    let api_secret = args
        .api_secret
        .clone()
        .or_else(|| cli_secret.clone())
        .ok_or_else(|| anyhow::anyhow!("--api-secret is required for login"))?;

    let config = ClientConfig::new(&api_key, &api_secret).with_endpoint(endpoint);
    let client = ApiClient::new(config)?;
    cirro_provision::ping::ping(&client).await?;

    auth::save_credentials(
        profile,
        &StoredCredentials {
            endpoint: endpoint.to_string(),
            api_key,
            api_secret,
        },
    )?;
    print_success(&format!("Logged in to {} (profile {})", endpoint.cyan(), profile.cyan()));
    Ok(())
}

pub fn logout(profile: &str) -> Result<()> {
    if auth::remove_credentials(profile)? {
        print_success(&format!("Removed credentials for profile {}", profile.cyan()));
    } else {
        print_error(&format!("No stored credentials for profile {profile}"));
    }
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    match auth::load_credentials(profile)? {
        Some(creds) => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!("{}: {}", "Endpoint".cyan(), creds.endpoint);
            println!("{}: {}", "API key".cyan(), auth::mask_key(&creds.api_key));
        }
        None => {
            println!("Not logged in (profile {profile})");
        }
    }
    Ok(())
}
