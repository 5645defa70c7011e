use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cirro_client::config::DEFAULT_ENDPOINT;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    pub endpoint: Option<String>,
    pub format: Option<String>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".cirro");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all() -> Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile = toml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all()?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all()?;
    all.insert(
        profile.to_string(),
        ProfileConfig {
            endpoint: config.endpoint.clone(),
            format: config.format.clone(),
        },
    );
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path()?, content)?;
    Ok(())
}

/// Endpoint resolution order: flag / env var, profile config, stored
/// credentials, then the platform default.
pub fn resolve_endpoint(cli_endpoint: &Option<String>, profile: &str) -> Result<String> {
    if let Some(endpoint) = cli_endpoint {
        return Ok(endpoint.clone());
    }
    let cfg = load_profile(profile)?;
    if let Some(endpoint) = cfg.endpoint {
        return Ok(endpoint);
    }
    if let Ok(Some(creds)) = crate::auth::load_credentials(profile) {
        return Ok(creds.endpoint);
    }
    Ok(DEFAULT_ENDPOINT.to_string())
}

/// Credential resolution order: flags / env vars, then stored
/// credentials for the profile.
pub fn resolve_credentials(
    cli_key: &Option<String>,
    cli_secret: &Option<String>,
    profile: &str,
) -> Result<(String, String)> {
    if let (Some(key), Some(secret)) = (cli_key, cli_secret) {
        return Ok((key.clone(), secret.clone()));
    }
    if let Some(creds) = crate::auth::load_credentials(profile)? {
        return Ok((creds.api_key, creds.api_secret));
    }
    anyhow::bail!(
        "No credentials configured. Use --api-key/--api-secret, set CIRRO_API_KEY and \
         CIRRO_API_SECRET, or run: cirro login --api-key <key> --api-secret <secret>"
    )
}
