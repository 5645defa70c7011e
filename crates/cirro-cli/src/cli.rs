use cirro_core::DesiredState;
use cirro_provision::cluster::{Availability, Cloud, ClusterKind};
use cirro_provision::connector::ConnectorState;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "cirro")]
#[command(about = "Cirro Cloud CLI — declarative control-plane provisioning")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API endpoint (overrides config and stored credentials)
    #[arg(long, global = true, env = "CIRRO_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key (overrides stored credentials)
    #[arg(long, global = true, env = "CIRRO_API_KEY")]
    pub api_key: Option<String>,

    /// API secret
    #[arg(long, global = true, env = "CIRRO_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CIRRO_API_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Config profile name
    #[arg(short, long, global = true, env = "CIRRO_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Plan changes without issuing writes
    #[arg(long, global = true)]
    pub check: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify connectivity and credentials
    Ping,
    /// Store credentials for a profile
    Login(LoginArgs),
    /// Logout (remove stored credentials)
    Logout,
    /// Show the active profile, endpoint, and API key
    Whoami,
    /// Manage CLI configuration
    Config(ConfigArgs),
    /// Manage environments
    Environment(EnvironmentCmd),
    /// Manage Kafka clusters
    Cluster(ClusterCmd),
    /// Manage service accounts
    ServiceAccount(ServiceAccountCmd),
    /// Manage API keys
    ApiKey(ApiKeyCmd),
    /// Manage organization users and invitations
    User(UserCmd),
    /// Manage role bindings
    RoleBinding(RoleBindingCmd),
    /// Manage connectors
    Connector(ConnectorCmd),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// API key
    #[arg(long)]
    pub api_key: Option<String>,
    /// API secret
    #[arg(long)]
    pub api_secret: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (endpoint, format)
    pub key: String,
    /// Value
    pub value: String,
}

// --- environments ---

#[derive(clap::Args)]
pub struct EnvironmentCmd {
    #[command(subcommand)]
    pub command: EnvironmentCommands,
}

#[derive(Subcommand)]
pub enum EnvironmentCommands {
    /// Converge an environment toward the given spec
    Apply(EnvironmentApplyArgs),
    /// Remove an environment
    Delete(EnvironmentDeleteArgs),
    /// List environments
    List(EnvironmentListArgs),
}

#[derive(clap::Args)]
pub struct EnvironmentApplyArgs {
    /// Environment id
    #[arg(long)]
    pub id: Option<String>,
    /// Environment name
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct EnvironmentDeleteArgs {
    /// Environment id
    #[arg(long)]
    pub id: Option<String>,
    /// Environment name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args)]
pub struct EnvironmentListArgs {
    /// Restrict to these ids
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Restrict to these names
    #[arg(long = "name")]
    pub names: Vec<String>,
}

// --- clusters ---

#[derive(clap::Args)]
pub struct ClusterCmd {
    #[command(subcommand)]
    pub command: ClusterCommands,
}

#[derive(Subcommand)]
pub enum ClusterCommands {
    /// Converge a cluster toward the given spec
    Apply(ClusterApplyArgs),
    /// Remove a cluster
    Delete(ClusterDeleteArgs),
    /// List clusters in an environment
    List(ClusterListArgs),
}

#[derive(clap::Args)]
pub struct ClusterApplyArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Cluster id
    #[arg(long)]
    pub id: Option<String>,
    /// Cluster name
    #[arg(long)]
    pub name: Option<String>,
    /// Availability zone configuration (SINGLE_ZONE or MULTI_ZONE)
    #[arg(long)]
    pub availability: Option<Availability>,
    /// Cloud provider (AWS, GCP, or AZURE)
    #[arg(long)]
    pub cloud: Option<Cloud>,
    /// Cloud provider region
    #[arg(long)]
    pub region: Option<String>,
    /// Cluster tier (Basic, Standard, or Dedicated)
    #[arg(long)]
    pub kind: Option<ClusterKind>,
    /// Capacity units for Dedicated clusters
    #[arg(long)]
    pub cku: Option<u32>,
    /// Encryption key id for Dedicated clusters
    #[arg(long)]
    pub encryption_key: Option<String>,
    /// Network id
    #[arg(long)]
    pub network: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct ClusterDeleteArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Cluster id
    #[arg(long)]
    pub id: Option<String>,
    /// Cluster name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args)]
pub struct ClusterListArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Restrict to these ids
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Restrict to these names
    #[arg(long = "name")]
    pub names: Vec<String>,
}

// --- service accounts ---

#[derive(clap::Args)]
pub struct ServiceAccountCmd {
    #[command(subcommand)]
    pub command: ServiceAccountCommands,
}

#[derive(Subcommand)]
pub enum ServiceAccountCommands {
    /// Converge a service account toward the given spec
    Apply(ServiceAccountApplyArgs),
    /// Remove a service account
    Delete(ServiceAccountDeleteArgs),
    /// List service accounts
    List(ServiceAccountListArgs),
}

#[derive(clap::Args)]
pub struct ServiceAccountApplyArgs {
    /// Service account id
    #[arg(long)]
    pub id: Option<String>,
    /// Service account name (immutable after creation)
    #[arg(long)]
    pub name: Option<String>,
    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct ServiceAccountDeleteArgs {
    /// Service account id
    #[arg(long)]
    pub id: Option<String>,
    /// Service account name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args)]
pub struct ServiceAccountListArgs {
    /// Restrict to these ids
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Restrict to these names
    #[arg(long = "name")]
    pub names: Vec<String>,
}

// --- API keys ---

#[derive(clap::Args)]
pub struct ApiKeyCmd {
    #[command(subcommand)]
    pub command: ApiKeyCommands,
}

#[derive(Subcommand)]
pub enum ApiKeyCommands {
    /// Converge an API key toward the given spec
    Apply(ApiKeyApplyArgs),
    /// Remove an API key
    Delete(ApiKeyDeleteArgs),
    /// List API keys
    List(ApiKeyListArgs),
}

#[derive(clap::Args)]
pub struct ApiKeyApplyArgs {
    /// API key id
    #[arg(long)]
    pub id: Option<String>,
    /// API key name
    #[arg(long)]
    pub name: Option<String>,
    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
    /// Owning user or service account id
    #[arg(long)]
    pub owner: Option<String>,
    /// Cluster id the key is scoped to (omit for a cloud key)
    #[arg(long)]
    pub resource: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct ApiKeyDeleteArgs {
    /// API key id
    #[arg(long)]
    pub id: Option<String>,
    /// API key name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args)]
pub struct ApiKeyListArgs {
    /// Restrict to these ids
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Restrict to keys owned by these principals
    #[arg(long = "owner")]
    pub owners: Vec<String>,
    /// Restrict to these names
    #[arg(long = "name")]
    pub names: Vec<String>,
}

// --- users ---

#[derive(clap::Args)]
pub struct UserCmd {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Converge a user toward the given spec (invites when missing)
    Apply(UserApplyArgs),
    /// Remove a user or withdraw a pending invitation
    Delete(UserDeleteArgs),
    /// List users and pending invitations
    List(UserListArgs),
}

#[derive(clap::Args)]
pub struct UserApplyArgs {
    /// User id
    #[arg(long)]
    pub id: Option<String>,
    /// Full name
    #[arg(long)]
    pub name: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct UserDeleteArgs {
    /// User id
    #[arg(long)]
    pub id: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(clap::Args)]
pub struct UserListArgs {
    /// Restrict to these ids
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Restrict to these email addresses
    #[arg(long = "email")]
    pub emails: Vec<String>,
    /// Restrict to these full names
    #[arg(long = "name")]
    pub names: Vec<String>,
}

// --- role bindings ---

#[derive(clap::Args)]
pub struct RoleBindingCmd {
    #[command(subcommand)]
    pub command: RoleBindingCommands,
}

#[derive(Subcommand)]
pub enum RoleBindingCommands {
    /// Converge a role binding toward the given spec
    Apply(RoleBindingApplyArgs),
    /// Remove a role binding
    Delete(RoleBindingDeleteArgs),
    /// List role bindings under a CRN pattern
    List(RoleBindingListArgs),
}

#[derive(clap::Args)]
pub struct RoleBindingApplyArgs {
    /// CRN pattern scoping the binding
    #[arg(long)]
    pub resource_uri: String,
    /// Role binding id
    #[arg(long)]
    pub id: Option<String>,
    /// Role name
    #[arg(long)]
    pub role: Option<String>,
    /// Principal (bare u-/sa- ids are accepted)
    #[arg(long)]
    pub principal: Option<String>,
    #[arg(long, default_value_t = DesiredState::Present)]
    pub state: DesiredState,
}

#[derive(clap::Args)]
pub struct RoleBindingDeleteArgs {
    /// CRN pattern scoping the binding
    #[arg(long)]
    pub resource_uri: String,
    /// Role binding id
    #[arg(long)]
    pub id: Option<String>,
    /// Role name
    #[arg(long)]
    pub role: Option<String>,
    /// Principal
    #[arg(long)]
    pub principal: Option<String>,
}

#[derive(clap::Args)]
pub struct RoleBindingListArgs {
    /// CRN pattern scoping the listing
    #[arg(long)]
    pub resource_uri: String,
    /// Restrict to these principals
    #[arg(long = "principal")]
    pub principals: Vec<String>,
    /// Restrict to these roles
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

// --- connectors ---

#[derive(clap::Args)]
pub struct ConnectorCmd {
    #[command(subcommand)]
    pub command: ConnectorCommands,
}

#[derive(Subcommand)]
pub enum ConnectorCommands {
    /// Converge a connector toward the given spec
    Apply(ConnectorApplyArgs),
    /// Remove a connector
    Delete(ConnectorTargetArgs),
    /// Pause a running connector
    Pause(ConnectorTargetArgs),
    /// Resume a paused connector
    Resume(ConnectorTargetArgs),
    /// List connectors in a cluster
    List(ConnectorListArgs),
}

#[derive(clap::Args)]
pub struct ConnectorApplyArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Parent cluster id
    #[arg(long)]
    pub cluster: String,
    /// Connector name
    #[arg(long)]
    pub name: String,
    /// Connector class
    #[arg(long = "class")]
    pub connector_class: Option<String>,
    /// Kafka API key the connector authenticates with
    #[arg(long)]
    pub kafka_key: Option<String>,
    /// Kafka API secret
    #[arg(long)]
    pub kafka_secret: Option<String>,
    /// Path to a JSON file of class-specific config (reads stdin if "-")
    #[arg(long)]
    pub props: Option<String>,
    #[arg(long, default_value_t = ConnectorState::Present)]
    pub state: ConnectorState,
}

#[derive(clap::Args)]
pub struct ConnectorTargetArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Parent cluster id
    #[arg(long)]
    pub cluster: String,
    /// Connector name
    #[arg(long)]
    pub name: String,
}

#[derive(clap::Args)]
pub struct ConnectorListArgs {
    /// Parent environment id
    #[arg(long)]
    pub environment: String,
    /// Parent cluster id
    #[arg(long)]
    pub cluster: String,
    /// Restrict to these names
    #[arg(long = "name")]
    pub names: Vec<String>,
    /// Restrict to this connector type (source or sink)
    #[arg(long = "type")]
    pub types: Vec<String>,
    /// Restrict to these connector classes
    #[arg(long = "class")]
    pub classes: Vec<String>,
}
