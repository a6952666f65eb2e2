use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prismactl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative management of Prisma Access configuration", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Manifest to read (default: ~/.config/prismactl/config.toml)
    #[arg(short, long, global = true, env = "PRISMACTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Service account credentials, overriding the manifest's `[provider]`
#[derive(Args, Debug, Default, Clone)]
pub struct ProviderArgs {
    /// Service account client id
    #[arg(long, global = true, env = "PRISMACTL_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Service account client secret
    #[arg(long, global = true, env = "PRISMACTL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Tenant service group id
    #[arg(long, global = true, env = "PRISMACTL_TSG_ID")]
    pub tsg_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every manifest entry without contacting the API
    Validate,

    /// Show what apply would change
    Plan(TargetArgs),

    /// Make remote state match the manifest
    Apply(ApplyArgs),

    /// Reconcile a single resource given on the command line
    Ensure(EnsureArgs),

    /// Push staged changes of one or more folders
    Push(PushArgs),

    /// List objects of a kind in a folder
    List(ListArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Only entries matching kind or kind.name (e.g. ike_gateway.gw-1)
    pub target: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only entries matching kind or kind.name (e.g. ike_gateway.gw-1)
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Push afterwards ([push] folders, or every folder the manifest touches)
    #[arg(long)]
    pub push: bool,
}

#[derive(Args)]
pub struct EnsureArgs {
    /// Resource kind (address, address_group, tag, ike_gateway, ipsec_tunnel,
    /// service_connection, remote_network)
    pub kind: String,

    /// Folder the resource lives in
    #[arg(short, long)]
    pub folder: String,

    /// Resource name
    #[arg(short, long)]
    pub name: String,

    /// Desired state
    #[arg(short, long, default_value = "present")]
    pub state: String,

    /// Field values as key=value; dotted keys nest, values parse as JSON when they can
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Args)]
pub struct PushArgs {
    /// Folder to push (repeatable)
    #[arg(short, long = "folder", required = true)]
    pub folders: Vec<String>,

    /// Version description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Resource kind
    pub kind: String,

    /// Folder to list
    #[arg(short, long)]
    pub folder: String,
}
