use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pocinfobipemails")]
#[command(version)]
#[command(about = "Declarative management of Infobip email templates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (TOML, or JSON with a .json extension)
    #[arg(
        short,
        long,
        global = true,
        env = "POCINFOBIPEMAILS_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// State file [default: next to the config file]
    #[arg(long, global = true, env = "POCINFOBIPEMAILS_STATE")]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check the config file without contacting the API
    Validate,

    /// Show what apply would change
    Plan(PlanArgs),

    /// Create, update and delete templates to match the config
    Apply(ApplyArgs),

    /// Delete every managed template
    Destroy(DestroyArgs),

    /// Re-read every managed template from the API
    Refresh,

    /// Start managing an existing template
    Import {
        /// Local address to record the template under
        address: String,

        /// Remote template id
        id: String,
    },

    /// Inspect or edit recorded state
    #[command(subcommand)]
    State(StateCommand),

    /// List every template on the account
    Templates,

    /// Print the provider and resource schemas
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Default)]
pub struct RefreshArgs {
    /// Re-read managed templates before planning (default)
    #[arg(long, overrides_with = "no_refresh")]
    pub refresh: bool,

    /// Plan against recorded state only
    #[arg(long, overrides_with = "refresh")]
    pub no_refresh: bool,
}

impl RefreshArgs {
    pub fn enabled(&self) -> bool {
        !self.no_refresh
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Only plan a single address ("welcome" or "email_template.welcome")
    #[arg(short, long)]
    pub target: Option<String>,

    #[command(flatten)]
    pub refresh: RefreshArgs,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only apply a single address
    #[arg(short, long)]
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the plan without making changes
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub refresh: RefreshArgs,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Only destroy a single address
    #[arg(short, long)]
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum StateCommand {
    /// List managed addresses
    List,

    /// Show everything recorded for one address
    Show {
        /// Local address
        address: String,
    },

    /// Forget an address without deleting the remote template
    Rm {
        /// Local address
        address: String,
    },
}
