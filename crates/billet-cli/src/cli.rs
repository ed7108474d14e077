//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Billet CLI - Compatibility-based room and supervisor assignment.
#[derive(Debug, Parser)]
#[command(name = "billet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(short, long, global = true, env = "BILLET_DATABASE")]
    pub database: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import roster and staff records from JSON
    Import(ImportArgs),

    /// Rank roommate candidates for a person
    SuggestPeers(SuggestPeersArgs),

    /// Propose rooms for a cohort
    Optimize(OptimizeArgs),

    /// Persist accepted rooms from an optimize plan
    Apply(ApplyArgs),

    /// Rank supervisors for a person
    SuggestSupervisors(SuggestSupervisorsArgs),

    /// Assign a supervisor to a person
    Assign(AssignArgs),

    /// Rate a supervisor assignment
    Rate(RateArgs),

    /// List a person's assignments
    Assignments(AssignmentsArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON file with `people` and `supervisors` arrays
    #[arg(short = 'i', long)]
    pub file: Option<String>,

    /// Read the roster JSON from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the suggest-peers command.
#[derive(Debug, Parser)]
pub struct SuggestPeersArgs {
    /// Person ID
    pub person_id: u64,
}

/// Arguments for the optimize command.
#[derive(Debug, Parser)]
pub struct OptimizeArgs {
    /// Only members with this group tag
    #[arg(short, long)]
    pub group_tag: Option<String>,

    /// Maximum cohort size
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Persist the proposed rooms immediately
    #[arg(long)]
    pub apply: bool,
}

/// Arguments for the apply command.
#[derive(Debug, Parser)]
pub struct ApplyArgs {
    /// Plan file (the JSON output of `optimize`)
    #[arg(short = 'i', long)]
    pub file: Option<String>,

    /// Read the plan from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the suggest-supervisors command.
#[derive(Debug, Parser)]
pub struct SuggestSupervisorsArgs {
    /// Person ID
    pub person_id: u64,

    /// Only staff with this role
    #[arg(short, long, value_enum)]
    pub role: Option<RoleArg>,

    /// Only staff with at most this many active assignments
    #[arg(short, long)]
    pub max_load: Option<u32>,

    /// Number of suggestions
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for the assign command.
#[derive(Debug, Parser)]
pub struct AssignArgs {
    /// Supervisee ID
    pub person_id: u64,

    /// Supervisor ID
    pub supervisor_id: u64,
}

/// Arguments for the rate command.
#[derive(Debug, Parser)]
pub struct RateArgs {
    /// Assignment ID (UUID)
    pub assignment_id: String,

    /// Effectiveness rating (1-5)
    pub rating: i64,

    /// Notes to attach
    #[arg(short, long)]
    pub notes: Option<String>,
}

/// Arguments for the assignments command.
#[derive(Debug, Parser)]
pub struct AssignmentsArgs {
    /// Person ID
    pub person_id: u64,
}

/// Staff role argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RoleArg {
    /// Mentor
    Mentor,
    /// Counselor
    Counselor,
    /// Instructor
    Instructor,
    /// Administrator
    Administrator,
    /// Any other staff
    Other,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<RoleArg> for billet_domain::StaffRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Mentor => billet_domain::StaffRole::Mentor,
            RoleArg::Counselor => billet_domain::StaffRole::Counselor,
            RoleArg::Instructor => billet_domain::StaffRole::Instructor,
            RoleArg::Administrator => billet_domain::StaffRole::Administrator,
            RoleArg::Other => billet_domain::StaffRole::Other,
        }
    }
}
