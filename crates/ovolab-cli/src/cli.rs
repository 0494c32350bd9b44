//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ovolab_core::RecordId;
use ovolab_core::grouping::GfeGrouping;

/// Ovolab CLI - embryo-transfer laboratory records
#[derive(Parser, Debug)]
#[command(name = "ovolab")]
#[command(version, about = "Embryo-transfer laboratory records client", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        /// User name
        usuario: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "OVOLAB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check backend and database health
    Health,
    /// Donor registry
    Donadoras {
        #[command(subcommand)]
        action: DonadorasAction,
    },
    /// OPU sessions
    Opu {
        #[command(subcommand)]
        action: OpuAction,
    },
    /// Fecundación lab sessions
    Fecundacion {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Transfer sessions
    Transferencia {
        #[command(subcommand)]
        action: TransferenciaAction,
    },
    /// GFE check sessions
    Gfe {
        #[command(subcommand)]
        action: GfeAction,
    },
    /// Printable HTML session reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// Delete a transfer session and its transfers
    DeleteSession {
        /// Transfer session id
        id: RecordId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Saved form drafts
    Drafts {
        #[command(subcommand)]
        action: DraftsAction,
    },
    /// Configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum DonadorasAction {
    /// One page of donors
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Name or registry number fragment
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Breed
        #[arg(long)]
        raza: Option<String>,

        /// Only active (true) or inactive (false) donors
        #[arg(long)]
        activo: Option<bool>,
    },
    /// Registry-wide counts
    Stats,
    /// The registry as CSV
    Export {
        /// Only active (true) or inactive (false) donors
        #[arg(long)]
        activo: Option<bool>,

        /// Write the CSV here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OpuAction {
    /// Sessions newest first with oocyte counts
    Sessions,
}

#[derive(Subcommand, Debug)]
pub enum SessionsAction {
    /// Sessions with their summaries
    Sessions {
        /// Show per-session detail statistics
        #[arg(short, long)]
        detail: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransferenciaAction {
    /// Sessions with their summaries
    Sessions {
        /// Show per-session detail statistics
        #[arg(short, long)]
        detail: bool,

        /// Merge same-day sessions of one technician
        #[arg(long, conflicts_with = "detail")]
        by_technician: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GfeAction {
    /// Check sessions with pregnancy rates
    Sessions {
        /// Secondary grouping field
        #[arg(long, value_enum, default_value_t = GroupBy::Cliente)]
        by: GroupBy,

        /// Show per-session detail statistics
        #[arg(short, long)]
        detail: bool,
    },
}

/// GFE grouping field.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Date and client
    Cliente,
    /// Date and checking technician
    Tecnico,
}

impl From<GroupBy> for GfeGrouping {
    fn from(by: GroupBy) -> Self {
        match by {
            GroupBy::Cliente => Self::Cliente,
            GroupBy::Tecnico => Self::Tecnico,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ReportKind {
    /// OPU session report
    Opu {
        /// OPU session id
        id: RecordId,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Transfer session report
    Transferencia {
        /// Transfer session id
        id: RecordId,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DraftsAction {
    /// Your open drafts
    List {
        /// Module, e.g. `opu`
        #[arg(long)]
        modulo: Option<String>,

        /// Record type within the module
        #[arg(long)]
        tipo: Option<String>,
    },
    /// Delete a draft
    Discard {
        /// Draft id
        id: RecordId,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print the effective configuration
    Show,
}
