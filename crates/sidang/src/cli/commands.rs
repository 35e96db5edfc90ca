//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::Role;
use crate::view::OutputFormat;

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Google ID token from the sign-in flow (read from stdin if omitted)
    #[arg(short, long, value_name = "ID_TOKEN")]
    pub token: Option<String>,

    /// Force a role instead of deriving it from the e-mail
    #[arg(short, long, value_enum)]
    pub role: Option<RoleArg>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Skip the backend health check
    #[arg(long)]
    pub offline: bool,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in user's profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Update name and study program
    Update {
        /// Display name (2-100 characters)
        #[arg(long)]
        name: String,

        /// Study program (2-100 characters)
        #[arg(long)]
        prodi: String,
    },
}

/// Student thesis commands.
#[derive(Debug, Subcommand)]
pub enum ThesisCommand {
    /// List own submissions
    List(ListArgs),

    /// Submit a new thesis
    Submit {
        /// Thesis title (10-200 characters)
        #[arg(long)]
        title: String,

        /// Link to the document (http or https)
        #[arg(long)]
        doc_url: String,
    },
}

/// Advisor commands.
#[derive(Debug, Subcommand)]
pub enum DosenCommand {
    /// Pending queue and upcoming defenses
    Dashboard,

    /// Submissions waiting for review
    Pending(ListArgs),

    /// Every submission
    List(ListArgs),

    /// Approved submissions with a defense date
    Scheduled(ListArgs),

    /// Show one submission
    Show {
        /// Thesis id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Approve, reject or reset a submission
    Review {
        /// Thesis id
        id: String,

        /// New status
        #[arg(value_enum)]
        decision: DecisionArg,
    },

    /// Set the defense date and time (local time)
    Schedule {
        /// Thesis id
        id: String,

        /// Defense day, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Defense time, HH:MM
        #[arg(long, default_value = "09:00")]
        time: String,
    },
}

/// Calendar arguments.
#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Month to show, YYYY-MM (defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Day whose agenda is listed, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub day: Option<String>,
}

/// Arguments shared by list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: FormatArg,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Role argument for `login --role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Student
    Mahasiswa,
    /// Advisor
    Dosen,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Mahasiswa => Self::Mahasiswa,
            RoleArg::Dosen => Self::Dosen,
        }
    }
}

/// Review decision argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    /// Accept the submission
    Approved,
    /// Turn the submission down
    Rejected,
    /// Put the submission back in the queue
    Pending,
}

impl DecisionArg {
    /// Wire value sent to the server.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Pending => "PENDING",
        }
    }
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Self::Plain,
            FormatArg::Table => Self::Table,
            FormatArg::Json => Self::Json,
        }
    }
}
