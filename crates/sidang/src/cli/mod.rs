//! Command-line interface for sidang.
//!
//! This module provides the CLI structure parsed by the `sidang` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CalendarArgs, ConfigCommand, DecisionArg, DosenCommand, FormatArg, ListArgs, LoginCommand,
    ProfileCommand, RoleArg, StatusCommand, ThesisCommand,
};

/// sidang - Thesis-defense scheduling from the terminal
///
/// Students submit their thesis and follow its review; advisors review,
/// approve and schedule defenses.
#[derive(Debug, Parser)]
#[command(name = "sidang")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a session from a Google ID token
    Login(LoginCommand),

    /// Clear the stored session
    Logout,

    /// Show session, starting route and backend health
    Status(StatusCommand),

    /// View or update your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Submit and list your own thesis (student)
    #[command(subcommand)]
    Thesis(ThesisCommand),

    /// Review and schedule submissions (advisor)
    #[command(subcommand)]
    Dosen(DosenCommand),

    /// Student dashboard: greeting, calendar and submissions
    Dashboard(CalendarArgs),

    /// Month calendar of scheduled defenses
    Calendar(CalendarArgs),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "sidang");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(
            parse(&["sidang", "-q", "logout"]).verbosity(),
            crate::logging::Verbosity::Quiet
        );
        assert_eq!(
            parse(&["sidang", "logout"]).verbosity(),
            crate::logging::Verbosity::Normal
        );
        assert_eq!(
            parse(&["sidang", "-v", "logout"]).verbosity(),
            crate::logging::Verbosity::Verbose
        );
        assert_eq!(
            parse(&["sidang", "-vv", "logout"]).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_parse_login() {
        let cli = parse(&["sidang", "login", "--token", "a.b.c", "--role", "dosen"]);
        let Command::Login(login) = cli.command else {
            panic!("expected login");
        };
        assert_eq!(login.token.as_deref(), Some("a.b.c"));
        assert_eq!(login.role, Some(RoleArg::Dosen));
    }

    #[test]
    fn test_parse_thesis_list_page() {
        let cli = parse(&["sidang", "thesis", "list", "--page", "3", "-f", "table"]);
        let Command::Thesis(ThesisCommand::List(args)) = cli.command else {
            panic!("expected thesis list");
        };
        assert_eq!(args.page, 3);
        assert_eq!(args.format, FormatArg::Table);
    }

    #[test]
    fn test_parse_review_decision() {
        let cli = parse(&["sidang", "dosen", "review", "t1", "approved"]);
        assert!(matches!(
            cli.command,
            Command::Dosen(DosenCommand::Review {
                decision: DecisionArg::Approved,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["sidang", "dosen", "review", "t1", "maybe"]).is_err());
    }

    #[test]
    fn test_parse_schedule_defaults_time() {
        let cli = parse(&["sidang", "dosen", "schedule", "t1", "--date", "2025-12-20"]);
        let Command::Dosen(DosenCommand::Schedule { time, .. }) = cli.command else {
            panic!("expected schedule");
        };
        assert_eq!(time, "09:00");
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["sidang", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_calendar() {
        let cli = parse(&["sidang", "calendar", "--month", "2025-12", "--day", "2025-12-20"]);
        let Command::Calendar(args) = cli.command else {
            panic!("expected calendar");
        };
        assert_eq!(args.month.as_deref(), Some("2025-12"));
        assert_eq!(args.day.as_deref(), Some("2025-12-20"));
    }
}
