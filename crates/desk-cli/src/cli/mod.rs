use clap::{Parser, Subcommand};

pub mod global;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
use subcommands::{AuthCommands, OrgCommands};

/// Top-level CLI parser for the `desk` binary.
#[derive(Debug, Parser)]
#[command(name = "desk", version, about = "orgdesk - manage your organization from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json, raw
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL, overriding `api.base_url`
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out and manage your account.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Browse and manage organizations.
    Org {
        #[command(subcommand)]
        action: OrgCommands,
    },
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            api_url: self.api_url.clone(),
        }
    }
}
