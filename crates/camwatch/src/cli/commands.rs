//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,

    /// Persist the session across restarts ("remember me")
    #[arg(short, long)]
    pub remember: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Device command arguments.
#[derive(Debug, Args)]
pub struct DeviceCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Navigation command arguments.
#[derive(Debug, Args)]
pub struct NavCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Filter for this role instead of the cached one
    #[arg(short, long)]
    pub role: Option<String>,
}

/// Signup command arguments.
#[derive(Debug, Args)]
pub struct SignupCommand {
    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Account password
    pub password: String,

    /// RTPS stream names to associate with the account
    #[arg(short = 's', long = "stream")]
    pub streams: Vec<String>,
}

/// Forgot-password command arguments.
#[derive(Debug, Args)]
pub struct ForgotPasswordCommand {
    /// Account email
    pub email: String,
}

/// Reset-password command arguments.
#[derive(Debug, Args)]
pub struct ResetPasswordCommand {
    /// Reset token from the email link
    pub token: String,

    /// New password
    pub password: String,
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
