//! Command-line interface for camwatch.
//!
//! This module provides the CLI structure and command handlers for the
//! `camctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeviceCommand, ForgotPasswordCommand, LoginCommand, NavCommand,
    ResetPasswordCommand, SignupCommand, StatusCommand,
};

/// camctl - session and device client for the camwatch dashboard
///
/// Logs in against the dashboard backend, persists the session locally,
/// resolves the registered camera device, and reports authorization state
/// and role-filtered navigation.
#[derive(Debug, Parser)]
#[command(name = "camctl")]
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
    /// Log in and persist the session
    Login(LoginCommand),

    /// Clear the session from both storage scopes
    Logout,

    /// Show authorization state and cached identity
    Status(StatusCommand),

    /// Show the cached device binding
    Device(DeviceCommand),

    /// Show the navigation visible to the cached role
    Nav(NavCommand),

    /// Create an account
    Signup(SignupCommand),

    /// Request a password reset link
    ForgotPassword(ForgotPasswordCommand),

    /// Reset the password with a token
    ResetPassword(ResetPasswordCommand),

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
