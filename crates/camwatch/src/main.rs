//! `camctl` - CLI for camwatch
//!
//! This binary provides the command-line interface for logging into the
//! dashboard backend, inspecting the persisted session and device binding,
//! and previewing role-filtered navigation.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use camwatch::api::models::SignupRequest;
use camwatch::cli::{
    Cli, Command, ConfigCommand, ForgotPasswordCommand, LoginCommand, NavCommand,
    ResetPasswordCommand, SignupCommand,
};
use camwatch::{
    default_nav, filter_nav, init_logging, AuthApi, Authenticator, Config, GuardDecision,
    HttpClient, NavItem, Role, RouteGuard, SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Login(cmd) => handle_login(&config, &cmd).await,
        Command::Logout => handle_logout(&config),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Device(cmd) => handle_device(&config, cmd.json),
        Command::Nav(cmd) => handle_nav(&config, &cmd),
        Command::Signup(cmd) => handle_signup(&config, cmd).await,
        Command::ForgotPassword(cmd) => handle_forgot_password(&config, &cmd).await,
        Command::ResetPassword(cmd) => handle_reset_password(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<SessionStore> {
    SessionStore::open(config.database_path()).context("failed to open session store")
}

async fn handle_login(config: &Config, cmd: &LoginCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let client = HttpClient::new(&config.api)?;
    let auth = Authenticator::new(client);

    match auth.login(&store, &cmd.email, &cmd.password, cmd.remember).await {
        Ok(outcome) => {
            println!("Logged in as {} ({})", outcome.session.user.name, outcome.session.user.email);
            println!("Role:        {}", outcome.session.user.role);
            println!("Scope:       {}", outcome.session.scope);
            println!("Device:      {}", outcome.device.device_id);
            println!("Device IP:   {}", outcome.device.ip);
            Ok(())
        }
        Err(err) if err.is_device_not_registered() => {
            // The session was rolled back; nothing is persisted
            Err(anyhow::Error::from(err).context("login failed and no session was kept"))
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_logout(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let mut guard = RouteGuard::new(config.api.login_path.clone());
    let decision = guard.check(&store)?;

    let session = match decision {
        GuardDecision::Render => store.read()?,
        GuardDecision::Redirect(_) => None,
    };

    if json {
        let status = serde_json::json!({
            "state": format!("{:?}", guard.state()),
            "name": session.as_ref().map(|s| s.user.name.clone()),
            "email": session.as_ref().map(|s| s.user.email.clone()),
            "role": session.as_ref().map(|s| s.user.role.clone()),
            "scope": session.as_ref().map(|s| s.scope.to_string()),
            "database_path": config.database_path(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if let Some(session) = session {
        println!("camctl status");
        println!("-------------");
        println!("State:    Authorized");
        println!("Name:     {}", session.user.name);
        println!("Email:    {}", session.user.email);
        println!("Role:     {}", session.user.role);
        println!("Scope:    {}", session.scope);
    } else {
        println!("camctl status");
        println!("-------------");
        println!("State:    Unauthorized");
        println!("Redirect: {} (replace)", config.api.login_path);
    }
    Ok(())
}

fn handle_device(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let Some(binding) = store.device()? else {
        println!("No device binding cached. Log in first.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&binding)?);
    } else {
        println!("Device:      {}", binding.device_id);
        println!("IP:          {}", binding.ip);
        println!("Stream 1:    {}", binding.rtsp_url1);
        if !binding.rtsp_url2.is_empty() {
            println!("Stream 2:    {}", binding.rtsp_url2);
        }
    }
    Ok(())
}

fn handle_nav(config: &Config, cmd: &NavCommand) -> anyhow::Result<()> {
    let role = match &cmd.role {
        Some(raw) => Role::from(raw.as_str()),
        None => {
            let store = open_store(config)?;
            match store.role()? {
                Some(raw) => Role::from(raw.as_str()),
                None => {
                    println!("No role cached. Log in first or pass --role.");
                    return Ok(());
                }
            }
        }
    };

    let visible = filter_nav(&default_nav(), &role);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
    } else if visible.is_empty() {
        println!("No navigation entries visible to role '{role}'.");
    } else {
        println!("Navigation for role '{role}':");
        print_nav(&visible, 0);
    }
    Ok(())
}

fn print_nav(items: &[NavItem], depth: usize) {
    for item in items {
        let indent = "  ".repeat(depth + 1);
        match &item.path {
            Some(path) => println!("{indent}{} ({path})", item.name),
            None => println!("{indent}{}", item.name),
        }
        print_nav(&item.submenu, depth + 1);
    }
}

async fn handle_signup(config: &Config, cmd: SignupCommand) -> anyhow::Result<()> {
    let client = HttpClient::new(&config.api)?;
    let request = SignupRequest {
        name: cmd.name,
        email: cmd.email,
        password: cmd.password,
        rtps_names: cmd.streams,
    };
    client.signup(&request).await?;
    println!("Signup successful! Please login.");
    Ok(())
}

async fn handle_forgot_password(
    config: &Config,
    cmd: &ForgotPasswordCommand,
) -> anyhow::Result<()> {
    let client = HttpClient::new(&config.api)?;
    let message = client.forgot_password(&cmd.email).await?;
    println!("{message}");
    Ok(())
}

async fn handle_reset_password(config: &Config, cmd: &ResetPasswordCommand) -> anyhow::Result<()> {
    let client = HttpClient::new(&config.api)?;
    let message = client.reset_password(&cmd.token, &cmd.password).await?;
    println!("{message}");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Api]");
                println!("  Base URL:      {}", config.api.base_url);
                println!("  Timeout (s):   {}", config.api.timeout_secs);
                println!("  Login path:    {}", config.api.login_path);
                println!();
                println!("[Session]");
                println!("  Database path: {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
