//! CLI routing and command dispatch.

use crate::core::audit_log;
use crate::core::paths::ConfigPaths;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod user;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: ConfigPaths,
}

impl CliContext {
    /// Record a mutation in the audit trail. Best-effort: a failed write
    /// warns on stderr and the operation still counts as succeeded.
    pub fn audit(&self, action: &str, username: &str) {
        if let Err(e) = audit_log::log(&self.paths, action, username) {
            eprintln!("warning: audit log failed: {}", e);
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "auth", version, about = "Manage local users for the Hearth hub")]
pub struct Cli {
    /// Directory that contains the hub configuration
    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "DIR",
        env = "AUTH_CONFIG_DIR"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = ConfigPaths::resolve(self.config)?;
        let ctx = CliContext { paths };

        // One operation per invocation. The runtime only has to cover the
        // store load and persist awaits.
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .context("build async runtime")?;
        rt.block_on(async {
            match self.command {
                Commands::List => user::run_list(&ctx).await,
                Commands::Add(args) => user::run_add(&ctx, args).await,
                Commands::Validate(args) => user::run_validate(&ctx, args).await,
                Commands::ChangePassword(args) => user::run_change_password(&ctx, args).await,
            }
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List usernames and a total count
    List,
    /// Create a user
    Add(user::AddArgs),
    /// Check a username/password pair against the store
    Validate(user::ValidateArgs),
    /// Change a user's password
    #[command(name = "change_password")]
    ChangePassword(user::ChangePasswordArgs),
}
