use crate::cli::CliContext;
use crate::constants;
use crate::core::file_lock::FileLock;
use crate::core::store::{AuthError, AuthStore};
use crate::util::fs as auth_fs;
use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Password;
use zeroize::Zeroizing;

fn parse_username(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("username cannot be empty".into());
    }
    Ok(s.to_string())
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(value_parser = parse_username)]
    pub username: String,

    /// Password for the new user; prompted for when omitted
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(value_parser = parse_username)]
    pub username: String,

    /// Password to check; prompted for when omitted
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    #[arg(value_parser = parse_username)]
    pub username: String,

    /// Replacement password; prompted for when omitted
    pub new_password: Option<String>,
}

pub async fn run_list(ctx: &CliContext) -> Result<()> {
    let store = AuthStore::load(&ctx.paths).await?;
    let mut count = 0;
    for user in store.users() {
        count += 1;
        println!("{}", user.username);
    }
    println!();
    println!("Total users: {}", count);
    Ok(())
}

pub async fn run_add(ctx: &CliContext, args: AddArgs) -> Result<()> {
    let password = resolve_password(args.password, "Password", true)?;
    auth_fs::ensure_dir(&ctx.paths.config_dir, constants::CONFIG_DIR_MODE)?;
    let _lock = FileLock::exclusive(&ctx.paths.store_lock)?;

    let mut store = AuthStore::load(&ctx.paths).await?;
    // A taken username is fatal, not a user-facing outcome
    store
        .add_user(&args.username, &password)
        .with_context(|| format!("add user '{}'", args.username))?;
    store.save().await?;
    ctx.audit("add_user", &args.username);

    println!("User created");
    Ok(())
}

pub async fn run_validate(ctx: &CliContext, args: ValidateArgs) -> Result<()> {
    let password = resolve_password(args.password, "Password", false)?;
    let store = AuthStore::load(&ctx.paths).await?;

    match store.validate_login(&args.username, &password) {
        Ok(()) => println!("Auth valid"),
        Err(AuthError::InvalidAuth) => println!("Auth invalid"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub async fn run_change_password(ctx: &CliContext, args: ChangePasswordArgs) -> Result<()> {
    let password = resolve_password(args.new_password, "New password", true)?;
    auth_fs::ensure_dir(&ctx.paths.config_dir, constants::CONFIG_DIR_MODE)?;
    let _lock = FileLock::exclusive(&ctx.paths.store_lock)?;

    let mut store = AuthStore::load(&ctx.paths).await?;
    match store.change_password(&args.username, &password) {
        Ok(()) => {
            store.save().await?;
            ctx.audit("change_password", &args.username);
            println!("Password changed");
        }
        // Unknown user is reported, not raised; nothing is persisted
        Err(AuthError::InvalidUser) => println!("User not found"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn resolve_password(
    arg: Option<String>,
    prompt: &str,
    confirm: bool,
) -> Result<Zeroizing<String>> {
    if let Some(password) = arg {
        return Ok(Zeroizing::new(password));
    }
    let mut input = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(false);
    if confirm {
        input = input.with_confirmation(
            format!("Repeat {}", prompt.to_lowercase()),
            "Passwords do not match",
        );
    }
    Ok(Zeroizing::new(
        input.interact().context("read password from prompt")?,
    ))
}
