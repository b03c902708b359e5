//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOG_FORMATS};
use crate::error::{SyncStoreError, SyncStoreResult};
use crate::merge::ListMergePolicy;
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &Config,
) -> SyncStoreResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            set_value(manager, config, &key, &value).await?
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> SyncStoreResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> SyncStoreResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(
        &ctx,
        &format!("Configuration initialized at {}", path.display()),
    );
    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> SyncStoreResult<()> {
    let mut config = config.clone();
    apply_value(&mut config, key, value)?;
    manager.save(&config).await?;

    let ctx = UiContext::detect();
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
    Ok(())
}

/// Apply a dot-separated key to the config
fn apply_value(config: &mut Config, key: &str, value: &str) -> SyncStoreResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["identity", "user_id"] => config.identity.user_id = optional(value),
        ["storage", "app_group_dir"] => config.storage.app_group_dir = optional(value).map(PathBuf::from),
        ["storage", "cache_dir"] => config.storage.cache_dir = optional(value).map(PathBuf::from),
        ["merge", "list_policy"] => {
            config.merge.list_policy = value.parse::<ListMergePolicy>().map_err(SyncStoreError::User)?
        }
        _ => return Err(SyncStoreError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

/// An empty value unsets an optional key
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_log_format(value: &str) -> SyncStoreResult<String> {
    if LOG_FORMATS.contains(&value) {
        return Ok(value.to_string());
    }
    Err(SyncStoreError::User(format!(
        "Invalid log format '{}', expected one of {}",
        value,
        LOG_FORMATS.join(", ")
    )))
}
