//! Interactive configuration for Streamdash.
//!
//! Implements the `streamdash config` menus using dialoguer.

use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use crate::types::config::Config;
use crate::StreamdashResult;

/// Runs interactive configuration.
pub fn run_interactive_config(config_path: &Path) -> StreamdashResult<()> {
    let theme = ColorfulTheme::default();

    println!("\n🔧 Streamdash Interactive Configuration\n");

    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Creating new configuration...\n");
        Config::default_config()
    };

    loop {
        let options = vec![
            "General Settings",
            "Backend API",
            "Cache",
            "Save and Exit",
            "Exit without Saving",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What do you want to configure?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_api(&theme, &mut config)?,
            2 => configure_cache(&theme, &mut config)?,
            3 => {
                config.save(config_path)?;
                println!("\n✓ Configuration saved to: {}\n", config_path.display());
                break;
            }
            4 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Really exit without saving?")
                    .default(false)
                    .interact()?
                {
                    println!("\nExiting without saving.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Configures general options.
fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> StreamdashResult<()> {
    println!("\n📋 General Settings\n");

    let log_levels = vec!["error", "warn", "info", "debug", "trace"];
    let current_idx = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let log_level_idx = Select::with_theme(theme)
        .with_prompt("Log level")
        .items(&log_levels)
        .default(current_idx)
        .interact()?;

    config.general.log_level = log_levels[log_level_idx].to_string();

    let log_formats = vec!["text", "json"];
    let current_format_idx = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let log_format_idx = Select::with_theme(theme)
        .with_prompt("Log format")
        .items(&log_formats)
        .default(current_format_idx)
        .interact()?;

    config.general.log_format = log_formats[log_format_idx].to_string();

    println!("\n✓ General settings updated.\n");
    Ok(())
}

/// Configures the backend API.
fn configure_api(theme: &ColorfulTheme, config: &mut Config) -> StreamdashResult<()> {
    println!("\n🌐 Backend API\n");

    let base_url: String = Input::with_theme(theme)
        .with_prompt("Backend base URL")
        .default(config.api.base_url.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            match reqwest::Url::parse(input) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
                Ok(_) => Err("URL must use http or https".to_string()),
                Err(e) => Err(e.to_string()),
            }
        })
        .interact_text()?;

    config.api.base_url = base_url;

    let timeout: u64 = Input::with_theme(theme)
        .with_prompt("Request timeout (seconds)")
        .default(config.api.timeout_secs)
        .interact_text()?;

    config.api.timeout_secs = timeout;

    let change_token = Confirm::with_theme(theme)
        .with_prompt(if config.api.token.is_some() {
            "Change the bearer token?"
        } else {
            "Set a bearer token?"
        })
        .default(false)
        .interact()?;

    if change_token {
        let token: String = Password::with_theme(theme)
            .with_prompt("Bearer token (empty to remove)")
            .allow_empty_password(true)
            .interact()?;
        config.api.token = (!token.trim().is_empty()).then_some(token);
    }

    println!("\n✓ Backend API updated.\n");
    Ok(())
}

/// Configures the response cache.
fn configure_cache(theme: &ColorfulTheme, config: &mut Config) -> StreamdashResult<()> {
    println!("\n💾 Cache Configuration\n");

    config.cache.enabled = Confirm::with_theme(theme)
        .with_prompt("Enable response cache?")
        .default(config.cache.enabled)
        .interact()?;

    if !config.cache.enabled {
        println!("Cache disabled.\n");
        return Ok(());
    }

    let capacity: usize = Input::with_theme(theme)
        .with_prompt("Maximum capacity (number of entries)")
        .default(config.cache.capacity)
        .interact_text()?;

    config.cache.capacity = capacity;

    let ttl: u64 = Input::with_theme(theme)
        .with_prompt("Time to live (seconds)")
        .default(config.cache.ttl_secs)
        .interact_text()?;

    config.cache.ttl_secs = ttl;

    let live_ttl: u64 = Input::with_theme(theme)
        .with_prompt("Time to live for live feeds (seconds)")
        .default(config.cache.live_ttl_secs)
        .interact_text()?;

    config.cache.live_ttl_secs = live_ttl;

    println!("\n✓ Cache configured.\n");
    Ok(())
}

/// Prints a configuration summary.
pub fn show_config_summary(config: &Config) {
    println!("\n📊 Configuration Summary\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ General                                 │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Log level: {:<28} │", config.general.log_level);
    println!("│ Log format: {:<27} │", config.general.log_format);
    println!("├─────────────────────────────────────────┤");
    println!("│ Backend API                             │");
    println!("├─────────────────────────────────────────┤");
    println!("│ URL: {:<34} │", truncate(&config.api.base_url, 34));
    println!("│ Timeout: {:<29}s │", config.api.timeout_secs);
    println!(
        "│ Token: {:<32} │",
        if config.api.token.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("├─────────────────────────────────────────┤");
    println!("│ Cache                                   │");
    println!("├─────────────────────────────────────────┤");
    println!(
        "│ Enabled: {:<30} │",
        if config.cache.enabled { "Yes" } else { "No" }
    );
    if config.cache.enabled {
        println!("│ Capacity: {:<29} │", config.cache.capacity);
        println!("│ TTL: {:<33}s │", config.cache.ttl_secs);
        println!("│ Live TTL: {:<28}s │", config.cache.live_ttl_secs);
    }
    println!("└─────────────────────────────────────────┘");
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
