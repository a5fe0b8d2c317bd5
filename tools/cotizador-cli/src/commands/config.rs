//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use cotizador_commerce::catalog::CategoryRepository;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    // Storage section
    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.config.storage.dir);
    ctx.output.kv("key", &ctx.config.storage.key);
    ctx.output
        .kv("resolved", &ctx.storage_dir().display().to_string());

    // Catalog section
    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(built-in)"),
    );

    ctx.output.info("");
    ctx.output.info("[output]");
    ctx.output.kv("color", &ctx.config.output.color.to_string());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(ref config_path) = ctx.config_path else {
        bail!("No config file found. Run `cotizador config init` to create one.");
    };

    // Reload so values resolved at startup are not written back.
    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cotizador.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = cotizador_cache::validate_key(&ctx.config.storage.key) {
        errors.push(format!("storage.key: {}", e));
    }

    if ctx.config.storage.dir.trim().is_empty() {
        errors.push("storage.dir is required".to_string());
    }

    match ctx.load_catalog() {
        Ok(catalog) => {
            if catalog.products().is_empty() {
                warnings.push("catalog has no products".to_string());
            }
            for product in catalog.products() {
                if catalog.find_category(product.category_id).is_none() {
                    warnings.push(format!(
                        "product {} references unknown category {}",
                        product.sku, product.category_id
                    ));
                }
            }
            for category in CategoryRepository::list_all(&catalog) {
                if !category.has_valid_slug() {
                    warnings.push(format!("category slug '{}' is not URL-friendly", category.slug));
                }
            }
        }
        Err(e) => errors.push(format!("{:#}", e)),
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "dir"] => Ok(config.storage.dir.clone().into()),
        ["storage", "key"] => Ok(config.storage.key.clone().into()),
        ["catalog", "path"] => Ok(config.catalog.path.clone().into()),
        ["output", "color"] => Ok(config.output.color.into()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "dir"] => config.storage.dir = value.to_string(),
        ["storage", "key"] => {
            cotizador_cache::validate_key(value)?;
            config.storage.key = value.to_string()
        }
        ["catalog", "path"] if value.is_empty() => config.catalog.path = None,
        ["catalog", "path"] => config.catalog.path = Some(value.to_string()),
        ["output", "color"] => config.output.color = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();

        set_config_value(&mut config, "storage.key", "planta-norte").unwrap();
        set_config_value(&mut config, "catalog.path", "repuestos.json").unwrap();
        set_config_value(&mut config, "output.color", "false").unwrap();

        assert_eq!(get_config_value(&config, "storage.key").unwrap(), "planta-norte");
        assert_eq!(get_config_value(&config, "catalog.path").unwrap(), "repuestos.json");
        assert_eq!(get_config_value(&config, "output.color").unwrap(), false);

        set_config_value(&mut config, "catalog.path", "").unwrap();
        assert!(get_config_value(&config, "catalog.path").unwrap().is_null());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = CliConfig::default();
        assert!(set_config_value(&mut config, "storage.key", "../fuera").is_err());
        assert!(set_config_value(&mut config, "output.color", "quizás").is_err());
        assert!(set_config_value(&mut config, "deploy.canary", "true").is_err());
        assert_eq!(config, CliConfig::default());
    }
}
