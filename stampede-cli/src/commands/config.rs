//! `stampede config` handlers

use anyhow::{Context, Result};
use stampede_config::{ConfigLoader, StampedeConfig};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Load with the standard precedence: file, then environment overrides
pub fn load_config(config_file: Option<&Path>) -> Result<StampedeConfig> {
    ConfigLoader::new()
        .load(config_file)
        .context("Failed to load configuration")
}

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!("Configuration file not found: {:?}", config_file));
    }

    match load_config(Some(config_file)) {
        Ok(_) => {
            println!("✅ Configuration file is valid");
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Handle sample configuration generation
pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating sample configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, StampedeConfig::generate_sample()).context("Failed to write configuration file")?;

    println!("✅ Sample configuration generated at: {:?}", output);
    println!("🔧 Validate with: stampede config validate --config-file {:?}", output);
    Ok(())
}

/// Render the effective configuration in `format`
pub fn render_config(config: &StampedeConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(config).context("Failed to serialize to JSON"),
        _ => Err(anyhow::anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}

/// Handle configuration display
pub fn handle_config_show(config_file: Option<&Path>, format: &str) -> Result<()> {
    info!("Showing configuration (format: {})", format);
    let config = load_config(config_file)?;
    println!("{}", render_config(&config, format)?);
    Ok(())
}
