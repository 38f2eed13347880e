use super::ConfigCommands;
use crate::config::FolioConfig;
use anyhow::Result;
use std::path::Path;

pub fn run(cmd: ConfigCommands, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Validate => validate(config_path),
        ConfigCommands::Show => show(config_path),
    }
}

fn validate(config_path: &Path) -> Result<()> {
    let config = match FolioConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => anyhow::bail!("Failed to parse {}: {}", config_path.display(), e),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        println!("❌ Validation errors in {}:", config_path.display());
        for e in &errors {
            println!("  - {}", e);
        }
        anyhow::bail!("{} problem(s) found", errors.len());
    }

    println!("✅ {} is valid.", config_path.display());
    if config.resolved_api_key().is_none() {
        println!(
            "⚠️  No provider credential found; set {} before serving chat requests.",
            config.provider.api_key_env
        );
    }
    Ok(())
}

fn show(config_path: &Path) -> Result<()> {
    let mut config = FolioConfig::load_or_default(config_path)?;
    if config.provider.api_key.is_some() {
        config.provider.api_key = Some("********".to_string());
    }
    match toml::to_string_pretty(&config) {
        Ok(s) => println!("{}", s),
        Err(e) => anyhow::bail!("Failed to serialize config: {}", e),
    }
    Ok(())
}
