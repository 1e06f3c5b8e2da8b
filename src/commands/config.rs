use anyhow::Result;
use colored::Colorize;
use print_pricer::config;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration (file + environment + defaults)
/// as TOML. The configuration holds no secrets, so nothing is masked.
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Materials: {}", cfg.materials.len());
    println!(
        "  Allowed extensions: {}",
        cfg.upload.allowed_extensions.len()
    );
    println!("  Default material: {}", cfg.upload.default_material);

    info!("Configuration validation successful");
    Ok(())
}
