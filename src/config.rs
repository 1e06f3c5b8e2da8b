use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pricing::models::{MaterialCatalog, MaterialProfile, PricingSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default = "default_materials")]
    pub materials: MaterialCatalog,
    #[serde(default)]
    pub pricing: PricingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            materials: default_materials(),
            pricing: PricingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Request body size cap for uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accepted model file extensions, lowercase with leading dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Material used when the request doesn't pick one.
    #[serde(default = "default_material_key")]
    pub default_material: String,
    #[serde(default = "default_infill_percent")]
    pub default_infill_percent: f64,
    #[serde(default = "default_layer_height_mm")]
    pub default_layer_height_mm: f64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            default_material: default_material_key(),
            default_infill_percent: default_infill_percent(),
            default_layer_height_mm: default_layer_height_mm(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    [".stl", ".obj", ".ply", ".step", ".stp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_material_key() -> String {
    "PLA".to_string()
}

fn default_infill_percent() -> f64 {
    20.0
}

fn default_layer_height_mm() -> f64 {
    0.2
}

/// Built-in material catalog.
///
/// Serves as the default for `[materials]`; a config file can extend or
/// replace it wholesale.
pub fn default_materials() -> MaterialCatalog {
    let mut materials = MaterialCatalog::new();
    materials.insert(
        "PLA".to_string(),
        MaterialProfile {
            name: "PLA (Standard)".to_string(),
            density_g_per_cm3: 1.24,
            price_per_kg: 25.0,
            print_speed_modifier: 1.0,
            support_difficulty: 1.0,
        },
    );
    materials.insert(
        "ABS".to_string(),
        MaterialProfile {
            name: "ABS (High Strength)".to_string(),
            density_g_per_cm3: 1.04,
            price_per_kg: 30.0,
            print_speed_modifier: 0.9,
            support_difficulty: 1.2,
        },
    );
    materials.insert(
        "PETG".to_string(),
        MaterialProfile {
            name: "PETG (Chemical Resistant)".to_string(),
            density_g_per_cm3: 1.27,
            price_per_kg: 35.0,
            print_speed_modifier: 0.8,
            support_difficulty: 1.1,
        },
    );
    materials.insert(
        "TPU".to_string(),
        MaterialProfile {
            name: "TPU (Flexible)".to_string(),
            density_g_per_cm3: 1.2,
            price_per_kg: 45.0,
            print_speed_modifier: 0.5,
            support_difficulty: 1.5,
        },
    );
    materials
}

/// Load configuration from an optional TOML file plus environment
/// overrides (`PRICER__SERVER__PORT=9000` style), then validate it.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("PRICER").separator("__"))
        .build()?;

    let cfg: Config = settings.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.materials.is_empty() {
        anyhow::bail!("At least one material must be configured");
    }

    for (key, profile) in &cfg.materials {
        if profile.density_g_per_cm3 <= 0.0 {
            anyhow::bail!("Material '{}' has non-positive density", key);
        }
        if profile.price_per_kg <= 0.0 {
            anyhow::bail!("Material '{}' has non-positive price", key);
        }
        if profile.print_speed_modifier <= 0.0 {
            anyhow::bail!("Material '{}' has non-positive print speed modifier", key);
        }
        if profile.support_difficulty <= 0.0 {
            anyhow::bail!("Material '{}' has non-positive support difficulty", key);
        }
    }

    let pricing = &cfg.pricing;
    if pricing.base_time_per_cm3_minutes <= 0.0 {
        anyhow::bail!("Pricing base time per cm³ must be > 0");
    }
    if pricing.machine_cost_per_hour <= 0.0 {
        anyhow::bail!("Pricing machine cost per hour must be > 0");
    }
    if pricing.post_processing_base < 0.0 {
        anyhow::bail!("Pricing post-processing base cannot be negative");
    }
    if pricing.support_cost_multiplier < 0.0 {
        anyhow::bail!("Pricing support cost multiplier cannot be negative");
    }
    if pricing.margin < 0.0 {
        anyhow::bail!("Pricing margin cannot be negative");
    }
    if pricing.minimum_price < 0.0 {
        anyhow::bail!("Pricing minimum price cannot be negative");
    }

    let upload = &cfg.upload;
    if upload.max_upload_bytes == 0 {
        anyhow::bail!("Upload size limit must be > 0");
    }
    if upload.allowed_extensions.is_empty() {
        anyhow::bail!("At least one file extension must be allowed");
    }
    for ext in &upload.allowed_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            anyhow::bail!("Invalid allowed extension '{}' (expected e.g. '.stl')", ext);
        }
        if *ext != ext.to_lowercase() {
            anyhow::bail!("Allowed extension '{}' must be lowercase", ext);
        }
    }
    if !cfg.materials.contains_key(&upload.default_material) {
        anyhow::bail!(
            "Default material '{}' is not in the material catalog",
            upload.default_material
        );
    }
    if upload.default_layer_height_mm <= 0.0 {
        anyhow::bail!("Default layer height must be > 0");
    }
    if !(0.0..=100.0).contains(&upload.default_infill_percent) {
        anyhow::bail!("Default infill percent must be between 0 and 100");
    }

    Ok(())
}
