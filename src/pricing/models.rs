use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Material catalog, keyed by material key ("PLA", "ABS", ...).
///
/// BTreeMap keeps `/api/materials` output stable for clients.
pub type MaterialCatalog = BTreeMap<String, MaterialProfile>;

/// Physical and commercial properties of one printable material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// Human-readable display name.
    pub name: String,
    /// Material density in g/cm³.
    pub density_g_per_cm3: f64,
    /// Filament price in EUR/kg.
    pub price_per_kg: f64,
    /// Relative print speed; below 1.0 the material prints slower.
    pub print_speed_modifier: f64,
    /// Relative difficulty of support removal for this material.
    pub support_difficulty: f64,
}

/// Process-wide pricing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Minutes of print time per cm³ at the reference layer height.
    #[serde(default = "default_base_time")]
    pub base_time_per_cm3_minutes: f64,
    /// Machine operating cost in EUR/hour.
    #[serde(default = "default_machine_cost")]
    pub machine_cost_per_hour: f64,
    /// Flat post-processing cost in EUR.
    #[serde(default = "default_post_processing_base")]
    pub post_processing_base: f64,
    /// Extra post-processing cost as a fraction of material cost when
    /// supports are printed.
    #[serde(default = "default_support_cost_multiplier")]
    pub support_cost_multiplier: f64,
    /// Markup fraction applied to the cost subtotal.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Hard floor on the quoted total, in EUR.
    #[serde(default = "default_minimum_price")]
    pub minimum_price: f64,
}

fn default_base_time() -> f64 {
    2.0
}

fn default_machine_cost() -> f64 {
    15.0
}

fn default_post_processing_base() -> f64 {
    5.0
}

fn default_support_cost_multiplier() -> f64 {
    0.3
}

fn default_margin() -> f64 {
    0.25
}

fn default_minimum_price() -> f64 {
    5.0
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            base_time_per_cm3_minutes: default_base_time(),
            machine_cost_per_hour: default_machine_cost(),
            post_processing_base: default_post_processing_base(),
            support_cost_multiplier: default_support_cost_multiplier(),
            margin: default_margin(),
            minimum_price: default_minimum_price(),
        }
    }
}

/// Whether to print support material.
///
/// `Auto` defers to the analyzer's overhang detection; the other variants
/// are explicit caller overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportPreference {
    #[default]
    Auto,
    Include,
    Omit,
}

impl SupportPreference {
    /// Resolve against the analyzer's detection result.
    pub fn resolve(self, detected: bool) -> bool {
        match self {
            Self::Auto => detected,
            Self::Include => true,
            Self::Omit => false,
        }
    }
}

impl From<Option<bool>> for SupportPreference {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Auto,
            Some(true) => Self::Include,
            Some(false) => Self::Omit,
        }
    }
}

/// User-chosen print parameters for one quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintParameters {
    pub infill_percent: f64,
    pub layer_height_mm: f64,
    pub supports: SupportPreference,
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            infill_percent: 20.0,
            layer_height_mm: 0.2,
            supports: SupportPreference::Auto,
        }
    }
}

/// Pricing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Material usage section of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    /// Material key the quote was priced for.
    #[serde(rename = "type")]
    pub key: String,
    pub name: String,
    pub weight_g: f64,
    pub cost: f64,
}

/// Estimated print time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintTime {
    pub hours: f64,
    pub minutes: f64,
}

/// Itemized cost lines, all in EUR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub machine_time: f64,
    pub post_processing: f64,
    pub subtotal: f64,
    pub margin: f64,
    pub total: f64,
}

/// Parameters echoed back with the quote, supports resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteParameters {
    pub infill_percent: f64,
    pub layer_height_mm: f64,
    pub includes_supports: bool,
}

/// A fully computed quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub material: MaterialUsage,
    pub print_time: PrintTime,
    pub costs: CostBreakdown,
    pub parameters: QuoteParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_preference_resolution() {
        assert!(SupportPreference::Auto.resolve(true));
        assert!(!SupportPreference::Auto.resolve(false));
        assert!(SupportPreference::Include.resolve(false));
        assert!(!SupportPreference::Omit.resolve(true));
    }

    #[test]
    fn test_support_preference_from_optional_flag() {
        assert_eq!(SupportPreference::from(None), SupportPreference::Auto);
        assert_eq!(SupportPreference::from(Some(true)), SupportPreference::Include);
        assert_eq!(SupportPreference::from(Some(false)), SupportPreference::Omit);
    }

    #[test]
    fn test_quote_error_display() {
        let err = QuoteError::UnknownMaterial("NYLON".to_string());
        assert_eq!(err.to_string(), "Unknown material: NYLON");
    }

    #[test]
    fn test_material_usage_serializes_key_as_type() {
        let usage = MaterialUsage {
            key: "PLA".to_string(),
            name: "PLA (Standard)".to_string(),
            weight_g: 26.66,
            cost: 0.67,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["type"], "PLA");
        assert!(json.get("key").is_none());
    }
}
