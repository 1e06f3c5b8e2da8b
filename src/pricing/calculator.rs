use crate::analysis::AnalysisResult;
use crate::pricing::models::{
    CostBreakdown, MaterialCatalog, MaterialUsage, PricingSettings, PrintParameters, PrintTime,
    QuoteError, QuoteParameters, QuoteResult,
};

/// Minimum material fill fraction, regardless of requested infill.
const MIN_INFILL_FRACTION: f64 = 0.10;
/// Extra material printed as supports, as a fraction of model volume.
const SUPPORT_VOLUME_FRACTION: f64 = 0.15;
/// Layer height the base time constant is calibrated for, in mm.
const REFERENCE_LAYER_HEIGHT_MM: f64 = 0.2;
/// Extra print time when supports are printed.
const SUPPORT_TIME_MULTIPLIER: f64 = 1.3;
/// How strongly model complexity stretches print time.
const COMPLEXITY_TIME_WEIGHT: f64 = 0.5;

/// Computes itemized quotes over an injected catalog and pricing settings.
///
/// Borrows the current config snapshot; construction is free and a fresh
/// calculator is built per request.
pub struct QuoteCalculator<'a> {
    materials: &'a MaterialCatalog,
    pricing: &'a PricingSettings,
}

impl<'a> QuoteCalculator<'a> {
    pub fn new(materials: &'a MaterialCatalog, pricing: &'a PricingSettings) -> Self {
        Self { materials, pricing }
    }

    /// Price a print job.
    ///
    /// Pure: identical inputs always produce an identical quote. Fails
    /// fast on an unknown material key or out-of-range parameters; no
    /// partial quote is ever returned.
    pub fn quote(
        &self,
        analysis: &AnalysisResult,
        material_key: &str,
        params: &PrintParameters,
    ) -> Result<QuoteResult, QuoteError> {
        validate_parameters(params)?;

        let profile = self
            .materials
            .get(material_key)
            .ok_or_else(|| QuoteError::UnknownMaterial(material_key.to_string()))?;

        let volume_cm3 = analysis.volume_cm3;
        let include_supports = params.supports.resolve(analysis.needs_supports);

        // Material usage: 10% minimum fill plus the requested infill,
        // plus a flat 15% of model volume when supports are printed.
        let infill_multiplier =
            MIN_INFILL_FRACTION + (params.infill_percent / 100.0) * (1.0 - MIN_INFILL_FRACTION);
        let mut effective_volume = volume_cm3 * infill_multiplier;
        if include_supports {
            effective_volume += volume_cm3 * SUPPORT_VOLUME_FRACTION;
        }

        let weight_g = effective_volume * profile.density_g_per_cm3;
        let material_cost = weight_g / 1000.0 * profile.price_per_kg;

        // Print time: thinner layers scale time up proportionally against
        // the reference layer height; complexity and supports stretch it
        // further, the material's speed modifier divides it.
        let base_time_minutes = volume_cm3 * self.pricing.base_time_per_cm3_minutes;
        let layer_modifier = REFERENCE_LAYER_HEIGHT_MM / params.layer_height_mm;
        let complexity_modifier = 1.0 + analysis.complexity_factor * COMPLEXITY_TIME_WEIGHT;
        let support_modifier = if include_supports {
            SUPPORT_TIME_MULTIPLIER
        } else {
            1.0
        };

        let total_time_minutes = base_time_minutes * layer_modifier * complexity_modifier
            * support_modifier
            / profile.print_speed_modifier;
        let total_time_hours = total_time_minutes / 60.0;

        let machine_cost = total_time_hours * self.pricing.machine_cost_per_hour;

        let mut post_processing = self.pricing.post_processing_base;
        if include_supports {
            post_processing += material_cost * self.pricing.support_cost_multiplier;
        }

        let subtotal = material_cost + machine_cost + post_processing;
        let margin_amount = subtotal * self.pricing.margin;

        // The floor is applied after margin, so a floored total no longer
        // literally reflects the margin fraction.
        let total_price = (subtotal + margin_amount).max(self.pricing.minimum_price);

        Ok(QuoteResult {
            material: MaterialUsage {
                key: material_key.to_string(),
                name: profile.name.clone(),
                weight_g: round_to(weight_g, 2),
                cost: round_to(material_cost, 2),
            },
            print_time: PrintTime {
                hours: round_to(total_time_hours, 2),
                minutes: total_time_minutes.round(),
            },
            costs: CostBreakdown {
                material: round_to(material_cost, 2),
                machine_time: round_to(machine_cost, 2),
                post_processing: round_to(post_processing, 2),
                subtotal: round_to(subtotal, 2),
                margin: round_to(margin_amount, 2),
                total: round_to(total_price, 2),
            },
            parameters: QuoteParameters {
                infill_percent: params.infill_percent,
                layer_height_mm: params.layer_height_mm,
                includes_supports: include_supports,
            },
        })
    }
}

fn validate_parameters(params: &PrintParameters) -> Result<(), QuoteError> {
    if !(params.layer_height_mm > 0.0) || !params.layer_height_mm.is_finite() {
        return Err(QuoteError::InvalidParameter(
            "layer_height_mm must be > 0".to_string(),
        ));
    }
    if !params.infill_percent.is_finite()
        || params.infill_percent < 0.0
        || params.infill_percent > 100.0
    {
        return Err(QuoteError::InvalidParameter(
            "infill_percent must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
