/// Integration tests for the estimator -> pricer pipeline
use print_pricer::analysis::{HeuristicEstimator, ShapeEstimator};
use print_pricer::config::default_materials;
use print_pricer::pricing::models::{
    PricingSettings, PrintParameters, QuoteError, SupportPreference,
};
use print_pricer::pricing::QuoteCalculator;

#[test]
fn test_volume_floor_holds_across_sizes() {
    for byte_size in [0u64, 1, 499, 500, 5_000, 99_999, 100_000, 10_000_000] {
        let analysis = HeuristicEstimator.estimate(byte_size);
        assert!(
            analysis.volume_cm3 >= 1.0,
            "volume {} below floor for {} bytes",
            analysis.volume_cm3,
            byte_size
        );
    }
}

#[test]
fn test_complexity_bounds_and_support_detection() {
    for byte_size in [0u64, 200_000, 300_000, 310_000, 999_999, 1_000_000, u32::MAX as u64] {
        let analysis = HeuristicEstimator.estimate(byte_size);
        assert!((0.0..=1.0).contains(&analysis.complexity_factor));
        assert_eq!(
            analysis.needs_supports,
            analysis.complexity_factor > 0.3,
            "support detection mismatch at {} bytes",
            byte_size
        );
    }
}

#[test]
fn test_every_catalog_material_prices_above_minimum() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);

    for byte_size in [0u64, 10_000, 500_000, 3_000_000] {
        let analysis = HeuristicEstimator.estimate(byte_size);
        for key in materials.keys() {
            let quote = calculator
                .quote(&analysis, key, &PrintParameters::default())
                .unwrap();
            assert!(
                quote.costs.total >= pricing.minimum_price,
                "total below minimum for {} at {} bytes",
                key,
                byte_size
            );
        }
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);

    let run = || {
        let analysis = HeuristicEstimator.estimate(744_321);
        calculator
            .quote(&analysis, "ABS", &PrintParameters::default())
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);

    // Byte-identical over the wire as well.
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_material_cost_never_decreases_with_infill() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);
    let analysis = HeuristicEstimator.estimate(650_000);

    let mut last = f64::MIN;
    for step in 0..=20 {
        let infill = step as f64 * 5.0;
        let quote = calculator
            .quote(
                &analysis,
                "PETG",
                &PrintParameters {
                    infill_percent: infill,
                    ..PrintParameters::default()
                },
            )
            .unwrap();
        assert!(
            quote.costs.material >= last,
            "material cost decreased between {}% and the previous step",
            infill
        );
        last = quote.costs.material;
    }
}

#[test]
fn test_unknown_material_yields_no_quote() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);
    let analysis = HeuristicEstimator.estimate(500_000);

    let result = calculator.quote(&analysis, "NYLON", &PrintParameters::default());
    assert_eq!(
        result.unwrap_err(),
        QuoteError::UnknownMaterial("NYLON".to_string())
    );
}

#[test]
fn test_half_megabyte_end_to_end() {
    let analysis = HeuristicEstimator.estimate(500_000);
    assert_eq!(analysis.volume_cm3, 50.0);
    assert_eq!(analysis.surface_area_cm2, 300.0);
    assert_eq!(analysis.complexity_factor, 0.5);
    assert!(analysis.needs_supports);

    let materials = default_materials();
    let pricing = PricingSettings::default();
    let quote = QuoteCalculator::new(&materials, &pricing)
        .quote(&analysis, "PLA", &PrintParameters::default())
        .unwrap();

    // Supports auto-resolve to the detected value.
    assert!(quote.parameters.includes_supports);

    // Full itemized chain: 28% effective infill + 15% support volume on
    // 50 cm³ of PLA, 162.5 minutes of machine time, 25% margin.
    assert_eq!(quote.material.weight_g, 26.66);
    assert_eq!(quote.costs.material, 0.67);
    assert_eq!(quote.costs.machine_time, 40.63);
    assert_eq!(quote.costs.post_processing, 5.2);
    assert_eq!(quote.costs.subtotal, 46.49);
    assert_eq!(quote.costs.margin, 11.62);
    assert_eq!(quote.costs.total, 58.11);
    assert!(quote.costs.total >= pricing.minimum_price);
}

#[test]
fn test_halving_layer_height_increases_time() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);
    let analysis = HeuristicEstimator.estimate(500_000);

    let mut layer_height = 0.4;
    let mut last_minutes = 0.0;
    while layer_height > 0.04 {
        let quote = calculator
            .quote(
                &analysis,
                "PLA",
                &PrintParameters {
                    layer_height_mm: layer_height,
                    ..PrintParameters::default()
                },
            )
            .unwrap();
        assert!(
            quote.print_time.minutes > last_minutes,
            "print time did not increase at layer height {}",
            layer_height
        );
        last_minutes = quote.print_time.minutes;
        layer_height /= 2.0;
    }
}

#[test]
fn test_support_toggle_strictly_increases_costs() {
    let materials = default_materials();
    let pricing = PricingSettings::default();
    let calculator = QuoteCalculator::new(&materials, &pricing);
    let analysis = HeuristicEstimator.estimate(500_000);

    let on = calculator
        .quote(
            &analysis,
            "PLA",
            &PrintParameters {
                supports: SupportPreference::Include,
                ..PrintParameters::default()
            },
        )
        .unwrap();
    let off = calculator
        .quote(
            &analysis,
            "PLA",
            &PrintParameters {
                supports: SupportPreference::Omit,
                ..PrintParameters::default()
            },
        )
        .unwrap();

    assert!(on.costs.material > off.costs.material);
    assert!(on.costs.post_processing > off.costs.post_processing);
    assert!(on.costs.total > off.costs.total);
}
