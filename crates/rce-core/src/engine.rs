// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Classification pipeline

use crate::assembly::{assemble_mask, negative_price_slots};
use crate::duration_filter::filter_short_runs;
use crate::normalize::normalize_resolution;
use crate::peak_range::peak_slots;
use crate::selection::{SelectionStrategy, WindowSelector};
use crate::stats::price_stats;
use rce_types::{CheapMask, ClassificationOptions, DayClassification, PriceSeries};
use tracing::{debug, info};

/// Classify one day of prices
///
/// Never fails: an empty series yields an empty mask with unavailable
/// statistics, and every configuration edge case degrades to a defined mask
/// of the same length as the series.
pub fn classify(series: &PriceSeries, options: &ClassificationOptions) -> DayClassification {
    let normalized = normalize_resolution(series, options.resolution);
    let slots_per_hour = normalized.slots_per_hour();

    if normalized.is_empty() {
        debug!("No prices to classify");
        return DayClassification::empty(slots_per_hour);
    }

    let stats = price_stats(normalized.prices());
    let mask = build_mask(normalized.prices(), slots_per_hour, options);

    info!(
        "Classified {} slots ({} per hour) with {}: {} cheap",
        mask.len(),
        slots_per_hour,
        options.price_mode,
        mask.active_count()
    );

    DayClassification {
        prices: normalized.into_prices(),
        slots_per_hour,
        mask,
        stats,
    }
}

/// Classify raw prices, inferring the grid from their count
pub fn classify_prices(prices: Vec<f64>, options: &ClassificationOptions) -> DayClassification {
    classify(&PriceSeries::infer(prices), options)
}

fn build_mask(prices: &[f64], slots_per_hour: usize, options: &ClassificationOptions) -> CheapMask {
    let strategy = SelectionStrategy::from_options(options, slots_per_hour);

    if strategy.is_always_on() {
        return CheapMask::filled(prices.len(), true);
    }

    let window = peak_slots(prices.len(), options.peak_range, slots_per_hour);
    debug!(
        "{}: peak range {} covers slots {}..{}",
        strategy.name(),
        options.peak_range,
        window.start,
        window.end
    );

    let mut sub_mask = strategy.select(&prices[window.clone()]);
    if let Some(min_run) = strategy.min_run_slots() {
        sub_mask = filter_short_runs(&sub_mask, min_run);
    }

    let overrides = options
        .include_negative_prices
        .then(|| negative_price_slots(prices));

    assemble_mask(prices.len(), window.start, &sub_mask, overrides.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rce_types::{OperationMode, OperationModePreset, PeakRange, PriceMode, Resolution};

    fn quarter_hour_day(hourly: &[f64; 24]) -> PriceSeries {
        PriceSeries::quarter_hourly(hourly.iter().flat_map(|&p| [p; 4]).collect())
    }

    fn sample_day() -> [f64; 24] {
        [
            420.0, 400.0, 380.0, 350.0, 340.0, 360.0, 450.0, 520.0, 480.0, 300.0, 150.0, 90.0,
            60.0, 80.0, 140.0, 260.0, 410.0, 560.0, 610.0, 590.0, 520.0, 470.0, 440.0, 430.0,
        ]
    }

    #[test]
    fn test_empty_series() {
        let result = classify(&PriceSeries::quarter_hourly(Vec::new()), &Default::default());
        assert!(result.mask.is_empty());
        assert!(!result.stats.is_available());
        assert!(!result.has_data());
    }

    #[test]
    fn test_default_options_on_quarter_hour_day() {
        let result = classify(&quarter_hour_day(&sample_day()), &Default::default());
        assert_eq!(result.mask.len(), 96);

        // Comfort: P30 over 96 slots -> rank 28 -> 8th cheapest hour (340.0 at 04:00).
        // Hour 4 alone is shorter than the 2h minimum; hours 9..16 survive.
        let expected: Vec<bool> = (0..96).map(|slot| (36..64).contains(&slot)).collect();
        assert_eq!(result.mask.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_hourly_resolution_uses_averaged_prices() {
        let mut prices = vec![100.0; 96];
        // Hour 5 has one very cheap quarter, but the hourly mean stays high
        prices[20] = -40.0;
        // Hour 12 is cheap throughout
        prices[48..52].fill(10.0);

        let options = ClassificationOptions {
            resolution: Resolution::Hourly,
            price_mode: PriceMode::CheapestNotConsecutive,
            not_consecutive_count: 1,
            include_negative_prices: false,
            ..Default::default()
        };
        let result = classify(&PriceSeries::quarter_hourly(prices), &options);

        assert_eq!(result.prices[20], 65.0);
        assert_eq!(result.mask.runs(), vec![48..52]);
    }

    #[test]
    fn test_peak_range_limits_selection() {
        let options = ClassificationOptions {
            price_mode: PriceMode::CheapestNotConsecutive,
            not_consecutive_count: 2,
            peak_range: PeakRange::new(16, 24).unwrap(),
            ..Default::default()
        };
        let result = classify(&PriceSeries::hourly(sample_day().to_vec()), &options);

        // Cheapest hours overall are around noon; inside 16-24 they are 16 and 23
        let active: Vec<usize> = (0..24).filter(|&h| result.mask.as_slice()[h]).collect();
        assert_eq!(active, vec![16, 23]);
    }

    #[test]
    fn test_min_window_removes_isolated_dips() {
        let mut prices = vec![500.0; 24];
        prices[3] = 10.0;
        prices[12..15].fill(20.0);

        let mut options = ClassificationOptions {
            operation_mode: OperationMode::Eco,
            ..Default::default()
        };
        options
            .presets
            .set(OperationMode::Eco, OperationModePreset::new(15, 2).unwrap());

        // P15 over 24 -> rank 3 -> 20.0; hour 3 alone is too short
        let result = classify(&PriceSeries::hourly(prices), &options);
        assert_eq!(result.mask.runs(), vec![12..15]);
    }

    #[test]
    fn test_negative_override_can_be_disabled() {
        let options = ClassificationOptions {
            price_mode: PriceMode::CheapestConsecutive,
            consecutive_count: 1,
            peak_range: PeakRange::new(2, 4).unwrap(),
            include_negative_prices: false,
            ..Default::default()
        };
        let result = classify(&PriceSeries::hourly(vec![-5.0, 7.0, 3.0, 4.0]), &options);
        assert_eq!(result.mask.as_slice(), &[false, false, true, false]);
    }

    #[test]
    fn test_stats_follow_normalized_prices() {
        let mut prices = vec![0.0; 96];
        prices[..4].copy_from_slice(&[0.0, 0.0, 0.0, 100.0]);
        let options = ClassificationOptions {
            resolution: Resolution::Hourly,
            ..Default::default()
        };
        let result = classify(&PriceSeries::quarter_hourly(prices), &options);
        assert_eq!(result.stats.max, Some(25.0));
        assert_eq!(result.stats.min, Some(0.0));
    }

    #[test]
    fn test_classify_prices_infers_grid() {
        let result = classify_prices(vec![10.0; 96], &Default::default());
        assert_eq!(result.slots_per_hour, 4);
        let result = classify_prices(vec![10.0; 24], &Default::default());
        assert_eq!(result.slots_per_hour, 1);
    }
}
