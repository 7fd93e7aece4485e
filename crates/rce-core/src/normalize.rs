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

//! Hourly aggregation over the 15-minute grid

use crate::stats::round2;
use rce_types::pricing::{QUARTER_HOUR_SLOTS_PER_DAY, QUARTER_HOUR_SLOTS_PER_HOUR};
use rce_types::{PriceSeries, Resolution};
use tracing::debug;

/// Rewrite a quarter-hour series as piecewise-constant hourly averages
///
/// With [`Resolution::Hourly`] and a regular 96-slot day, each block of four
/// slots is replaced by its mean (rounded to 2 decimals) repeated four times,
/// so the series keeps its length and grid. Any other length, grid or
/// resolution passes through unchanged.
pub fn normalize_resolution(series: &PriceSeries, resolution: Resolution) -> PriceSeries {
    if resolution != Resolution::Hourly {
        return series.clone();
    }

    if series.slots_per_hour() != QUARTER_HOUR_SLOTS_PER_HOUR
        || series.len() != QUARTER_HOUR_SLOTS_PER_DAY
    {
        debug!(
            "Skipping hourly aggregation: {} slots at {} per hour",
            series.len(),
            series.slots_per_hour()
        );
        return series.clone();
    }

    let prices = series
        .prices()
        .chunks(QUARTER_HOUR_SLOTS_PER_HOUR)
        .flat_map(|block| {
            let mean = round2(block.iter().sum::<f64>() / block.len() as f64);
            std::iter::repeat_n(mean, block.len())
        })
        .collect();

    PriceSeries::with_slots_per_hour(prices, series.slots_per_hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_hour_day() -> PriceSeries {
        PriceSeries::quarter_hourly((0..96).map(f64::from).collect())
    }

    #[test]
    fn test_fifteen_minute_is_passthrough() {
        let series = quarter_hour_day();
        assert_eq!(normalize_resolution(&series, Resolution::FifteenMinute), series);
    }

    #[test]
    fn test_hourly_averages_blocks_of_four() {
        let normalized = normalize_resolution(&quarter_hour_day(), Resolution::Hourly);
        assert_eq!(normalized.len(), 96);
        assert_eq!(normalized.slots_per_hour(), 4);
        // First hour: mean(0, 1, 2, 3) = 1.5
        assert_eq!(&normalized.prices()[..4], &[1.5, 1.5, 1.5, 1.5]);
        // Last hour: mean(92, 93, 94, 95) = 93.5
        assert_eq!(&normalized.prices()[92..], &[93.5, 93.5, 93.5, 93.5]);
    }

    #[test]
    fn test_hourly_mean_is_rounded() {
        let mut prices = vec![0.0; 96];
        prices[..4].copy_from_slice(&[1.0, 1.0, 1.0, 1.01]);
        let normalized =
            normalize_resolution(&PriceSeries::quarter_hourly(prices), Resolution::Hourly);
        // 4.01 / 4 = 1.0025 -> 1.0
        assert_eq!(normalized.prices()[0], 1.0);
    }

    #[test]
    fn test_non_canonical_length_is_passthrough() {
        let series = PriceSeries::quarter_hourly(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(normalize_resolution(&series, Resolution::Hourly), series);

        let dst_day = PriceSeries::quarter_hourly(vec![3.0; 92]);
        assert_eq!(normalize_resolution(&dst_day, Resolution::Hourly), dst_day);
    }

    #[test]
    fn test_hourly_grid_is_passthrough() {
        let series = PriceSeries::hourly(vec![5.0; 96]);
        assert_eq!(normalize_resolution(&series, Resolution::Hourly), series);
    }
}
