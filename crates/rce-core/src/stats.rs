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

//! Summary statistics of a price series

use rce_types::PriceStats;

/// Round to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average, min, max and median over all prices, each rounded to 2 decimals
///
/// An empty series reports every field as unavailable.
pub fn price_stats(prices: &[f64]) -> PriceStats {
    if prices.is_empty() {
        return PriceStats::unavailable();
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let len = sorted.len();
    let average = sorted.iter().sum::<f64>() / len as f64;
    let median = if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    };

    PriceStats {
        average: Some(round2(average)),
        min: sorted.first().copied().map(round2),
        max: sorted.last().copied().map(round2),
        median: Some(round2(median)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_is_unavailable() {
        assert_eq!(price_stats(&[]), PriceStats::unavailable());
    }

    #[test]
    fn test_odd_length() {
        let stats = price_stats(&[30.0, 10.0, 20.0]);
        assert_eq!(stats.average, Some(20.0));
        assert_eq!(stats.min, Some(10.0));
        assert_eq!(stats.max, Some(30.0));
        assert_eq!(stats.median, Some(20.0));
    }

    #[test]
    fn test_even_length_median_averages_middle_pair() {
        let stats = price_stats(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(stats.median, Some(25.0));
        assert_eq!(stats.average, Some(25.0));
    }

    #[test]
    fn test_values_are_rounded() {
        let stats = price_stats(&[1.0, 2.0, 2.0]);
        // 5 / 3 = 1.666...
        assert_eq!(stats.average, Some(1.67));
        let stats = price_stats(&[-12.346, 400.129]);
        assert_eq!(stats.min, Some(-12.35));
        assert_eq!(stats.max, Some(400.13));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-0.5), -0.5);
        assert_eq!(round2(99.999), 100.0);
    }
}
