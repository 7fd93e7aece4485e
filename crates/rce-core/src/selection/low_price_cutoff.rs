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

use super::WindowSelector;

/// Marks every slot priced at or below a nearest-rank percentile
///
/// The threshold is the value at rank `floor(len * percentile / 100)` of the
/// ascending prices (0-indexed, not interpolated). Ties with the threshold are
/// all cheap. Runs shorter than `min_run_slots` are dropped afterwards by the
/// duration filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowPriceCutoff {
    percentile: u8,
    min_run_slots: usize,
}

impl LowPriceCutoff {
    pub fn new(percentile: u8, min_run_slots: usize) -> Self {
        Self {
            percentile: percentile.min(100),
            min_run_slots,
        }
    }

    /// Price at the configured rank, `None` for an empty slice
    pub fn threshold(&self, prices: &[f64]) -> Option<f64> {
        if prices.is_empty() {
            return None;
        }

        let mut sorted = prices.to_vec();
        sorted.sort_by(f64::total_cmp);

        // Integer rank avoids float drift in len * p; 100% clamps to the maximum
        let rank = (prices.len() * usize::from(self.percentile) / 100).min(prices.len() - 1);
        sorted.get(rank).copied()
    }
}

impl WindowSelector for LowPriceCutoff {
    fn name(&self) -> &'static str {
        "Low-Price-Cutoff"
    }

    fn select(&self, prices: &[f64]) -> Vec<bool> {
        let Some(threshold) = self.threshold(prices) else {
            return Vec::new();
        };

        tracing::debug!(
            "Low price cutoff: P{} threshold {:.2} over {} slots",
            self.percentile,
            threshold,
            prices.len()
        );

        prices.iter().map(|&price| price <= threshold).collect()
    }

    fn min_run_slots(&self) -> Option<usize> {
        Some(self.min_run_slots)
    }
}
