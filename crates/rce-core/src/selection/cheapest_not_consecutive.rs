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

/// Marks the `count_slots` individually cheapest slots
///
/// Equal prices keep their original order, so the earlier slot wins a tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheapestNotConsecutive {
    count_slots: usize,
}

impl CheapestNotConsecutive {
    pub fn new(count_slots: usize) -> Self {
        Self { count_slots }
    }
}

impl WindowSelector for CheapestNotConsecutive {
    fn name(&self) -> &'static str {
        "Cheapest-Not-Consecutive"
    }

    fn select(&self, prices: &[f64]) -> Vec<bool> {
        let mut order: Vec<usize> = (0..prices.len()).collect();
        // sort_by is stable
        order.sort_by(|&a, &b| prices[a].total_cmp(&prices[b]));

        let mut mask = vec![false; prices.len()];
        for &index in order.iter().take(self.count_slots) {
            mask[index] = true;
        }

        tracing::debug!(
            "Selected {} cheapest of {} slots",
            self.count_slots.min(prices.len()),
            prices.len()
        );

        mask
    }
}
