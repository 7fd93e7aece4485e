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

/// Marks the contiguous window of `window_slots` slots with the lowest total price
///
/// Ties resolve to the earliest window. A slice shorter than the window marks
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheapestConsecutive {
    window_slots: usize,
}

impl CheapestConsecutive {
    pub fn new(window_slots: usize) -> Self {
        Self { window_slots }
    }

    /// Start index and price sum of the cheapest window
    ///
    /// Every window is summed from scratch in slot order, so windows holding
    /// the same prices produce bit-identical sums and tie exactly.
    pub fn best_window(&self, prices: &[f64]) -> Option<(usize, f64)> {
        let k = self.window_slots;
        if k == 0 || prices.len() < k {
            return None;
        }

        let mut sums = prices
            .windows(k)
            .map(|window| window.iter().sum::<f64>())
            .enumerate();
        let mut best = sums.next()?;

        for (start, sum) in sums {
            // Strict comparison keeps the first of equal windows
            if sum < best.1 {
                best = (start, sum);
            }
        }

        Some(best)
    }
}

impl WindowSelector for CheapestConsecutive {
    fn name(&self) -> &'static str {
        "Cheapest-Consecutive"
    }

    fn select(&self, prices: &[f64]) -> Vec<bool> {
        let mut mask = vec![false; prices.len()];

        match self.best_window(prices) {
            Some((start, sum)) => {
                tracing::debug!(
                    "Cheapest {}-slot window starts at slot {} (sum {:.2})",
                    self.window_slots,
                    start,
                    sum
                );
                mask[start..start + self.window_slots].fill(true);
            }
            None => tracing::debug!(
                "Window of {} slots does not fit into {} slots",
                self.window_slots,
                prices.len()
            ),
        }

        mask
    }
}
