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

//! Window selection strategies
//!
//! One implementation per [`PriceMode`]. The strategy is chosen once per
//! classification from the options and then applied to the peak-range slice.

mod cheapest_consecutive;
mod cheapest_not_consecutive;
mod low_price_cutoff;

pub use cheapest_consecutive::CheapestConsecutive;
pub use cheapest_not_consecutive::CheapestNotConsecutive;
pub use low_price_cutoff::LowPriceCutoff;

use rce_types::{ClassificationOptions, PriceMode, Resolution};

/// Picks cheap slots out of a price slice
pub trait WindowSelector {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Candidate mask for `prices`, always `prices.len()` long
    fn select(&self, prices: &[f64]) -> Vec<bool>;

    /// Shortest run of cheap slots kept after selection, if the strategy filters runs
    fn min_run_slots(&self) -> Option<usize> {
        None
    }
}

/// Closed set of strategies, one variant per price mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    AlwaysOn,
    LowPriceCutoff(LowPriceCutoff),
    CheapestConsecutive(CheapestConsecutive),
    CheapestNotConsecutive(CheapestNotConsecutive),
}

impl SelectionStrategy {
    /// Build the strategy for `options` on a grid with `slots_per_hour` slots per hour
    ///
    /// Minimum windows are configured in hours and always scale with the grid.
    /// Slot counts scale only when hourly resolution is configured; at 15-minute
    /// resolution they are already expressed in slots.
    pub fn from_options(options: &ClassificationOptions, slots_per_hour: usize) -> Self {
        let count_factor = match options.resolution {
            Resolution::Hourly => slots_per_hour,
            Resolution::FifteenMinute => 1,
        };

        match options.price_mode {
            PriceMode::AlwaysOn => Self::AlwaysOn,
            PriceMode::LowPriceCutoff => {
                let preset = options.active_preset();
                Self::LowPriceCutoff(LowPriceCutoff::new(
                    preset.percentile(),
                    usize::from(preset.min_window_hours()) * slots_per_hour,
                ))
            }
            PriceMode::CheapestConsecutive => Self::CheapestConsecutive(
                CheapestConsecutive::new(options.consecutive_count * count_factor),
            ),
            PriceMode::CheapestNotConsecutive => Self::CheapestNotConsecutive(
                CheapestNotConsecutive::new(options.not_consecutive_count * count_factor),
            ),
        }
    }

    pub fn is_always_on(&self) -> bool {
        matches!(self, Self::AlwaysOn)
    }
}

impl WindowSelector for SelectionStrategy {
    fn name(&self) -> &'static str {
        match self {
            Self::AlwaysOn => "Always-On",
            Self::LowPriceCutoff(s) => s.name(),
            Self::CheapestConsecutive(s) => s.name(),
            Self::CheapestNotConsecutive(s) => s.name(),
        }
    }

    fn select(&self, prices: &[f64]) -> Vec<bool> {
        match self {
            Self::AlwaysOn => vec![true; prices.len()],
            Self::LowPriceCutoff(s) => s.select(prices),
            Self::CheapestConsecutive(s) => s.select(prices),
            Self::CheapestNotConsecutive(s) => s.select(prices),
        }
    }

    fn min_run_slots(&self) -> Option<usize> {
        match self {
            Self::LowPriceCutoff(s) => s.min_run_slots(),
            Self::AlwaysOn | Self::CheapestConsecutive(_) | Self::CheapestNotConsecutive(_) => {
                None
            }
        }
    }
}
