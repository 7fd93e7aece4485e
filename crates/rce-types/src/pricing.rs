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

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Slots per hour on the native market grid
pub const QUARTER_HOUR_SLOTS_PER_HOUR: usize = 4;

/// Slot count of a regular day on the 15-minute grid
pub const QUARTER_HOUR_SLOTS_PER_DAY: usize = 24 * QUARTER_HOUR_SLOTS_PER_HOUR;

/// Day-ahead prices for one delivery day (PLN/MWh)
///
/// The slots-per-hour factor travels with the prices so every stage can
/// translate hours into indices without guessing from the length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    prices: Vec<f64>,
    slots_per_hour: usize,
}

impl PriceSeries {
    /// Prices on the native 15-minute grid (96 slots on a regular day)
    pub fn quarter_hourly(prices: Vec<f64>) -> Self {
        Self::with_slots_per_hour(prices, QUARTER_HOUR_SLOTS_PER_HOUR)
    }

    /// Prices already aggregated to one value per hour
    pub fn hourly(prices: Vec<f64>) -> Self {
        Self::with_slots_per_hour(prices, 1)
    }

    /// Prices on an arbitrary grid; a zero factor is treated as hourly
    pub fn with_slots_per_hour(prices: Vec<f64>, slots_per_hour: usize) -> Self {
        Self {
            prices,
            slots_per_hour: slots_per_hour.max(1),
        }
    }

    /// Guess the grid from the slot count
    ///
    /// Anything longer than a 25-hour day and divisible by four is taken as
    /// quarter-hourly (92/96/100 slots cover DST days). Everything else is
    /// treated as already aggregated.
    pub fn infer(prices: Vec<f64>) -> Self {
        let len = prices.len();
        if len > 25 && len % QUARTER_HOUR_SLOTS_PER_HOUR == 0 {
            Self::quarter_hourly(prices)
        } else {
            Self::hourly(prices)
        }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn into_prices(self) -> Vec<f64> {
        self.prices
    }

    pub fn slots_per_hour(&self) -> usize {
        self.slots_per_hour
    }

    /// Slot duration in minutes
    pub fn slot_minutes(&self) -> usize {
        60 / self.slots_per_hour
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Per-slot "is cheap" flags, always as long as the classified series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheapMask(Vec<bool>);

impl CheapMask {
    pub fn new(slots: Vec<bool>) -> Self {
        Self(slots)
    }

    /// Mask of `len` slots all set to `value`
    pub fn filled(len: usize, value: bool) -> Self {
        Self(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Number of slots marked cheap
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|&&cheap| cheap).count()
    }

    /// Maximal runs of cheap slots as half-open index ranges
    pub fn runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut start = None;

        for (i, &cheap) in self.0.iter().chain(std::iter::once(&false)).enumerate() {
            match (cheap, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }

        runs
    }
}

impl From<Vec<bool>> for CheapMask {
    fn from(slots: Vec<bool>) -> Self {
        Self(slots)
    }
}

/// Summary statistics of a price series
///
/// `None` means "unavailable" (no prices), never a real zero price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

impl PriceStats {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.average.is_some()
    }
}

/// Classification result for one delivery day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClassification {
    /// Prices after resolution normalization
    pub prices: Vec<f64>,
    pub slots_per_hour: usize,
    pub mask: CheapMask,
    pub stats: PriceStats,
}

impl DayClassification {
    /// Result for a day without prices
    pub fn empty(slots_per_hour: usize) -> Self {
        Self {
            prices: Vec::new(),
            slots_per_hour: slots_per_hour.max(1),
            mask: CheapMask::default(),
            stats: PriceStats::unavailable(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.prices.is_empty()
    }
}
