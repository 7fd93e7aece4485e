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

//! Negative-price override and full-length mask assembly

use rce_types::CheapMask;

/// Slots of the full series priced below zero
pub fn negative_price_slots(prices: &[f64]) -> Vec<bool> {
    prices.iter().map(|&price| price < 0.0).collect()
}

/// Lay `sub_mask` over an all-false mask of `len` slots starting at `offset`,
/// then OR in `overrides`
///
/// Overrides cover the whole series, so they apply outside the peak range and
/// regardless of any minimum-duration filtering already done on `sub_mask`.
pub fn assemble_mask(
    len: usize,
    offset: usize,
    sub_mask: &[bool],
    overrides: Option<&[bool]>,
) -> CheapMask {
    let mut full = vec![false; len];

    for (i, &cheap) in sub_mask.iter().enumerate() {
        if let Some(slot) = full.get_mut(offset + i) {
            *slot = cheap;
        }
    }

    if let Some(overrides) = overrides {
        for (slot, &forced) in full.iter_mut().zip(overrides) {
            *slot |= forced;
        }
    }

    CheapMask::new(full)
}
