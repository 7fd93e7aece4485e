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

//! Peak-range restriction

use rce_types::PeakRange;
use std::ops::Range;
use tracing::warn;

/// Slot indices covered by `range` on a grid with `slots_per_hour` slots per hour
///
/// Both ends are clamped to `[0, len]`. A range that starts past the end of a
/// short series yields an empty slice at `len`.
pub fn peak_slots(len: usize, range: PeakRange, slots_per_hour: usize) -> Range<usize> {
    let start = (usize::from(range.start_hour()) * slots_per_hour).min(len);
    let end = (usize::from(range.end_hour()) * slots_per_hour).min(len);
    start..end.max(start)
}

/// Parse a configured `HH-HH` range, falling back to the whole day
pub fn resolve_peak_range(text: &str) -> PeakRange {
    match text.parse::<PeakRange>() {
        Ok(range) => range,
        Err(e) => {
            warn!("{e}; classifying the whole day instead");
            PeakRange::FULL_DAY
        }
    }
}
