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

//! Cheap-window classification engine
//!
//! Turns a day-ahead price series plus [`ClassificationOptions`] into a
//! per-slot activation mask and summary statistics. Stages run in a fixed
//! order: resolution normalization, peak-range restriction, window
//! selection, minimum-duration filtering, negative-price override and mask
//! assembly. Statistics are computed from the normalized series on their own.
//!
//! The engine is pure and synchronous. Everything stateful (keeping the last
//! good result, marking it stale) lives in [`snapshot`].

pub mod assembly;
pub mod clock;
pub mod duration_filter;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod peak_range;
pub mod selection;
pub mod snapshot;
pub mod stats;

pub use clock::{
    CheapWindow, cheap_windows, cheapest_slot, current_price, is_cheap_at, next_cheap_slot,
    slot_index_at, slot_start_time,
};
pub use engine::{classify, classify_prices};
pub use error::RefreshError;
pub use peak_range::{peak_slots, resolve_peak_range};
pub use selection::{SelectionStrategy, WindowSelector};
pub use snapshot::{ApiStatus, PriceSnapshot, SnapshotStore};
pub use stats::price_stats;

// Re-export the value types so callers only need one crate
pub use rce_types::{
    CheapMask, ClassificationOptions, ConfigError, DayClassification, OperationMode,
    OperationModePreset, OperationModePresets, PeakRange, PriceMode, PriceSeries, PriceStats,
    Resolution,
};
