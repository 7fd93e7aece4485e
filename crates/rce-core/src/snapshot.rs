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

//! Published classification results
//!
//! The engine is stateless; this module holds the one piece of state a
//! refresh cycle needs: the last complete result. Readers always get a whole
//! snapshot (old or new, never half-updated), and a failed refresh keeps the
//! previous data visible while flagging it as stale.

use crate::engine::classify;
use crate::error::RefreshError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rce_types::{
    ClassificationOptions, DayClassification, OperationMode, PeakRange, PriceMode, PriceSeries,
    Resolution,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Health of the price source as seen by the last refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    #[default]
    Unknown,
    Ok,
    Error,
}

/// Complete result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub status: ApiStatus,
    pub last_successful_update: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub resolution: Resolution,
    pub price_mode: PriceMode,
    pub operation_mode: OperationMode,
    pub peak_range: PeakRange,
    pub today: DayClassification,
    /// Only present once tomorrow's prices have been published
    pub tomorrow: Option<DayClassification>,
}

impl PriceSnapshot {
    /// Snapshot before the first refresh
    pub fn empty(options: &ClassificationOptions) -> Self {
        Self {
            status: ApiStatus::Unknown,
            last_successful_update: None,
            last_error: None,
            resolution: options.resolution,
            price_mode: options.price_mode,
            operation_mode: options.operation_mode,
            peak_range: options.peak_range,
            today: DayClassification::empty(1),
            tomorrow: None,
        }
    }

    pub fn tomorrow_available(&self) -> bool {
        self.tomorrow.as_ref().is_some_and(DayClassification::has_data)
    }

    /// True until the first successful refresh and after any failed one
    ///
    /// Consumers showing the mask report this alongside it.
    pub fn is_stale(&self) -> bool {
        self.status != ApiStatus::Ok
    }
}

impl Default for PriceSnapshot {
    fn default() -> Self {
        Self::empty(&ClassificationOptions::default())
    }
}

/// Holder of the currently published snapshot
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<PriceSnapshot>>,
}

impl SnapshotStore {
    pub fn new(initial: PriceSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The latest complete snapshot
    pub fn current(&self) -> Arc<PriceSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: PriceSnapshot) -> Arc<PriceSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = Arc::clone(&snapshot);
        snapshot
    }

    /// Keep the last good data but flag it as stale
    pub fn mark_failed(&self, error: &RefreshError) {
        let mut current = self.current.write();
        let mut next = PriceSnapshot::clone(&current);
        next.status = ApiStatus::Error;
        next.last_error = Some(error.to_string());
        *current = Arc::new(next);

        warn!("Price refresh failed, keeping previous snapshot: {error}");
    }

    /// Drop tomorrow's data at the day boundary
    ///
    /// Tomorrow's prices become today's on the next refresh; until then the
    /// stale tomorrow entry must not be mistaken for the following day.
    /// Called by whatever schedules refreshes; a one-shot run never crosses
    /// midnight.
    pub fn roll_over(&self) {
        let mut current = self.current.write();
        if current.tomorrow.is_some() {
            let mut next = PriceSnapshot::clone(&current);
            next.tomorrow = None;
            *current = Arc::new(next);
        }
    }

    /// Classify freshly fetched prices and publish the result
    ///
    /// Today's prices are required; without them the previous snapshot stays
    /// published and is marked as failed. Tomorrow is classified only when
    /// it has prices.
    pub fn refresh(
        &self,
        today: &PriceSeries,
        tomorrow: Option<&PriceSeries>,
        options: &ClassificationOptions,
        now: DateTime<Utc>,
    ) -> Result<Arc<PriceSnapshot>, RefreshError> {
        if today.is_empty() {
            let error = RefreshError::NoTodayData;
            self.mark_failed(&error);
            return Err(error);
        }

        let today = classify(today, options);
        let tomorrow = tomorrow
            .filter(|series| !series.is_empty())
            .map(|series| classify(series, options));

        info!(
            "Published prices: today {} slots ({} cheap), tomorrow {}",
            today.mask.len(),
            today.mask.active_count(),
            tomorrow
                .as_ref()
                .map_or_else(|| "pending".to_owned(), |t| format!("{} slots", t.mask.len()))
        );

        Ok(self.publish(PriceSnapshot {
            status: ApiStatus::Ok,
            last_successful_update: Some(now),
            last_error: None,
            resolution: options.resolution,
            price_mode: options.price_mode,
            operation_mode: options.operation_mode,
            peak_range: options.peak_range,
            today,
            tomorrow,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_initial_snapshot_is_unknown() {
        let store = SnapshotStore::default();
        let snapshot = store.current();
        assert_eq!(snapshot.status, ApiStatus::Unknown);
        assert!(snapshot.is_stale());
        assert!(!snapshot.today.has_data());
        assert!(!snapshot.tomorrow_available());
    }

    #[test]
    fn test_refresh_publishes_today_and_tomorrow() {
        let store = SnapshotStore::default();
        let options = ClassificationOptions::default();
        let today = PriceSeries::quarter_hourly(vec![100.0; 96]);
        let tomorrow = PriceSeries::quarter_hourly(vec![50.0; 96]);

        let snapshot = store
            .refresh(&today, Some(&tomorrow), &options, now())
            .unwrap();

        assert_eq!(snapshot.status, ApiStatus::Ok);
        assert_eq!(snapshot.last_successful_update, Some(now()));
        assert_eq!(snapshot.today.mask.len(), 96);
        assert!(snapshot.tomorrow_available());
        assert!(Arc::ptr_eq(&snapshot, &store.current()));
    }

    #[test]
    fn test_empty_tomorrow_is_pending() {
        let store = SnapshotStore::default();
        let snapshot = store
            .refresh(
                &PriceSeries::hourly(vec![1.0; 24]),
                Some(&PriceSeries::hourly(Vec::new())),
                &ClassificationOptions::default(),
                now(),
            )
            .unwrap();
        assert!(snapshot.tomorrow.is_none());
    }

    #[test]
    fn test_missing_today_keeps_previous_data() {
        let store = SnapshotStore::default();
        let options = ClassificationOptions::default();
        store
            .refresh(&PriceSeries::hourly(vec![1.0; 24]), None, &options, now())
            .unwrap();

        let result = store.refresh(&PriceSeries::hourly(Vec::new()), None, &options, now());
        assert_eq!(result.unwrap_err(), RefreshError::NoTodayData);

        let snapshot = store.current();
        assert_eq!(snapshot.status, ApiStatus::Error);
        assert_eq!(snapshot.today.prices.len(), 24);
        assert_eq!(snapshot.last_successful_update, Some(now()));
        assert_eq!(snapshot.last_error.as_deref(), Some("no price data for today"));
    }

    #[test]
    fn test_source_failure_is_reported() {
        let store = SnapshotStore::default();
        store.mark_failed(&RefreshError::Source("timeout".to_owned()));
        assert_eq!(
            store.current().last_error.as_deref(),
            Some("price source failed: timeout")
        );
    }

    #[test]
    fn test_roll_over_drops_tomorrow() {
        let store = SnapshotStore::default();
        let options = ClassificationOptions::default();
        let series = PriceSeries::hourly(vec![1.0; 24]);
        store
            .refresh(&series, Some(&series), &options, now())
            .unwrap();

        store.roll_over();
        let snapshot = store.current();
        assert!(snapshot.tomorrow.is_none());
        assert_eq!(snapshot.status, ApiStatus::Ok);
    }

    #[test]
    fn test_snapshot_serializes_status() {
        let store = SnapshotStore::default();
        store.mark_failed(&RefreshError::NoTodayData);

        let json = serde_json::to_value(&*store.current()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["price_mode"], "LOW_PRICE_CUTOFF");
        assert_eq!(json["peak_range"], "00-24");
        assert!(json["tomorrow"].is_null());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = SnapshotStore::default();
        let options = ClassificationOptions::default();
        store
            .refresh(&PriceSeries::hourly(vec![1.0; 24]), None, &options, now())
            .unwrap();
        let held = store.current();

        store
            .refresh(&PriceSeries::hourly(vec![2.0; 24]), None, &options, now())
            .unwrap();

        assert_eq!(held.today.prices[0], 1.0);
        assert_eq!(store.current().today.prices[0], 2.0);
    }
}
