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

//! Wall-clock queries over a classified day
//!
//! Maps times of day to slot indices on the day's grid and back, and exposes
//! the questions automations ask: is it cheap now, when does the next cheap
//! slot start, which slot is cheapest, and which windows are cheap.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike};
use rce_types::DayClassification;
use serde::{Deserialize, Serialize};

/// Slot grids are clamped to divisors of an hour between 1 and 60 slots
fn slot_minutes(slots_per_hour: usize) -> usize {
    60 / slots_per_hour.clamp(1, 60)
}

/// Index of the slot containing `time`
pub fn slot_index_at(time: NaiveTime, slots_per_hour: usize) -> usize {
    let minutes = slot_minutes(slots_per_hour);
    let per_hour = 60 / minutes;
    time.hour() as usize * per_hour + time.minute() as usize / minutes
}

/// Start time of slot `index`, `None` past midnight
pub fn slot_start_time(index: usize, slots_per_hour: usize) -> Option<NaiveTime> {
    let seconds = index.checked_mul(slot_minutes(slots_per_hour) * 60)?;
    NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(seconds).ok()?, 0)
}

/// Whether the slot containing `time` is cheap
///
/// `None` when the day has no mask yet; a time past the end of the mask is
/// reported as not cheap.
pub fn is_cheap_at(day: &DayClassification, time: NaiveTime) -> Option<bool> {
    if day.mask.is_empty() {
        return None;
    }
    let index = slot_index_at(time, day.slots_per_hour);
    Some(day.mask.get(index).unwrap_or(false))
}

/// Price of the slot containing `time`
pub fn current_price(day: &DayClassification, time: NaiveTime) -> Option<f64> {
    day.prices
        .get(slot_index_at(time, day.slots_per_hour))
        .copied()
}

/// Start of the current slot if it is cheap, otherwise of the next cheap slot today
pub fn next_cheap_slot(day: &DayClassification, time: NaiveTime) -> Option<NaiveTime> {
    let current = slot_index_at(time, day.slots_per_hour);
    let index = day
        .mask
        .as_slice()
        .iter()
        .enumerate()
        .skip(current)
        .find_map(|(i, &cheap)| cheap.then_some(i))?;
    slot_start_time(index, day.slots_per_hour)
}

/// Index and start time of the first slot with the lowest price
pub fn cheapest_slot(day: &DayClassification) -> Option<(usize, NaiveTime)> {
    let (index, _) = day
        .prices
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &price)| match best {
            Some((_, lowest)) if price >= lowest => best,
            _ if price.is_nan() => best,
            _ => Some((i, price)),
        })?;
    Some((index, slot_start_time(index, day.slots_per_hour)?))
}

/// A maximal run of cheap slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheapWindow {
    pub start_slot: usize,
    /// Exclusive
    pub end_slot: usize,
    /// Minutes after midnight
    pub start_minute: u32,
    /// Minutes after midnight, exclusive; 1440 for a window ending at midnight
    pub end_minute: u32,
}

impl CheapWindow {
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.end_minute - self.start_minute))
    }

    /// Zoned start and end of this window on `date`
    ///
    /// Offsets are added to local midnight, so on DST days the window shifts
    /// with the wall clock of the first hour.
    pub fn localize<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        tz: &Tz,
    ) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        let midnight = tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()?;
        let start = midnight.clone() + TimeDelta::minutes(i64::from(self.start_minute));
        let end = midnight + TimeDelta::minutes(i64::from(self.end_minute));
        Some((start, end))
    }
}

/// All cheap windows of the day, in order
pub fn cheap_windows(day: &DayClassification) -> Vec<CheapWindow> {
    let minutes = slot_minutes(day.slots_per_hour);
    day.mask
        .runs()
        .into_iter()
        .filter_map(|run| {
            Some(CheapWindow {
                start_slot: run.start,
                end_slot: run.end,
                start_minute: u32::try_from(run.start * minutes).ok()?,
                end_minute: u32::try_from(run.end * minutes).ok()?,
            })
        })
        .collect()
}
