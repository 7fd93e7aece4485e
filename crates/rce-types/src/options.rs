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

//! Classification options
//!
//! Every option the classification engine understands, parsed from the
//! identifiers used in configuration files and by the original Home Assistant
//! options flow. Parsing happens once at load time; the engine only ever sees
//! validated values.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Resolution
// ============================================================================

/// Slot duration used for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    /// Native 15-minute market slots
    #[default]
    FifteenMinute,
    /// Hourly averages laid over the 15-minute grid
    Hourly,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FifteenMinute => "15m",
            Self::Hourly => "1h",
        }
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "15m" | "15min" | "15" => Ok(Self::FifteenMinute),
            "1h" | "60m" | "60min" | "60" => Ok(Self::Hourly),
            other => Err(ConfigError::UnknownResolution(other.to_owned())),
        }
    }
}

// ============================================================================
// Price mode
// ============================================================================

/// Strategy used to pick cheap slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceMode {
    /// Every slot at or below a percentile threshold, kept only in long enough runs
    #[default]
    LowPriceCutoff,
    /// The single contiguous window with the lowest total price
    CheapestConsecutive,
    /// The k individually cheapest slots, wherever they are
    CheapestNotConsecutive,
    /// Every slot is active
    AlwaysOn,
}

impl PriceMode {
    pub const ALL: [Self; 4] = [
        Self::LowPriceCutoff,
        Self::CheapestConsecutive,
        Self::CheapestNotConsecutive,
        Self::AlwaysOn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowPriceCutoff => "LOW_PRICE_CUTOFF",
            Self::CheapestConsecutive => "CHEAPEST_CONSECUTIVE_RANGES",
            Self::CheapestNotConsecutive => "CHEAPEST_NOT_CONSECUTIVE",
            Self::AlwaysOn => "ALWAYS_ON",
        }
    }
}

impl FromStr for PriceMode {
    type Err = ConfigError;

    /// Accepts both the canonical identifiers (`CHEAPEST_NOT_CONSECUTIVE`) and
    /// the legacy display labels (`CHEAPEST RANGES (NOT CONSECUTIVE)`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "LOW PRICE CUTOFF" => Ok(Self::LowPriceCutoff),
            "CHEAPEST CONSECUTIVE RANGES" | "CHEAPEST CONSECUTIVE" => {
                Ok(Self::CheapestConsecutive)
            }
            "CHEAPEST NOT CONSECUTIVE" | "CHEAPEST RANGES (NOT CONSECUTIVE)" => {
                Ok(Self::CheapestNotConsecutive)
            }
            "ALWAYS ON" => Ok(Self::AlwaysOn),
            _ => Err(ConfigError::UnknownPriceMode(s.trim().to_owned())),
        }
    }
}

// ============================================================================
// Operation mode presets
// ============================================================================

/// Named preset selecting the percentile/minimum-window pair for LowPriceCutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperationMode {
    SuperEco,
    Eco,
    #[default]
    Comfort,
    Aggressive,
}

impl OperationMode {
    pub const ALL: [Self; 4] = [Self::SuperEco, Self::Eco, Self::Comfort, Self::Aggressive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperEco => "super_eco",
            Self::Eco => "eco",
            Self::Comfort => "comfort",
            Self::Aggressive => "aggressive",
        }
    }
}

impl FromStr for OperationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "super_eco" => Ok(Self::SuperEco),
            "eco" => Ok(Self::Eco),
            "comfort" => Ok(Self::Comfort),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(ConfigError::UnknownOperationMode(s.trim().to_owned())),
        }
    }
}

/// Percentile cutoff and minimum run length bound to one operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PresetRecord")]
pub struct OperationModePreset {
    percentile: u8,
    #[serde(rename = "min_window")]
    min_window_hours: u8,
}

#[derive(Deserialize)]
struct PresetRecord {
    percentile: u32,
    min_window: u32,
}

impl TryFrom<PresetRecord> for OperationModePreset {
    type Error = ConfigError;

    fn try_from(record: PresetRecord) -> Result<Self> {
        Self::new(record.percentile, record.min_window)
    }
}

impl OperationModePreset {
    /// Create a validated preset
    ///
    /// # Arguments
    /// * `percentile` - Share of slots considered cheap, 1-100
    /// * `min_window_hours` - Shortest run of cheap slots that is kept, 1-24 hours
    pub fn new(percentile: u32, min_window_hours: u32) -> Result<Self> {
        let percentile_u8 = u8::try_from(percentile)
            .ok()
            .filter(|p| (1..=100).contains(p))
            .ok_or(ConfigError::PercentileOutOfRange(percentile))?;
        let min_window_u8 = u8::try_from(min_window_hours)
            .ok()
            .filter(|w| (1..=24).contains(w))
            .ok_or(ConfigError::MinWindowOutOfRange(min_window_hours))?;

        Ok(Self {
            percentile: percentile_u8,
            min_window_hours: min_window_u8,
        })
    }

    pub fn percentile(&self) -> u8 {
        self.percentile
    }

    pub fn min_window_hours(&self) -> u8 {
        self.min_window_hours
    }
}

/// Explicit preset table, one record per operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationModePresets {
    pub super_eco: OperationModePreset,
    pub eco: OperationModePreset,
    pub comfort: OperationModePreset,
    pub aggressive: OperationModePreset,
}

impl OperationModePresets {
    pub fn get(&self, mode: OperationMode) -> OperationModePreset {
        match mode {
            OperationMode::SuperEco => self.super_eco,
            OperationMode::Eco => self.eco,
            OperationMode::Comfort => self.comfort,
            OperationMode::Aggressive => self.aggressive,
        }
    }

    pub fn set(&mut self, mode: OperationMode, preset: OperationModePreset) {
        match mode {
            OperationMode::SuperEco => self.super_eco = preset,
            OperationMode::Eco => self.eco = preset,
            OperationMode::Comfort => self.comfort = preset,
            OperationMode::Aggressive => self.aggressive = preset,
        }
    }
}

impl Default for OperationModePresets {
    fn default() -> Self {
        // Literal presets are all within the validated ranges
        Self {
            super_eco: OperationModePreset {
                percentile: 10,
                min_window_hours: 1,
            },
            eco: OperationModePreset {
                percentile: 20,
                min_window_hours: 2,
            },
            comfort: OperationModePreset {
                percentile: 30,
                min_window_hours: 2,
            },
            aggressive: OperationModePreset {
                percentile: 50,
                min_window_hours: 1,
            },
        }
    }
}

// ============================================================================
// Peak range
// ============================================================================

/// Hour-of-day interval `[start_hour, end_hour)` eligible for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeakRange {
    start_hour: u8,
    end_hour: u8,
}

impl PeakRange {
    pub const FULL_DAY: Self = Self {
        start_hour: 0,
        end_hour: 24,
    };

    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(ConfigError::InvalidPeakRange(format!(
                "{start_hour:02}-{end_hour:02}"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }
}

impl Default for PeakRange {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

impl FromStr for PeakRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConfigError::InvalidPeakRange(s.to_owned());

        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let parse_hour = |part: &str| -> Result<u8> {
            let part = part.trim();
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u8>().map_err(|_| invalid())
        };

        let start_hour = parse_hour(start)?;
        let end_hour = parse_hour(end)?;
        Self::new(start_hour, end_hour).map_err(|_| invalid())
    }
}

// ============================================================================
// Options
// ============================================================================

/// Everything the engine needs besides the price series itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOptions {
    pub resolution: Resolution,
    pub price_mode: PriceMode,
    pub operation_mode: OperationMode,
    pub presets: OperationModePresets,
    pub peak_range: PeakRange,
    pub include_negative_prices: bool,
    /// Length of the cheapest consecutive window (hours when hourly, slots otherwise)
    pub consecutive_count: usize,
    /// Number of individually cheapest slots (hours when hourly, slots otherwise)
    pub not_consecutive_count: usize,
}

impl ClassificationOptions {
    /// Preset of the currently selected operation mode
    pub fn active_preset(&self) -> OperationModePreset {
        self.presets.get(self.operation_mode)
    }
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            price_mode: PriceMode::default(),
            operation_mode: OperationMode::default(),
            presets: OperationModePresets::default(),
            peak_range: PeakRange::default(),
            include_negative_prices: true,
            consecutive_count: 4,
            not_consecutive_count: 4,
        }
    }
}

// ============================================================================
// String conversions shared by serde
// ============================================================================

macro_rules! string_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ConfigError;

                fn try_from(value: String) -> Result<Self> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.to_string()
                }
            }
        )*
    };
}

string_conversions!(Resolution, PriceMode, OperationMode, PeakRange);

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PriceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PeakRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start_hour, self.end_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parsing() {
        assert_eq!("15m".parse::<Resolution>(), Ok(Resolution::FifteenMinute));
        assert_eq!(" 1H ".parse::<Resolution>(), Ok(Resolution::Hourly));
        assert!("30m".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_price_mode_accepts_legacy_labels() {
        assert_eq!(
            "LOW PRICE CUTOFF".parse::<PriceMode>(),
            Ok(PriceMode::LowPriceCutoff)
        );
        assert_eq!(
            "CHEAPEST RANGES (NOT CONSECUTIVE)".parse::<PriceMode>(),
            Ok(PriceMode::CheapestNotConsecutive)
        );
        assert_eq!(
            "CHEAPEST CONSECUTIVE RANGES".parse::<PriceMode>(),
            Ok(PriceMode::CheapestConsecutive)
        );
        assert_eq!("ALWAYS ON".parse::<PriceMode>(), Ok(PriceMode::AlwaysOn));
    }

    #[test]
    fn test_price_mode_canonical_roundtrip() {
        for mode in PriceMode::ALL {
            assert_eq!(mode.as_str().parse::<PriceMode>(), Ok(mode));
        }
        assert_eq!(
            "cheapest".parse::<PriceMode>(),
            Err(ConfigError::UnknownPriceMode("cheapest".to_owned()))
        );
    }

    #[test]
    fn test_operation_mode_parsing() {
        assert_eq!("super_eco".parse::<OperationMode>(), Ok(OperationMode::SuperEco));
        assert_eq!("Super-Eco".parse::<OperationMode>(), Ok(OperationMode::SuperEco));
        assert_eq!("AGGRESSIVE".parse::<OperationMode>(), Ok(OperationMode::Aggressive));
        assert!("turbo".parse::<OperationMode>().is_err());
    }

    #[test]
    fn test_preset_validation() {
        assert!(OperationModePreset::new(30, 2).is_ok());
        assert!(OperationModePreset::new(100, 24).is_ok());
        assert_eq!(
            OperationModePreset::new(0, 2),
            Err(ConfigError::PercentileOutOfRange(0))
        );
        assert_eq!(
            OperationModePreset::new(101, 2),
            Err(ConfigError::PercentileOutOfRange(101))
        );
        assert_eq!(
            OperationModePreset::new(30, 25),
            Err(ConfigError::MinWindowOutOfRange(25))
        );
        assert_eq!(
            OperationModePreset::new(30, 0),
            Err(ConfigError::MinWindowOutOfRange(0))
        );
    }

    #[test]
    fn test_default_comfort_preset() {
        let options = ClassificationOptions::default();
        let preset = options.active_preset();
        assert_eq!(options.operation_mode, OperationMode::Comfort);
        assert_eq!(preset.percentile(), 30);
        assert_eq!(preset.min_window_hours(), 2);
    }

    #[test]
    fn test_presets_set_and_get() {
        let mut presets = OperationModePresets::default();
        let custom = OperationModePreset::new(42, 3).unwrap();
        presets.set(OperationMode::Eco, custom);
        assert_eq!(presets.get(OperationMode::Eco), custom);
        assert_ne!(presets.get(OperationMode::Comfort), custom);
    }

    #[test]
    fn test_peak_range_parsing() {
        assert_eq!("00-24".parse::<PeakRange>(), Ok(PeakRange::FULL_DAY));
        let range: PeakRange = "6-22".parse().unwrap();
        assert_eq!(range.start_hour(), 6);
        assert_eq!(range.end_hour(), 22);
        assert_eq!(range.to_string(), "06-22");
    }

    #[test]
    fn test_peak_range_rejects_malformed() {
        for text in ["", "24", "10-10", "18-06", "00-25", "a-b", "1-2-3", "100-200"] {
            assert!(text.parse::<PeakRange>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_options_deserialize_from_json() {
        let json = r#"{
            "resolution": "1h",
            "price_mode": "CHEAPEST RANGES (NOT CONSECUTIVE)",
            "operation_mode": "eco",
            "presets": {
                "super_eco": { "percentile": 10, "min_window": 1 },
                "eco": { "percentile": 25, "min_window": 3 },
                "comfort": { "percentile": 30, "min_window": 2 },
                "aggressive": { "percentile": 60, "min_window": 1 }
            },
            "peak_range": "06-22",
            "include_negative_prices": false,
            "consecutive_count": 3,
            "not_consecutive_count": 5
        }"#;

        let options: ClassificationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.resolution, Resolution::Hourly);
        assert_eq!(options.price_mode, PriceMode::CheapestNotConsecutive);
        assert_eq!(options.active_preset().percentile(), 25);
        assert_eq!(options.active_preset().min_window_hours(), 3);
        assert_eq!(options.peak_range, PeakRange::new(6, 22).unwrap());
        assert!(!options.include_negative_prices);
    }

    #[test]
    fn test_options_reject_invalid_preset() {
        let json = r#"{ "percentile": 0, "min_window": 2 }"#;
        assert!(serde_json::from_str::<OperationModePreset>(json).is_err());
    }
}
