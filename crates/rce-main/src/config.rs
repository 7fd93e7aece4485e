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

mod validation;

pub use validation::ValidationResult;

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use rce_core::resolve_peak_range;
use rce_types::{
    ClassificationOptions, OperationMode, OperationModePreset, OperationModePresets, PeakRange,
    PriceMode, Resolution,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "rce.toml";

/// Configuration as written in `rce.toml`
///
/// Mode fields stay as text so validation can report every bad field at once
/// instead of failing on the first one during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log filter used when neither `--log-level` nor `RUST_LOG` is set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Market timezone the price slots are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Canonical identifier or legacy label, e.g. "CHEAPEST RANGES (NOT CONSECUTIVE)"
    #[serde(default = "default_price_mode")]
    pub price_mode: String,

    #[serde(default = "default_operation_mode")]
    pub operation_mode: String,

    /// "HH-HH", falls back to the whole day when malformed
    #[serde(default = "default_peak_range")]
    pub peak_range: String,

    #[serde(default = "default_true")]
    pub include_negative_prices: bool,

    #[serde(default = "default_count")]
    pub consecutive_count: u32,

    #[serde(default = "default_count")]
    pub not_consecutive_count: u32,

    #[serde(default)]
    pub presets: PresetsConfig,
}

/// `[presets.<mode>]` tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    pub super_eco: PresetConfig,
    pub eco: PresetConfig,
    pub comfort: PresetConfig,
    pub aggressive: PresetConfig,
}

/// Percentile and minimum window (hours) of one operation mode
///
/// Keys left out of a table take the comfort values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    pub percentile: u32,
    pub min_window: u32,
}

fn default_timezone() -> String {
    "Europe/Warsaw".to_owned()
}

fn default_resolution() -> String {
    Resolution::default().as_str().to_owned()
}

fn default_price_mode() -> String {
    PriceMode::default().as_str().to_owned()
}

fn default_operation_mode() -> String {
    OperationMode::default().as_str().to_owned()
}

fn default_peak_range() -> String {
    PeakRange::FULL_DAY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_count() -> u32 {
    4
}

impl Default for PresetConfig {
    fn default() -> Self {
        OperationModePresets::default().comfort.into()
    }
}

impl From<OperationModePreset> for PresetConfig {
    fn from(preset: OperationModePreset) -> Self {
        Self {
            percentile: u32::from(preset.percentile()),
            min_window: u32::from(preset.min_window_hours()),
        }
    }
}

impl Default for PresetsConfig {
    fn default() -> Self {
        let presets = OperationModePresets::default();
        Self {
            super_eco: presets.super_eco.into(),
            eco: presets.eco.into(),
            comfort: presets.comfort.into(),
            aggressive: presets.aggressive.into(),
        }
    }
}

impl PresetsConfig {
    fn get(&self, mode: OperationMode) -> PresetConfig {
        match mode {
            OperationMode::SuperEco => self.super_eco,
            OperationMode::Eco => self.eco,
            OperationMode::Comfort => self.comfort,
            OperationMode::Aggressive => self.aggressive,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            timezone: default_timezone(),
            resolution: default_resolution(),
            price_mode: default_price_mode(),
            operation_mode: default_operation_mode(),
            peak_range: default_peak_range(),
            include_negative_prices: true,
            consecutive_count: default_count(),
            not_consecutive_count: default_count(),
            presets: PresetsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the configuration file, `None` when it does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(Some(config))
    }

    /// Validate configuration with field-level reporting
    pub fn validate_detailed(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        if let Err(e) = self.resolution.parse::<Resolution>() {
            result.add_error("resolution", e.to_string());
        }
        if let Err(e) = self.price_mode.parse::<PriceMode>() {
            result.add_error("price_mode", e.to_string());
        }
        if let Err(e) = self.operation_mode.parse::<OperationMode>() {
            result.add_error("operation_mode", e.to_string());
        }
        if self.timezone.parse::<Tz>().is_err() {
            result.add_error(
                "timezone",
                format!("Unknown timezone '{}'", self.timezone),
            );
        }

        if self.peak_range.parse::<PeakRange>().is_err() {
            result.add_warning(
                "peak_range",
                format!(
                    "Invalid peak range '{}', the whole day will be used",
                    self.peak_range
                ),
            );
        }

        if self.consecutive_count < 1 {
            result.add_error("consecutive_count", "Must be at least 1");
        }
        if self.not_consecutive_count < 1 {
            result.add_error("not_consecutive_count", "Must be at least 1");
        }

        for mode in OperationMode::ALL {
            result.merge(validate_preset(mode, self.presets.get(mode)));
        }

        result
    }

    /// Engine options for this configuration
    pub fn to_options(&self) -> Result<ClassificationOptions> {
        let mut presets = OperationModePresets::default();
        for mode in OperationMode::ALL {
            let preset = self.presets.get(mode);
            presets.set(
                mode,
                OperationModePreset::new(preset.percentile, preset.min_window)?,
            );
        }

        Ok(ClassificationOptions {
            resolution: self.resolution.parse()?,
            price_mode: self.price_mode.parse()?,
            operation_mode: self.operation_mode.parse()?,
            presets,
            peak_range: resolve_peak_range(&self.peak_range),
            include_negative_prices: self.include_negative_prices,
            consecutive_count: usize::try_from(self.consecutive_count)?,
            not_consecutive_count: usize::try_from(self.not_consecutive_count)?,
        })
    }

    pub fn market_timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|e| anyhow!("Unknown timezone '{}': {e}", self.timezone))
    }
}

fn validate_preset(mode: OperationMode, preset: PresetConfig) -> ValidationResult {
    let mut result = ValidationResult::success();
    let prefix = format!("presets.{mode}");

    if !(1..=100).contains(&preset.percentile) {
        result.add_error(
            format!("{prefix}.percentile"),
            format!("Percentile must be 1-100, got {}", preset.percentile),
        );
    }
    if !(1..=24).contains(&preset.min_window) {
        result.add_error(
            format!("{prefix}.min_window"),
            format!("Minimum window must be 1-24 hours, got {}", preset.min_window),
        );
    }

    result
}
