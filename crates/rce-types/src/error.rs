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

//! Error types for option parsing and validation

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown resolution '{0}' (expected 15m or 1h)")]
    UnknownResolution(String),

    #[error("unknown price mode '{0}'")]
    UnknownPriceMode(String),

    #[error("unknown operation mode '{0}'")]
    UnknownOperationMode(String),

    #[error("invalid peak range '{0}': expected HH-HH with 0 <= start < end <= 24")]
    InvalidPeakRange(String),

    #[error("percentile {0} out of range (1-100)")]
    PercentileOutOfRange(u32),

    #[error("minimum window of {0}h out of range (1-24)")]
    MinWindowOutOfRange(u32),

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
