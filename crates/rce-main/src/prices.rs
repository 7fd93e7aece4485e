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

//! Price file loading
//!
//! Accepts either a plain JSON array of prices or a PSE report as published
//! by the market operator: `{"value": [{"dtime": "...", "rce_pln": 412.5}, ...]}`.

use anyhow::{Context, Result, anyhow};
use rce_types::PriceSeries;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

pub fn load_prices(path: &Path) -> Result<PriceSeries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read price file {}", path.display()))?;
    let prices = parse_prices(&text)
        .with_context(|| format!("Failed to parse price file {}", path.display()))?;

    debug!("Loaded {} prices from {}", prices.len(), path.display());
    Ok(PriceSeries::infer(prices))
}

/// Extract prices in slot order
///
/// Documents of any other shape yield no prices, which the refresh treats as
/// data that has not been published yet.
pub fn parse_prices(text: &str) -> Result<Vec<f64>> {
    let document: Value = serde_json::from_str(text)?;

    match document {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| price_value(item).ok_or_else(|| anyhow!("Entry {i} is not a price")))
            .collect(),
        Value::Object(mut fields) => match fields.remove("value") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    entry
                        .get("rce_pln")
                        .and_then(price_value)
                        .ok_or_else(|| anyhow!("Entry {i} has no rce_pln price"))
                })
                .collect(),
            Some(_) | None => {
                warn!("Price document has no 'value' array, treating it as empty");
                Ok(Vec::new())
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            warn!("Unrecognized price document, treating it as empty");
            Ok(Vec::new())
        }
    }
}

fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
