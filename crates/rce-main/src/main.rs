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

mod config;
mod prices;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use config::{AppConfig, DEFAULT_CONFIG_PATH};
use rce_core::{
    ClassificationOptions, DayClassification, PriceSnapshot, RefreshError, SnapshotStore,
    cheap_windows, cheapest_slot, current_price, is_cheap_at, next_cheap_slot,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Classify day-ahead electricity prices into cheap windows
#[derive(Parser, Debug)]
#[command(name = "rce", version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "RCE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Today's prices (JSON array or PSE report)
    #[arg(long)]
    today: PathBuf,

    /// Tomorrow's prices, once published
    #[arg(long)]
    tomorrow: Option<PathBuf>,

    /// Market time (HH:MM) to evaluate the current slot at, defaults to now
    #[arg(long, value_parser = parse_time)]
    at: Option<NaiveTime>,

    /// Log filter, overrides RUST_LOG and the configuration
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::read(&cli.config)?;
    init_tracing(
        cli.log_level.as_deref(),
        config.as_ref().and_then(|c| c.log_level.as_deref()),
    )?;

    let config = config.unwrap_or_else(|| {
        warn!(
            "No configuration file at {}, using defaults",
            cli.config.display()
        );
        AppConfig::default()
    });

    let validation = config.validate_detailed();
    for issue in &validation.warnings {
        warn!("{issue}");
    }
    if validation.has_errors() {
        for issue in &validation.errors {
            error!("{issue}");
        }
        anyhow::bail!("Invalid configuration in {}", cli.config.display());
    }

    let options = config.to_options()?;
    let timezone = config.market_timezone()?;

    info!("Starting RCE price classification");
    info!("   Resolution: {}", options.resolution);
    info!(
        "   Price mode: {} ({})",
        options.price_mode, options.operation_mode
    );
    info!("   Peak range: {}", options.peak_range);
    info!("   Negative prices: {}", options.include_negative_prices);
    info!("   Timezone: {timezone}");

    let now = Utc::now();
    let local_now = now.with_timezone(&timezone);
    let at = cli.at.unwrap_or_else(|| local_now.time());

    let store = SnapshotStore::new(PriceSnapshot::empty(&options));
    let refreshed = refresh(&store, &cli, &options, now);

    let snapshot = store.current();
    let report = Report::new(&snapshot, at, local_now.date_naive(), &timezone);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    refreshed
}

fn init_tracing(cli_level: Option<&str>, config_level: Option<&str>) -> Result<()> {
    // --log-level, then RUST_LOG, then the configuration
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_level.unwrap_or("info"))),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn refresh(
    store: &SnapshotStore,
    cli: &Cli,
    options: &ClassificationOptions,
    now: DateTime<Utc>,
) -> Result<()> {
    let today = match prices::load_prices(&cli.today) {
        Ok(series) => series,
        Err(e) => {
            store.mark_failed(&RefreshError::Source(format!("{e:#}")));
            return Err(e);
        }
    };

    let tomorrow = match &cli.tomorrow {
        Some(path) => match prices::load_prices(path) {
            Ok(series) => Some(series),
            Err(e) => {
                warn!("Tomorrow's prices unavailable: {e:#}");
                None
            }
        },
        None => None,
    };

    store
        .refresh(&today, tomorrow.as_ref(), options, now)
        .context("Price refresh failed")?;
    Ok(())
}

/// Cheap window on the market clock
#[derive(Debug, Serialize)]
struct LocalWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    slots: usize,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    at: NaiveTime,
    is_cheap_now: Option<bool>,
    current_price: Option<f64>,
    next_cheap_slot: Option<NaiveTime>,
    cheapest_slot_tomorrow: Option<NaiveTime>,
    tomorrow_available: bool,
    today_windows: Vec<LocalWindow>,
    tomorrow_windows: Vec<LocalWindow>,
    snapshot: &'a PriceSnapshot,
}

impl<'a> Report<'a> {
    fn new(snapshot: &'a PriceSnapshot, at: NaiveTime, today: NaiveDate, timezone: &Tz) -> Self {
        let tomorrow = snapshot.tomorrow.as_ref();
        let tomorrow_windows = match (tomorrow, today.succ_opt()) {
            (Some(day), Some(date)) => local_windows(day, date, timezone),
            _ => Vec::new(),
        };

        Self {
            at,
            is_cheap_now: is_cheap_at(&snapshot.today, at),
            current_price: current_price(&snapshot.today, at),
            next_cheap_slot: next_cheap_slot(&snapshot.today, at),
            cheapest_slot_tomorrow: tomorrow.and_then(cheapest_slot).map(|(_, time)| time),
            tomorrow_available: snapshot.tomorrow_available(),
            today_windows: local_windows(&snapshot.today, today, timezone),
            tomorrow_windows,
            snapshot,
        }
    }
}

fn local_windows(day: &DayClassification, date: NaiveDate, timezone: &Tz) -> Vec<LocalWindow> {
    cheap_windows(day)
        .iter()
        .filter_map(|window| {
            let (start, end) = window.localize(date, timezone)?;
            Some(LocalWindow {
                start: start.fixed_offset(),
                end: end.fixed_offset(),
                slots: window.end_slot - window.start_slot,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rce_core::{PriceMode, PriceSeries, classify};

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "rce",
            "--today",
            "today.json",
            "--tomorrow",
            "tomorrow.json",
            "--at",
            "13:45",
        ])
        .unwrap();
        assert_eq!(cli.today, PathBuf::from("today.json"));
        assert_eq!(cli.at, NaiveTime::from_hms_opt(13, 45, 0));
    }

    #[test]
    fn test_cli_rejects_bad_time() {
        assert!(Cli::try_parse_from(["rce", "--today", "t.json", "--at", "25:99"]).is_err());
    }

    #[test]
    fn test_report() {
        let options = ClassificationOptions {
            price_mode: PriceMode::CheapestConsecutive,
            consecutive_count: 2,
            include_negative_prices: false,
            resolution: rce_core::Resolution::Hourly,
            ..ClassificationOptions::default()
        };
        let mut prices = vec![100.0; 24];
        prices[3] = 10.0;
        prices[4] = 10.0;

        let mut snapshot = PriceSnapshot::empty(&options);
        snapshot.today = classify(&PriceSeries::hourly(prices.clone()), &options);
        snapshot.tomorrow = Some(classify(&PriceSeries::hourly(prices), &options));

        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let at = NaiveTime::from_hms_opt(1, 30, 0).unwrap();
        let report = Report::new(&snapshot, at, date, &chrono_tz::Europe::Warsaw);

        assert_eq!(report.is_cheap_now, Some(false));
        assert_eq!(report.current_price, Some(100.0));
        assert_eq!(report.next_cheap_slot, NaiveTime::from_hms_opt(3, 0, 0));
        assert_eq!(report.cheapest_slot_tomorrow, NaiveTime::from_hms_opt(3, 0, 0));
        assert_eq!(report.today_windows.len(), 1);
        assert_eq!(report.today_windows[0].slots, 2);
        assert_eq!(
            report.tomorrow_windows[0].start.to_rfc3339(),
            "2025-01-16T03:00:00+01:00"
        );
        assert!(serde_json::to_string(&report).is_ok());
    }
}
