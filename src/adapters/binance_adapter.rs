//! Binance data adapter.
//!
//! Daily klines from the public `/api/v3/klines` endpoint — no API key
//! involved. USD-quoted catalog pairs map to Binance's USDT markets
//! (`BTC/USD` -> `BTCUSDT`). The endpoint caps a response at 1000 rows,
//! so longer ranges are fetched in batches keyed on the last returned
//! date.

use crate::domain::asset::{Asset, MarketKind};
use crate::domain::error::MarketPulseError;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const PROVIDER: &str = "binance";
const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BATCH_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct BinanceAdapter {
    config: BinanceConfig,
    client: reqwest::blocking::Client,
}

impl BinanceAdapter {
    pub fn new(config: BinanceConfig) -> Result<Self, MarketPulseError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(http_error)?;
        Ok(Self { config, client })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketPulseError> {
        let mut adapter_config = BinanceConfig::default();
        if let Some(base_url) = config.get_string("binance", "base_url") {
            adapter_config.base_url = base_url;
        }
        Self::new(adapter_config)
    }
}

fn http_error(e: reqwest::Error) -> MarketPulseError {
    MarketPulseError::Http {
        reason: e.to_string(),
    }
}

fn provider_error(reason: impl Into<String>) -> MarketPulseError {
    MarketPulseError::Provider {
        provider: PROVIDER.into(),
        reason: reason.into(),
    }
}

/// `BTC/USD` -> `BTCUSDT`; pairs already quoted in USDT pass through.
pub(crate) fn pair_symbol(asset: &Asset) -> String {
    let quote = match asset.quote() {
        "USD" => "USDT",
        other => other,
    };
    format!("{}{}", asset.base(), quote)
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

fn row_f64(row: &[Value], index: usize) -> Result<f64, MarketPulseError> {
    let value = row
        .get(index)
        .ok_or_else(|| provider_error(format!("kline row missing field {}", index)))?;
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_f64())
        .ok_or_else(|| provider_error(format!("kline field {} is not numeric", index)))
}

/// Normalize a klines payload: rows are arrays of
/// `[open_time_ms, open, high, low, close, volume, ...]` with the price
/// fields encoded as strings.
pub(crate) fn parse_klines(
    payload: &Value,
    symbol: &str,
) -> Result<Vec<PricePoint>, MarketPulseError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| provider_error(format!("expected kline array for {}", symbol)))?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row
            .as_array()
            .ok_or_else(|| provider_error("kline row is not an array"))?;

        let open_time = row
            .first()
            .and_then(Value::as_i64)
            .ok_or_else(|| provider_error("kline row missing open time"))?;
        let date = DateTime::<Utc>::from_timestamp_millis(open_time)
            .ok_or_else(|| provider_error(format!("invalid open time {}", open_time)))?
            .date_naive();

        points.push(PricePoint {
            date,
            open: Some(row_f64(row, 1)?),
            high: Some(row_f64(row, 2)?),
            low: Some(row_f64(row, 3)?),
            close: row_f64(row, 4)?,
            volume: Some(row_f64(row, 5)?),
        });
    }

    Ok(points)
}

impl MarketDataPort for BinanceAdapter {
    fn fetch_daily(
        &self,
        asset: &Asset,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MarketPulseError> {
        if asset.kind != MarketKind::Crypto {
            return Err(provider_error(format!(
                "{} is not a crypto pair; binance serves crypto markets only",
                asset.symbol
            )));
        }

        let pair = pair_symbol(asset);
        let url = format!("{}/api/v3/klines", self.config.base_url);
        let end_millis = midnight_millis(end_date);

        let mut points: Vec<PricePoint> = Vec::new();
        let mut cursor = midnight_millis(start_date);

        loop {
            debug!(pair = %pair, cursor, "requesting binance klines");

            let params: Vec<(&str, String)> = vec![
                ("symbol", pair.clone()),
                ("interval", "1d".into()),
                ("startTime", cursor.to_string()),
                ("endTime", end_millis.to_string()),
                ("limit", BATCH_LIMIT.to_string()),
            ];

            let payload: Value = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .map_err(http_error)?
                .error_for_status()
                .map_err(http_error)?
                .json()
                .map_err(http_error)?;

            let batch = parse_klines(&payload, &asset.symbol)?;
            let batch_len = batch.len();
            points.extend(batch);

            if batch_len < BATCH_LIMIT {
                break;
            }
            let last_date = points
                .last()
                .map(|p| p.date)
                .unwrap_or(end_date);
            cursor = midnight_millis(last_date + Days::new(1));
        }

        points.retain(|p| p.date >= start_date && p.date <= end_date);

        if points.is_empty() {
            return Err(MarketPulseError::NoData {
                symbol: asset.symbol.clone(),
            });
        }

        info!(symbol = %asset.symbol, rows = points.len(), "normalized binance series");
        PriceSeries::new(asset.symbol.clone(), points)
    }
}
