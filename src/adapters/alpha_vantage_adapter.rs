//! Alpha Vantage data adapter.
//!
//! Crypto pairs go through `DIGITAL_CURRENCY_DAILY` (close field
//! `"4a. close (USD)"`), equities through `TIME_SERIES_DAILY` (close
//! field `"4. close"`). Payload normalization is a pure function over the
//! decoded JSON so it can be tested against fixture responses without a
//! network.
//!
//! The API key arrives in [`AlphaVantageConfig`]; it is never read from
//! the process environment.

use crate::domain::asset::{Asset, MarketKind};
use crate::domain::error::MarketPulseError;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const PROVIDER: &str = "alpha_vantage";
const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
}

impl AlphaVantageConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct AlphaVantageAdapter {
    config: AlphaVantageConfig,
    client: reqwest::blocking::Client,
}

impl AlphaVantageAdapter {
    pub fn new(config: AlphaVantageConfig) -> Result<Self, MarketPulseError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(http_error)?;
        Ok(Self { config, client })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketPulseError> {
        let api_key = config.get_string("alpha_vantage", "api_key").ok_or_else(|| {
            MarketPulseError::ConfigMissing {
                section: "alpha_vantage".into(),
                key: "api_key".into(),
            }
        })?;

        let mut adapter_config = AlphaVantageConfig::new(api_key);
        if let Some(base_url) = config.get_string("alpha_vantage", "base_url") {
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

struct SeriesKeys {
    time_series: &'static str,
    open: &'static str,
    high: &'static str,
    low: &'static str,
    close: &'static str,
    volume: &'static str,
}

fn keys_for(kind: MarketKind) -> SeriesKeys {
    match kind {
        MarketKind::Crypto => SeriesKeys {
            time_series: "Time Series (Digital Currency Daily)",
            open: "1a. open (USD)",
            high: "2a. high (USD)",
            low: "3a. low (USD)",
            close: "4a. close (USD)",
            volume: "5. volume",
        },
        MarketKind::Equity => SeriesKeys {
            time_series: "Time Series (Daily)",
            open: "1. open",
            high: "2. high",
            low: "3. low",
            close: "4. close",
            volume: "5. volume",
        },
    }
}

fn field(row: &Value, key: &str) -> Option<f64> {
    let value = row.get(key)?;
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_f64())
}

/// Normalize a decoded daily payload into unsorted price points. A payload
/// without the expected time-series key is a no-data condition (rate-limit
/// notes and error messages come back as 200s with a different shape);
/// rows missing the close field are provider errors.
pub(crate) fn parse_daily(
    payload: &Value,
    symbol: &str,
    kind: MarketKind,
) -> Result<Vec<PricePoint>, MarketPulseError> {
    let keys = keys_for(kind);

    let time_series = payload
        .get(keys.time_series)
        .and_then(Value::as_object)
        .ok_or_else(|| MarketPulseError::NoData {
            symbol: symbol.to_string(),
        })?;

    let mut points = Vec::with_capacity(time_series.len());
    for (date_text, row) in time_series {
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|e| {
            MarketPulseError::Provider {
                provider: PROVIDER.into(),
                reason: format!("invalid date '{}': {}", date_text, e),
            }
        })?;

        let close = field(row, keys.close).ok_or_else(|| MarketPulseError::Provider {
            provider: PROVIDER.into(),
            reason: format!("missing '{}' field on {}", keys.close, date_text),
        })?;

        points.push(PricePoint {
            date,
            open: field(row, keys.open),
            high: field(row, keys.high),
            low: field(row, keys.low),
            close,
            volume: field(row, keys.volume),
        });
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

impl MarketDataPort for AlphaVantageAdapter {
    fn fetch_daily(
        &self,
        asset: &Asset,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MarketPulseError> {
        let mut params: Vec<(&str, String)> = match asset.kind {
            MarketKind::Crypto => vec![
                ("function", "DIGITAL_CURRENCY_DAILY".into()),
                ("symbol", asset.base().to_string()),
                ("market", asset.quote().to_string()),
            ],
            MarketKind::Equity => vec![
                ("function", "TIME_SERIES_DAILY".into()),
                ("symbol", asset.symbol.clone()),
                ("outputsize", "full".into()),
            ],
        };
        params.push(("apikey", self.config.api_key.clone()));

        let url = format!("{}/query", self.config.base_url);
        debug!(symbol = %asset.symbol, kind = %asset.kind, "requesting alpha vantage daily series");

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

        let mut points = parse_daily(&payload, &asset.symbol, asset.kind)?;
        points.retain(|p| p.date >= start_date && p.date <= end_date);

        if points.is_empty() {
            return Err(MarketPulseError::NoData {
                symbol: asset.symbol.clone(),
            });
        }

        info!(symbol = %asset.symbol, rows = points.len(), "normalized alpha vantage series");
        PriceSeries::new(asset.symbol.clone(), points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn parse_crypto_payload() {
        let payload = json!({
            "Meta Data": { "1. Information": "Daily Prices" },
            "Time Series (Digital Currency Daily)": {
                "2024-01-02": {
                    "1a. open (USD)": "42000.00",
                    "2a. high (USD)": "43100.00",
                    "3a. low (USD)": "41500.00",
                    "4a. close (USD)": "42800.50",
                    "5. volume": "1234.5"
                },
                "2024-01-01": {
                    "1a. open (USD)": "41000.00",
                    "2a. high (USD)": "42200.00",
                    "3a. low (USD)": "40900.00",
                    "4a. close (USD)": "42000.00",
                    "5. volume": "987.6"
                }
            }
        });

        let points = parse_daily(&payload, "BTC/USD", MarketKind::Crypto).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date(1));
        assert_eq!(points[0].close, 42000.00);
        assert_eq!(points[1].date, date(2));
        assert_eq!(points[1].close, 42800.50);
        assert_eq!(points[1].volume, Some(1234.5));
    }

    #[test]
    fn parse_equity_payload() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-03": {
                    "1. open": "470.10",
                    "2. high": "473.50",
                    "3. low": "469.80",
                    "4. close": "472.65",
                    "5. volume": "71234500"
                }
            }
        });

        let points = parse_daily(&payload, "SPY", MarketKind::Equity).unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 472.65);
        assert_eq!(points[0].open, Some(470.10));
    }

    #[test]
    fn missing_time_series_is_no_data() {
        // Rate-limit notes come back as HTTP 200 with a "Note" body.
        let payload = json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
        });

        let result = parse_daily(&payload, "BTC/USD", MarketKind::Crypto);
        match result {
            Err(MarketPulseError::NoData { symbol }) => assert_eq!(symbol, "BTC/USD"),
            other => panic!("Expected NoData, got {:?}", other),
        }
    }

    #[test]
    fn missing_close_field_is_provider_error() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-03": { "1. open": "470.10" }
            }
        });

        let result = parse_daily(&payload, "SPY", MarketKind::Equity);
        assert!(matches!(result, Err(MarketPulseError::Provider { .. })));
    }

    #[test]
    fn crypto_keys_do_not_match_equity_payload() {
        // An equity payload handed to the crypto parser must not be
        // silently accepted under the wrong field names.
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-03": { "4. close": "472.65" }
            }
        });

        assert!(matches!(
            parse_daily(&payload, "SPY", MarketKind::Crypto),
            Err(MarketPulseError::NoData { .. })
        ));
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-03": { "4. close": "472.65" }
            }
        });

        let points = parse_daily(&payload, "SPY", MarketKind::Equity).unwrap();
        assert_eq!(points[0].open, None);
        assert_eq!(points[0].volume, None);
    }

    #[test]
    fn from_config_requires_api_key() {
        use crate::adapters::file_config_adapter::FileConfigAdapter;

        let config = FileConfigAdapter::from_string("[alpha_vantage]\n").unwrap();
        assert!(matches!(
            AlphaVantageAdapter::from_config(&config),
            Err(MarketPulseError::ConfigMissing { .. })
        ));
    }
}
