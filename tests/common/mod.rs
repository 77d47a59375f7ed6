#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use marketpulse::domain::asset::Asset;
use marketpulse::domain::error::MarketPulseError;
pub use marketpulse::domain::series::{PricePoint, PriceSeries};
use marketpulse::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_series(symbol: &str, start: NaiveDate, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::close_only(start + Days::new(i as u64), close))
        .collect();
    PriceSeries::new(symbol, points).unwrap()
}

/// A gently oscillating close sequence long enough to clear every
/// default warm-up window.
pub fn generate_closes(n: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| base + (i as f64 * 0.45).sin() * base * 0.03)
        .collect()
}

pub struct MockMarketDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_daily(
        &self,
        asset: &Asset,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<PriceSeries, MarketPulseError> {
        if let Some(reason) = self.errors.get(&asset.symbol) {
            return Err(MarketPulseError::Provider {
                provider: "mock".into(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(&asset.symbol)
            .cloned()
            .ok_or_else(|| MarketPulseError::NoData {
                symbol: asset.symbol.clone(),
            })
    }
}
