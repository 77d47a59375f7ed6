//! Concrete adapter implementations of the port traits.

pub mod alpha_vantage_adapter;
pub mod binance_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;

use crate::domain::error::MarketPulseError;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

use alpha_vantage_adapter::AlphaVantageAdapter;
use binance_adapter::BinanceAdapter;
use csv_adapter::CsvAdapter;

/// Build the provider named by `[provider] name` (default: alpha_vantage).
pub fn build_data_port(
    config: &dyn ConfigPort,
) -> Result<Box<dyn MarketDataPort>, MarketPulseError> {
    let name = config
        .get_string("provider", "name")
        .unwrap_or_else(|| "alpha_vantage".to_string());

    match name.as_str() {
        "alpha_vantage" => Ok(Box::new(AlphaVantageAdapter::from_config(config)?)),
        "binance" => Ok(Box::new(BinanceAdapter::from_config(config)?)),
        "csv" => Ok(Box::new(CsvAdapter::from_config(config)?)),
        other => Err(MarketPulseError::ConfigInvalid {
            section: "provider".into(),
            key: "name".into(),
            reason: format!(
                "unknown provider '{}' (expected alpha_vantage, binance, or csv)",
                other
            ),
        }),
    }
}
