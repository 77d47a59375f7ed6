//! Market data access port trait.

use crate::domain::asset::Asset;
use crate::domain::error::MarketPulseError;
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

/// A daily-bar data source. Implementations normalize whatever the
/// provider returns into a validated [`PriceSeries`]; a payload with no
/// usable series must surface as [`MarketPulseError::NoData`], never as
/// an empty series.
pub trait MarketDataPort {
    fn fetch_daily(
        &self,
        asset: &Asset,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MarketPulseError>;
}
