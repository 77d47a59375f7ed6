//! One-shot analysis of a price series: every indicator, plus the latest
//! signals, under a single parameter set.

use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_macd, calculate_rsi, calculate_sma, macd, rsi,
    IndicatorSeries,
};
use crate::domain::series::PriceSeries;
use crate::domain::signal::{self, Signal};

/// Indicator parameters with the documented defaults: SMA/Bollinger
/// period 20, Bollinger multiplier 2.0, RSI period 14, MACD 12/26/9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorParams {
    pub sma_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult_x100: u32,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_period: bollinger::DEFAULT_PERIOD,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult_x100: bollinger::DEFAULT_STDDEV_MULT_X100,
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub sma: IndicatorSeries,
    pub bollinger: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub signals: Vec<Signal>,
}

/// Compute the full indicator set and the signals at the last point.
/// Indicators are mutually independent; each sees only the input series.
/// An empty series produces empty indicator series and no signals.
pub fn analyze(series: &PriceSeries, params: &IndicatorParams) -> AnalysisReport {
    let sma = calculate_sma(series, params.sma_period);
    let bollinger = calculate_bollinger(
        series,
        params.bollinger_period,
        params.bollinger_mult_x100,
    );
    let rsi = calculate_rsi(series, params.rsi_period);
    let macd = calculate_macd(
        series,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    );

    let signals = if series.is_empty() {
        Vec::new()
    } else {
        let last = series.len() - 1;
        [
            signal::evaluate_bollinger(series, &bollinger, last),
            signal::evaluate_macd(&macd, last),
            signal::evaluate_rsi(&rsi, last),
        ]
        .into_iter()
        .flatten()
        .collect()
    };

    AnalysisReport {
        sma,
        bollinger,
        rsi,
        macd,
        signals,
    }
}
