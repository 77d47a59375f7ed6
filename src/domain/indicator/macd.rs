//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal span) of the MACD line, same recursion.
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! The recursive EMA (see [`super::ema`]) is defined from index 0, so
//! every MACD point is valid; there is no warmup window.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> IndicatorSeries {
    let points = series.points();
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_span,
    };

    if fast == 0 || slow == 0 || signal_span == 0 {
        return IndicatorSeries::all_invalid(
            indicator_type,
            points.iter().map(|p| p.date),
            IndicatorValue::Macd {
                line: 0.0,
                signal: 0.0,
            },
        );
    }

    let closes = series.closes();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_span);

    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorPoint {
            date: point.date,
            valid: true,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(series: &PriceSeries) -> IndicatorSeries {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
