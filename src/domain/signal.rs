//! BUY/SELL/HOLD signal derivation.
//!
//! Each evaluator reads a fully computed indicator series at one index
//! (callers usually want the last) and maps it to a discrete action:
//!
//! - Bollinger: close at or below the lower band is a buy, at or above the
//!   upper band a sell.
//! - MACD: line above its signal line is a buy, below a sell, equal holds.
//! - RSI: below 30 (oversold) is a buy, above 70 (overbought) a sell.
//!
//! Warm-up points degrade to Hold; an index past the end of the series
//! yields no signal at all (there is no date to attach). Evaluators never
//! mutate their inputs and never panic on undefined values.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
            SignalAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// A discrete trading signal: the action, the indicator that produced it,
/// and the date it was evaluated at.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub action: SignalAction,
    pub indicator: IndicatorType,
    pub date: NaiveDate,
}

fn signal(action: SignalAction, indicator: &IndicatorType, date: NaiveDate) -> Signal {
    Signal {
        action,
        indicator: indicator.clone(),
        date,
    }
}

/// Close vs. the Bollinger envelope at `index`.
pub fn evaluate_bollinger(
    prices: &PriceSeries,
    bands: &IndicatorSeries,
    index: usize,
) -> Option<Signal> {
    let price = prices.points().get(index)?;
    let point = bands.values.get(index)?;

    let action = if !point.valid {
        SignalAction::Hold
    } else if let IndicatorValue::Bollinger { upper, lower, .. } = point.value {
        if price.close <= lower {
            SignalAction::Buy
        } else if price.close >= upper {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        }
    } else {
        SignalAction::Hold
    };

    Some(signal(action, &bands.indicator_type, point.date))
}

/// MACD line vs. its signal line at `index`.
pub fn evaluate_macd(macd: &IndicatorSeries, index: usize) -> Option<Signal> {
    let point = macd.values.get(index)?;

    let action = if !point.valid {
        SignalAction::Hold
    } else if let IndicatorValue::Macd { line, signal } = point.value {
        if line > signal {
            SignalAction::Buy
        } else if line < signal {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        }
    } else {
        SignalAction::Hold
    };

    Some(signal(action, &macd.indicator_type, point.date))
}

/// RSI vs. the 30/70 thresholds at `index`.
pub fn evaluate_rsi(rsi: &IndicatorSeries, index: usize) -> Option<Signal> {
    let point = rsi.values.get(index)?;

    let action = if !point.valid {
        SignalAction::Hold
    } else if let IndicatorValue::Simple(value) = point.value {
        if value < RSI_OVERSOLD {
            SignalAction::Buy
        } else if value > RSI_OVERBOUGHT {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        }
    } else {
        SignalAction::Hold
    };

    Some(signal(action, &rsi.indicator_type, point.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{
        calculate_bollinger, calculate_macd, calculate_rsi,
    };
    use crate::domain::series::PricePoint;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PricePoint::close_only(start + chrono::Days::new(i as u64), close)
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn bollinger_buy_at_lower_band() {
        // A collapse well below the recent range pushes the close under
        // the lower band.
        let series = make_series(&[100.0, 101.0, 99.0, 100.0, 70.0]);
        let bands = calculate_bollinger(&series, 4, 100);

        let signal = evaluate_bollinger(&series, &bands, 4).unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
    }

    #[test]
    fn bollinger_sell_at_upper_band() {
        let series = make_series(&[100.0, 101.0, 99.0, 100.0, 130.0]);
        let bands = calculate_bollinger(&series, 4, 100);

        let signal = evaluate_bollinger(&series, &bands, 4).unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
    }

    #[test]
    fn bollinger_hold_inside_bands() {
        let series = make_series(&[100.0, 104.0, 96.0, 100.0, 101.0]);
        let bands = calculate_bollinger(&series, 4, 200);

        let signal = evaluate_bollinger(&series, &bands, 4).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn bollinger_warmup_holds() {
        let series = make_series(&[100.0, 101.0, 99.0]);
        let bands = calculate_bollinger(&series, 20, 200);

        let signal = evaluate_bollinger(&series, &bands, 2).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn bollinger_out_of_range_is_none() {
        let series = make_series(&[100.0, 101.0]);
        let bands = calculate_bollinger(&series, 2, 200);

        assert!(evaluate_bollinger(&series, &bands, 5).is_none());
    }

    #[test]
    fn macd_buy_when_line_above_signal() {
        // A sharp late rally lifts the fast EMA, and the line crosses
        // above its own smoothed copy.
        let mut closes: Vec<f64> = vec![100.0; 30];
        closes.extend((0..10).map(|i| 100.0 + 3.0 * (i + 1) as f64));
        let series = make_series(&closes);
        let macd = calculate_macd(&series, 12, 26, 9);

        let signal = evaluate_macd(&macd, closes.len() - 1).unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
    }

    #[test]
    fn macd_sell_when_line_below_signal() {
        let mut closes: Vec<f64> = vec![100.0; 30];
        closes.extend((0..10).map(|i| 100.0 - 3.0 * (i + 1) as f64));
        let series = make_series(&closes);
        let macd = calculate_macd(&series, 12, 26, 9);

        let signal = evaluate_macd(&macd, closes.len() - 1).unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
    }

    #[test]
    fn macd_equal_holds() {
        // Flat series: line and signal are both identically zero.
        let series = make_series(&vec![100.0; 40]);
        let macd = calculate_macd(&series, 12, 26, 9);

        let signal = evaluate_macd(&macd, 39).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn rsi_sell_when_overbought() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14);

        let signal = evaluate_rsi(&rsi, 19).unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
    }

    #[test]
    fn rsi_buy_when_oversold() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14);

        let signal = evaluate_rsi(&rsi, 19).unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
    }

    #[test]
    fn rsi_warmup_holds() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        let rsi = calculate_rsi(&series, 14);

        let signal = evaluate_rsi(&rsi, 2).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn signal_carries_indicator_and_date() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        let rsi = calculate_rsi(&series, 14);

        let signal = evaluate_rsi(&rsi, 1).unwrap();
        assert_eq!(signal.indicator, IndicatorType::Rsi(14));
        assert_eq!(
            signal.date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn action_display() {
        assert_eq!(SignalAction::Buy.to_string(), "BUY");
        assert_eq!(SignalAction::Sell.to_string(), "SELL");
        assert_eq!(SignalAction::Hold.to_string(), "HOLD");
    }
}
