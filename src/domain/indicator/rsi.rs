//! RSI (Relative Strength Index) indicator.
//!
//! Per-step delta = C[i] - C[i-1]; gain = max(delta, 0),
//! loss = max(-delta, 0). Average gain/loss is the plain trailing mean
//! over the last `period` deltas — NOT Wilder's smoothing. The two
//! conventions diverge materially; the rolling mean is the one this
//! tool's outputs are checked against.
//!
//! RSI = 100 - 100/(1 + avg_gain/avg_loss).
//! avg_loss == 0 is taken as the limiting value 100 (this also covers the
//! flat-series 0/0 case), never NaN or infinity.
//!
//! Warmup: the first `period` points are invalid (one delta per window
//! slot, and no delta exists at index 0).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();

    if period == 0 {
        return IndicatorSeries::all_invalid(
            IndicatorType::Rsi(period),
            points.iter().map(|p| p.date),
            IndicatorValue::Simple(0.0),
        );
    }

    let mut gains: Vec<f64> = Vec::new();
    let mut losses: Vec<f64> = Vec::new();
    for pair in points.windows(2) {
        let delta = pair[1].close - pair[0].close;
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        // The window of deltas ending at point i is gains[i-period..i];
        // it only exists once i deltas have accumulated.
        let valid = i >= period;

        let value = if valid {
            let window = i - period..i;
            let avg_gain: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
            let avg_loss: f64 = losses[window].iter().sum::<f64>() / period as f64;

            if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            }
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: point.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::NaiveDate;

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

    fn simple(point: &IndicatorPoint) -> f64 {
        match point.value {
            IndicatorValue::Simple(v) => v,
            _ => panic!("Expected Simple value"),
        }
    }

    #[test]
    fn rsi_empty_series() {
        let series = PriceSeries::new("TEST", vec![]).unwrap();
        let rsi = calculate_rsi(&series, 14);
        assert!(rsi.values.is_empty());
    }

    #[test]
    fn rsi_warmup_period() {
        let closes: Vec<f64> = (0..20)
            .map(|i| 100.0 + (i as f64 % 5.0) * 2.0)
            .collect();
        let rsi = calculate_rsi(&make_series(&closes), 14);

        assert_eq!(rsi.values.len(), 20);
        for i in 0..14 {
            assert!(!rsi.values[i].valid, "point {} should be invalid", i);
        }
        for i in 14..20 {
            assert!(rsi.values[i].valid, "point {} should be valid", i);
        }
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..16).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&make_series(&closes), 14);

        assert!(rsi.values[14].valid);
        assert!((simple(&rsi.values[14]) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_constant_series_is_100() {
        // Flat prices: avg_gain == avg_loss == 0. The zero-loss limiting
        // rule applies, so the output is exactly 100, never NaN.
        let closes = vec![100.0; 32];
        let rsi = calculate_rsi(&make_series(&closes), 14);

        for point in rsi.values.iter().skip(14) {
            assert!(point.valid);
            let v = simple(point);
            assert!(!v.is_nan());
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..16).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&make_series(&closes), 14);

        assert!(rsi.values[14].valid);
        assert!((simple(&rsi.values[14]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (0..25)
            .map(|i| 100.0 + ((i as f64 * 1.3).sin() * 4.0))
            .collect();
        let rsi = calculate_rsi(&make_series(&closes), 14);

        for point in &rsi.values {
            if point.valid {
                let v = simple(point);
                assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
            }
        }
    }

    #[test]
    fn rsi_rolling_mean_convention() {
        // period 2 over closes [10, 11, 13, 12]:
        // deltas +1, +2, -1. At index 3 the window is [+2, -1]:
        // avg_gain = 1.0, avg_loss = 0.5, rs = 2, rsi = 100 - 100/3.
        let rsi = calculate_rsi(&make_series(&[10.0, 11.0, 13.0, 12.0]), 2);

        assert!(rsi.values[3].valid);
        let expected = 100.0 - 100.0 / 3.0;
        assert!((simple(&rsi.values[3]) - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_period_0_all_invalid() {
        let rsi = calculate_rsi(&make_series(&[100.0, 101.0]), 0);
        assert_eq!(rsi.values.len(), 2);
        assert!(rsi.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn rsi_period_longer_than_deltas_all_invalid() {
        let rsi = calculate_rsi(&make_series(&[100.0, 101.0, 102.0]), 14);
        assert_eq!(rsi.values.len(), 3);
        assert!(rsi.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn rsi_indicator_type() {
        let rsi = calculate_rsi(&make_series(&[100.0, 101.0]), 14);
        assert_eq!(rsi.indicator_type, IndicatorType::Rsi(14));
    }
}
