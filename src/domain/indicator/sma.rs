//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1 ..= i]), trailing window only, inclusive of the
//! current point. No centered or forward-looking variant: a trailing window
//! is what keeps derived signals free of future data.
//! Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();

    if period == 0 || period > points.len() {
        return IndicatorSeries::all_invalid(
            IndicatorType::Sma(period),
            points.iter().map(|p| p.date),
            IndicatorValue::Simple(0.0),
        );
    }

    let mut values = Vec::with_capacity(points.len());
    let warmup = period - 1;

    for i in 0..points.len() {
        let valid = i >= warmup;

        let value = if valid {
            let start = i + 1 - period;
            let window = &points[start..=i];
            window.iter().map(|p| p.close).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: points[i].date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
