//! Exponential Moving Average indicator.
//!
//! Recursive, non-bias-corrected form: alpha = 2/(span+1),
//! EMA[0] = C[0], EMA[i] = alpha*C[i] + (1-alpha)*EMA[i-1].
//!
//! The series is defined from index 0 with no warmup. This is NOT the
//! SMA-seeded convention some charting packages use; early values differ
//! materially between the two, and the recursive-from-first-value form is
//! the one this tool's outputs are checked against.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;

pub fn calculate_ema(series: &PriceSeries, span: usize) -> IndicatorSeries {
    let points = series.points();

    if span == 0 {
        return IndicatorSeries::all_invalid(
            IndicatorType::Ema(span),
            points.iter().map(|p| p.date),
            IndicatorValue::Simple(0.0),
        );
    }

    let closes = series.closes();
    let ema = ema_values(&closes, span);

    let values = points
        .iter()
        .zip(ema)
        .map(|(point, value)| IndicatorPoint {
            date: point.date,
            valid: true,
            value: IndicatorValue::Simple(value),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// The recursion over a raw value slice. MACD applies this to its own
/// line as well as to closes.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &value) in values.iter().enumerate() {
        ema = if i == 0 {
            value
        } else {
            alpha * value + (1.0 - alpha) * ema
        };
        out.push(ema);
    }

    out
}
