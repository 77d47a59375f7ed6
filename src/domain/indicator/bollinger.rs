//! Bollinger Bands indicator.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier x StdDev)
//! - Lower: Middle - (multiplier x StdDev)
//!
//! StdDev is the sample standard deviation from [`super::stddev`], so a
//! band point is valid only where both the SMA and the std are (period
//! must be at least 2 and no longer than the series).
//!
//! Default parameters: period=20, multiplier=2.0 (stored x100 so the
//! parameter stays hashable in `IndicatorType`).

use crate::domain::indicator::{
    calculate_sma, calculate_stddev, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};
use crate::domain::series::PriceSeries;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    series: &PriceSeries,
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;

    let sma = calculate_sma(series, period);
    let std = calculate_stddev(series, period);

    let values = sma
        .values
        .iter()
        .zip(&std.values)
        .map(|(mid, sd)| {
            let valid = mid.valid && sd.valid;

            let (upper, middle, lower) = if valid {
                let middle = match mid.value {
                    IndicatorValue::Simple(v) => v,
                    _ => 0.0,
                };
                let stddev = match sd.value {
                    IndicatorValue::Simple(v) => v,
                    _ => 0.0,
                };
                (middle + mult * stddev, middle, middle - mult * stddev)
            } else {
                (0.0, 0.0, 0.0)
            };

            IndicatorPoint {
                date: mid.date,
                valid,
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

pub fn calculate_bollinger_default(series: &PriceSeries) -> IndicatorSeries {
    calculate_bollinger(series, DEFAULT_PERIOD, DEFAULT_STDDEV_MULT_X100)
}
