//! Rolling standard deviation indicator.
//!
//! Sample standard deviation (divides by n-1) over the same trailing
//! window as the SMA. The sample convention matches the spreadsheet and
//! statistics-library default used by the data this tool reproduces;
//! callers wanting population std must scale themselves.
//! Warmup: first (n-1) points are invalid. A window of 1 has no sample
//! variance, so period < 2 yields an all-invalid series.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::PriceSeries;

pub fn calculate_stddev(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();

    if period < 2 || period > points.len() {
        return IndicatorSeries::all_invalid(
            IndicatorType::Stddev(period),
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

            let mean: f64 = window.iter().map(|p| p.close).sum::<f64>() / period as f64;
            let sum_sq: f64 = window
                .iter()
                .map(|p| {
                    let diff = p.close - mean;
                    diff * diff
                })
                .sum();

            (sum_sq / (period - 1) as f64).sqrt()
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
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PricePoint::close_only(
                    NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    close,
                )
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
    fn stddev_warmup() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let std = calculate_stddev(&series, 3);

        assert!(!std.values[0].valid);
        assert!(!std.values[1].valid);
        assert!(std.values[2].valid);
        assert!(std.values[4].valid);
    }

    #[test]
    fn stddev_sample_convention() {
        // Sample std of [10, 20, 30]: mean 20, squared diffs 100+0+100,
        // divided by n-1 = 2 -> sqrt(100) = 10.
        let series = make_series(&[10.0, 20.0, 30.0]);
        let std = calculate_stddev(&series, 3);

        assert!(std.values[2].valid);
        assert!((simple(&std.values[2]) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn stddev_constant_values() {
        let series = make_series(&[100.0, 100.0, 100.0, 100.0]);
        let std = calculate_stddev(&series, 3);

        assert!(std.values[3].valid);
        assert!((simple(&std.values[3]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_period_1_all_invalid() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let std = calculate_stddev(&series, 1);

        assert_eq!(std.values.len(), 3);
        assert!(std.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn stddev_period_longer_than_series_all_invalid() {
        let series = make_series(&[10.0, 20.0]);
        let std = calculate_stddev(&series, 5);

        assert_eq!(std.values.len(), 2);
        assert!(std.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn stddev_indicator_type() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        assert_eq!(
            calculate_stddev(&series, 3).indicator_type,
            IndicatorType::Stddev(3)
        );
    }
}
