//! Daily price series types.
//!
//! `PriceSeries` is the engine's only input shape: one symbol, one ordered
//! run of daily points. Ordering (strictly increasing dates, finite closes)
//! is checked once at construction so every downstream computation can
//! borrow the series read-only without revalidating.
//!
//! `SeriesFrame` is the tabular boundary used by ingestion code: named
//! numeric columns keyed by a date column. Turning a frame into a
//! `PriceSeries` requires resolving exactly one close column; zero or
//! several matches are shape errors, never a silent first-column pick.

use crate::domain::error::MarketPulseError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PricePoint {
    /// A point carrying only the close, the one field the engine requires.
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, validating the ordering invariant: strictly
    /// increasing dates (no duplicates) and finite closes.
    pub fn new(
        symbol: impl Into<String>,
        points: Vec<PricePoint>,
    ) -> Result<Self, MarketPulseError> {
        let symbol = symbol.into();

        for point in &points {
            if !point.close.is_finite() {
                return Err(MarketPulseError::Shape {
                    reason: format!("non-finite close for {} on {}", symbol, point.date),
                });
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(MarketPulseError::Shape {
                    reason: format!(
                        "dates must be strictly increasing: {} then {}",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// Tabular form of provider or file data before a close column has been
/// selected. Column count per row is fixed; values are f64 with NaN for
/// blank cells.
#[derive(Debug, Clone)]
pub struct SeriesFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl SeriesFrame {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, MarketPulseError> {
        for (name, values) in &columns {
            if values.len() != dates.len() {
                return Err(MarketPulseError::Shape {
                    reason: format!(
                        "column '{}' has {} values for {} dates",
                        name,
                        values.len(),
                        dates.len()
                    ),
                });
            }
        }
        Ok(Self { dates, columns })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn find_column(&self, name: &str) -> Result<Option<&[f64]>, MarketPulseError> {
        let mut found: Option<&[f64]> = None;
        for (label, values) in &self.columns {
            if label.trim().eq_ignore_ascii_case(name) {
                if found.is_some() {
                    return Err(MarketPulseError::Shape {
                        reason: format!("more than one column matches '{}'", name),
                    });
                }
                found = Some(values);
            }
        }
        Ok(found)
    }

    /// Resolve a column by name (case-insensitive, trimmed). Exactly one
    /// match is required; an ambiguous header set is a shape error.
    pub fn column(&self, name: &str) -> Result<&[f64], MarketPulseError> {
        self.find_column(name)?
            .ok_or_else(|| MarketPulseError::Shape {
                reason: format!("no column matches '{}'", name),
            })
    }

    /// Like [`column`](Self::column) but absent columns are `None`;
    /// ambiguity is still a shape error.
    pub fn optional_column(&self, name: &str) -> Result<Option<&[f64]>, MarketPulseError> {
        self.find_column(name)
    }

    /// Select the close column and build a `PriceSeries`, carrying along
    /// open/high/low/volume where those columns exist. NaN cells in the
    /// optional columns become `None`.
    pub fn close_series(&self, symbol: &str) -> Result<PriceSeries, MarketPulseError> {
        let closes = self.column("close")?;
        let opens = self.optional_column("open")?;
        let highs = self.optional_column("high")?;
        let lows = self.optional_column("low")?;
        let volumes = self.optional_column("volume")?;

        let cell = |col: Option<&[f64]>, i: usize| -> Option<f64> {
            col.map(|v| v[i]).filter(|v| v.is_finite())
        };

        let points = (0..self.dates.len())
            .map(|i| PricePoint {
                date: self.dates[i],
                open: cell(opens, i),
                high: cell(highs, i),
                low: cell(lows, i),
                close: closes[i],
                volume: cell(volumes, i),
            })
            .collect();

        PriceSeries::new(symbol, points)
    }
}
