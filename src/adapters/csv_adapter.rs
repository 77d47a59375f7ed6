//! CSV file data adapter.
//!
//! Reads daily history from `{SYMBOL}_daily.csv` files (slashes in the
//! symbol mapped to underscores) with a `timestamp,open,high,low,close,
//! volume` layout, and writes the same layout back out for `fetch
//! --output`. Ingestion goes through [`SeriesFrame`], so a file with an
//! ambiguous close header is rejected as a shape error instead of being
//! silently narrowed to its first matching column.

use crate::domain::analysis::AnalysisReport;
use crate::domain::asset::Asset;
use crate::domain::error::MarketPulseError;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};
use crate::domain::series::{PriceSeries, SeriesFrame};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketPulseError> {
        let dir = config.get_string("csv", "data_dir").ok_or_else(|| {
            MarketPulseError::ConfigMissing {
                section: "csv".into(),
                key: "data_dir".into(),
            }
        })?;
        Ok(Self::new(PathBuf::from(dir)))
    }

    fn csv_path(&self, asset: &Asset) -> PathBuf {
        self.base_path.join(format!("{}_daily.csv", asset.file_stem()))
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, MarketPulseError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .map_err(|e| MarketPulseError::Csv {
            reason: format!("invalid date '{}': {}", text, e),
        })
}

fn parse_cell(text: &str) -> Result<f64, MarketPulseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(f64::NAN);
    }
    text.parse().map_err(|e| MarketPulseError::Csv {
        reason: format!("invalid value '{}': {}", text, e),
    })
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        asset: &Asset,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MarketPulseError> {
        let path = self.csv_path(asset);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| MarketPulseError::Csv {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| MarketPulseError::Csv {
                reason: format!("header error: {}", e),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let date_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("timestamp") || h.eq_ignore_ascii_case("date"))
            .ok_or_else(|| MarketPulseError::Csv {
                reason: format!("no timestamp column in {}", path.display()),
            })?;

        let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| MarketPulseError::Csv {
                reason: format!("parse error: {}", e),
            })?;

            let date_cell = record.get(date_idx).ok_or_else(|| MarketPulseError::Csv {
                reason: "missing timestamp cell".into(),
            })?;
            let date = parse_date(date_cell)?;
            if date < start_date || date > end_date {
                continue;
            }

            let mut cells = Vec::with_capacity(headers.len() - 1);
            for (i, _) in headers.iter().enumerate() {
                if i == date_idx {
                    continue;
                }
                cells.push(parse_cell(record.get(i).unwrap_or(""))?);
            }
            rows.push((date, cells));
        }

        rows.sort_by_key(|(date, _)| *date);

        let dates: Vec<NaiveDate> = rows.iter().map(|(date, _)| *date).collect();
        let columns: Vec<(String, Vec<f64>)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .enumerate()
            .map(|(ci, (_, name))| {
                let values: Vec<f64> = rows.iter().map(|(_, cells)| cells[ci]).collect();
                (name.clone(), values)
            })
            .collect();

        let frame = SeriesFrame::new(dates, columns)?;
        frame.close_series(&asset.symbol)
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn simple_cell(point: &IndicatorPoint) -> String {
    if !point.valid {
        return String::new();
    }
    match point.value {
        IndicatorValue::Simple(v) => v.to_string(),
        _ => String::new(),
    }
}

/// Write a raw series in the same layout `fetch_daily` reads.
pub fn write_series(path: &Path, series: &PriceSeries) -> Result<(), MarketPulseError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| MarketPulseError::Csv {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;

    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])
        .map_err(|e| MarketPulseError::Csv {
            reason: e.to_string(),
        })?;

    for point in series.points() {
        wtr.write_record([
            point.date.to_string(),
            optional(point.open),
            optional(point.high),
            optional(point.low),
            point.close.to_string(),
            optional(point.volume),
        ])
        .map_err(|e| MarketPulseError::Csv {
            reason: e.to_string(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write closes plus the computed indicator columns, aligned row by row.
/// Warm-up points become empty cells.
pub fn write_report(
    path: &Path,
    series: &PriceSeries,
    report: &AnalysisReport,
) -> Result<(), MarketPulseError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| MarketPulseError::Csv {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;

    wtr.write_record([
        "timestamp",
        "close",
        "sma",
        "bb_upper",
        "bb_middle",
        "bb_lower",
        "rsi",
        "macd",
        "macd_signal",
    ])
    .map_err(|e| MarketPulseError::Csv {
        reason: e.to_string(),
    })?;

    for (i, point) in series.points().iter().enumerate() {
        let (bb_upper, bb_middle, bb_lower) = match &report.bollinger.values[i] {
            p if p.valid => match p.value {
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                } => (upper.to_string(), middle.to_string(), lower.to_string()),
                _ => Default::default(),
            },
            _ => Default::default(),
        };

        let (macd_line, macd_signal) = match &report.macd.values[i] {
            p if p.valid => match p.value {
                IndicatorValue::Macd { line, signal } => {
                    (line.to_string(), signal.to_string())
                }
                _ => Default::default(),
            },
            _ => Default::default(),
        };

        wtr.write_record([
            point.date.to_string(),
            point.close.to_string(),
            simple_cell(&report.sma.values[i]),
            bb_upper,
            bb_middle,
            bb_lower,
            simple_cell(&report.rsi.values[i]),
            macd_line,
            macd_signal,
        ])
        .map_err(|e| MarketPulseError::Csv {
            reason: e.to_string(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
