//! CLI definition and dispatch.

use chrono::{Days, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{analyze, AnalysisReport, IndicatorParams};
use crate::domain::asset::{default_catalog, Asset};
use crate::domain::error::MarketPulseError;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::series::PriceSeries;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "marketpulse",
    about = "Technical analysis for crypto and equity markets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a series, compute indicators, and print the latest signals
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Lookback window in days, counted back from today
        #[arg(long, default_value_t = 365)]
        days: u64,
        #[arg(long)]
        sma_period: Option<usize>,
        #[arg(long)]
        bollinger_period: Option<usize>,
        #[arg(long)]
        rsi_period: Option<usize>,
        /// Write the full aligned indicator table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch a series and save the raw daily bars as CSV
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(long, default_value_t = 365)]
        days: u64,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the built-in asset catalog
    ListAssets,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();

    match cli.command {
        Command::Analyze {
            config,
            symbol,
            days,
            sma_period,
            bollinger_period,
            rsi_period,
            output,
        } => run_analyze(
            &config,
            &symbol,
            days,
            sma_period,
            bollinger_period,
            rsi_period,
            output.as_deref(),
        ),
        Command::Fetch {
            config,
            symbol,
            days,
            output,
        } => run_fetch(&config, &symbol, days, &output),
        Command::ListAssets => run_list_assets(),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MarketPulseError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Indicator parameters: defaults, overridden by the `[indicators]`
/// config section, overridden again by explicit CLI flags. Out-of-range
/// values are clamped to 0 and degrade to all-invalid output downstream
/// rather than failing the run.
pub fn build_params(
    config: &dyn ConfigPort,
    sma_period: Option<usize>,
    bollinger_period: Option<usize>,
    rsi_period: Option<usize>,
) -> IndicatorParams {
    let defaults = IndicatorParams::default();

    let period = |key: &str, default: usize| -> usize {
        let value = config.get_int("indicators", key, default as i64);
        usize::try_from(value).unwrap_or(0)
    };

    let mult = config.get_double(
        "indicators",
        "bollinger_mult",
        defaults.bollinger_mult_x100 as f64 / 100.0,
    );
    let bollinger_mult_x100 = if mult.is_finite() && mult >= 0.0 {
        (mult * 100.0).round() as u32
    } else {
        defaults.bollinger_mult_x100
    };

    IndicatorParams {
        sma_period: sma_period.unwrap_or_else(|| period("sma_period", defaults.sma_period)),
        bollinger_period: bollinger_period
            .unwrap_or_else(|| period("bollinger_period", defaults.bollinger_period)),
        bollinger_mult_x100,
        rsi_period: rsi_period.unwrap_or_else(|| period("rsi_period", defaults.rsi_period)),
        macd_fast: period("macd_fast", defaults.macd_fast),
        macd_slow: period("macd_slow", defaults.macd_slow),
        macd_signal: period("macd_signal", defaults.macd_signal),
    }
}

fn date_range(days: u64) -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN);
    (start, end)
}

fn fetch_series(
    config: &dyn ConfigPort,
    symbol: &str,
    days: u64,
) -> Result<(Asset, PriceSeries), MarketPulseError> {
    let port = crate::adapters::build_data_port(config)?;
    let asset = Asset::resolve(symbol);
    let (start, end) = date_range(days);

    eprintln!("Fetching {} from {} to {}...", asset.symbol, start, end);
    let series = port.fetch_daily(&asset, start, end)?;

    if series.is_empty() {
        return Err(MarketPulseError::NoData {
            symbol: asset.symbol.clone(),
        });
    }

    eprintln!("Fetched {} daily bars", series.len());
    Ok((asset, series))
}

fn run_analyze(
    config_path: &PathBuf,
    symbol: &str,
    days: u64,
    sma_period: Option<usize>,
    bollinger_period: Option<usize>,
    rsi_period: Option<usize>,
    output: Option<&std::path::Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let (asset, series) = match fetch_series(&config, symbol, days) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let params = build_params(&config, sma_period, bollinger_period, rsi_period);
    let report = analyze(&series, &params);

    print_report(&asset, &series, &report);

    if let Some(path) = output {
        if let Err(e) = csv_adapter::write_report(path, &series, &report) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_fetch(config_path: &PathBuf, symbol: &str, days: u64, output: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let (asset, series) = match fetch_series(&config, symbol, days) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = csv_adapter::write_series(output, &series) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Saved {} bars of {} to {}", series.len(), asset.symbol, output.display());
    ExitCode::SUCCESS
}

fn run_list_assets() -> ExitCode {
    println!("{:<10} {:<28} {}", "SYMBOL", "NAME", "KIND");
    for asset in default_catalog() {
        println!("{:<10} {:<28} {}", asset.symbol, asset.name, asset.kind);
    }
    ExitCode::SUCCESS
}

fn latest_valid(series: &IndicatorSeries) -> Option<&IndicatorValue> {
    series
        .values
        .iter()
        .rev()
        .find(|p| p.valid)
        .map(|p| &p.value)
}

fn print_report(asset: &Asset, series: &PriceSeries, report: &AnalysisReport) {
    let first = &series.points()[0];
    let last = &series.points()[series.len() - 1];

    println!("{} ({}) [{}]", asset.symbol, asset.name, asset.kind);
    println!(
        "{} bars, {} to {}, last close {:.2}",
        series.len(),
        first.date,
        last.date,
        last.close
    );
    println!();

    match latest_valid(&report.sma) {
        Some(IndicatorValue::Simple(v)) => {
            println!("{:<18} {:.2}", report.sma.indicator_type.to_string(), v)
        }
        _ => println!("{:<18} warming up", report.sma.indicator_type.to_string()),
    }

    match latest_valid(&report.bollinger) {
        Some(IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        }) => println!(
            "{:<18} lower {:.2} / middle {:.2} / upper {:.2}",
            report.bollinger.indicator_type.to_string(),
            lower,
            middle,
            upper
        ),
        _ => println!(
            "{:<18} warming up",
            report.bollinger.indicator_type.to_string()
        ),
    }

    match latest_valid(&report.rsi) {
        Some(IndicatorValue::Simple(v)) => {
            println!("{:<18} {:.2}", report.rsi.indicator_type.to_string(), v)
        }
        _ => println!("{:<18} warming up", report.rsi.indicator_type.to_string()),
    }

    match latest_valid(&report.macd) {
        Some(IndicatorValue::Macd { line, signal }) => println!(
            "{:<18} line {:.4}, signal {:.4}",
            report.macd.indicator_type.to_string(),
            line,
            signal
        ),
        _ => println!("{:<18} warming up", report.macd.indicator_type.to_string()),
    }

    println!();
    println!("Signals ({}):", last.date);
    for signal in &report.signals {
        println!("  {:<18} {}", signal.indicator.to_string(), signal.action);
    }
}
