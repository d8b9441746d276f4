//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::listing_csv::load_listings;
use crate::adapters::stdout_notifier::StdoutNotifier;
use crate::domain::config_validation::{validate_scan_config, validate_scan_sources};
use crate::domain::error::KabuError;
use crate::domain::report::{self, ReportOptions};
use crate::domain::scoring::{RoundingRule, ScoringConfig};
use crate::domain::screener::{self, FailurePolicy, ScanConfig, ScanReport};
use crate::domain::universe::{
    normalize_code, parse_codes, Universe, UniverseSource, DEFAULT_HOLDINGS,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::NotifyPort;

#[derive(Parser, Debug)]
#[command(
    name = "kabusignal",
    about = "Buy/sell signal screener for Tokyo Stock Exchange listings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every listing and post the buy/sell report
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Print the message instead of posting it
        #[arg(long)]
        dry_run: bool,
        /// Print the scan result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a single code and print its reasons
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Scan {
            config,
            dry_run,
            json,
        } => run_scan_command(&config, dry_run, json),
        Command::Score { config, code, json } => run_score_command(&config, &code, json),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, KabuError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> KabuError {
    KabuError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn get_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, KabuError> {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value).map_err(|_| invalid(section, key, "must be non-negative"))
}

pub fn build_scoring_config(config: &dyn ConfigPort) -> Result<ScoringConfig, KabuError> {
    let d = ScoringConfig::default();
    let p = &d.indicators;

    let rounding = config
        .get_string_or("scoring", "rounding", "half_even")
        .parse::<RoundingRule>()
        .map_err(|reason: String| invalid("scoring", "rounding", reason))?;

    let mut scoring = ScoringConfig {
        min_bars: get_usize(config, "scoring", "min_bars", d.min_bars)?,
        breakout_window: get_usize(config, "scoring", "breakout_window", d.breakout_window)?,
        rounding,
        market_bonus: config.get_int("scoring", "market_bonus", d.market_bonus),
        rsi_weak: config.get_double("scoring", "rsi_weak", d.rsi_weak),
        rsi_strong: config.get_double("scoring", "rsi_strong", d.rsi_strong),
        volume_scale: config.get_double("scoring", "volume_scale", d.volume_scale),
        volume_cap: config.get_double("scoring", "volume_cap", d.volume_cap),
        ..d.clone()
    };
    scoring.indicators.sma_short = get_usize(config, "scoring", "sma_short", p.sma_short)?;
    scoring.indicators.sma_long = get_usize(config, "scoring", "sma_long", p.sma_long)?;
    scoring.indicators.macd_fast = get_usize(config, "scoring", "macd_fast", p.macd_fast)?;
    scoring.indicators.macd_slow = get_usize(config, "scoring", "macd_slow", p.macd_slow)?;
    scoring.indicators.macd_signal = get_usize(config, "scoring", "macd_signal", p.macd_signal)?;
    scoring.indicators.rsi_period = get_usize(config, "scoring", "rsi_period", p.rsi_period)?;
    scoring.indicators.bb_period = get_usize(config, "scoring", "bb_period", p.bb_period)?;
    scoring.indicators.bb_mult = config.get_double("scoring", "bb_mult", p.bb_mult);
    Ok(scoring)
}

/// Typed and validated `[scoring]` + `[scan]` settings.
pub fn build_scan_config(config: &dyn ConfigPort) -> Result<ScanConfig, KabuError> {
    let d = ScanConfig::default();
    let failure_policy = config
        .get_string_or("scan", "failure_policy", "placeholder")
        .parse::<FailurePolicy>()
        .map_err(|reason: String| invalid("scan", "failure_policy", reason))?;

    let scan = ScanConfig {
        scoring: build_scoring_config(config)?,
        top_n: get_usize(config, "scan", "top_n", d.top_n)?,
        history_bars: get_usize(config, "scan", "history_bars", d.history_bars)?,
        failure_policy,
    };
    validate_scan_config(&scan)?;
    Ok(scan)
}

pub fn build_report_options(
    config: &dyn ConfigPort,
    scan: &ScanConfig,
) -> Result<ReportOptions, KabuError> {
    let d = ReportOptions::default();
    Ok(ReportOptions {
        max_reasons: get_usize(config, "report", "max_reasons", d.max_reasons)?,
        top_n: scan.top_n,
        ..d
    })
}

pub fn resolve_holdings(config: &dyn ConfigPort) -> Result<Vec<String>, KabuError> {
    let raw = config.get_string_or("scan", "holdings", DEFAULT_HOLDINGS);
    parse_codes(&raw).map_err(|e| invalid("scan", "holdings", e.to_string()))
}

pub fn universe_source(config: &dyn ConfigPort) -> Result<UniverseSource, KabuError> {
    config
        .get_string_or("scan", "universe", "listings")
        .parse::<UniverseSource>()
        .map_err(|reason: String| invalid("scan", "universe", reason))
}

/// The webhook URL, preferring the environment over `[slack] webhook_url`.
pub fn resolve_webhook_url(config: &dyn ConfigPort) -> Option<String> {
    std::env::var(crate::adapters::WEBHOOK_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            config
                .get_string("slack", "webhook_url")
                .filter(|v| !v.trim().is_empty())
        })
}

fn optional_path(config: &dyn ConfigPort, key: &str) -> Option<PathBuf> {
    config
        .get_string("scan", key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(v.trim()))
}

fn required_path(config: &dyn ConfigPort, key: &str) -> Result<PathBuf, KabuError> {
    optional_path(config, key).ok_or_else(|| KabuError::ConfigMissing {
        section: "scan".into(),
        key: key.into(),
    })
}

/// The codes to scan, from the listing file or from the price directory.
pub fn load_universe(
    config: &dyn ConfigPort,
    source: UniverseSource,
    data_port: &dyn DataPort,
) -> Result<Universe, KabuError> {
    match source {
        UniverseSource::Listings => load_listings(&required_path(config, "listings")?),
        UniverseSource::DataDir => {
            let names = match optional_path(config, "listings") {
                Some(path) => load_listings(&path)?,
                None => Universe::default(),
            };
            let codes = data_port.list_symbols()?;
            tracing::info!(count = codes.len(), "universe read from price directory");
            Ok(Universe::named_from(&codes, &names))
        }
    }
}

#[cfg(feature = "webhook")]
fn webhook_notifier(config: &dyn ConfigPort) -> Result<Box<dyn NotifyPort>, KabuError> {
    use crate::adapters::slack_webhook::SlackWebhookAdapter;

    let url = resolve_webhook_url(config).ok_or_else(|| KabuError::ConfigMissing {
        section: "slack".into(),
        key: "webhook_url".into(),
    })?;
    Ok(Box::new(SlackWebhookAdapter::new(url)?))
}

#[cfg(not(feature = "webhook"))]
fn webhook_notifier(_config: &dyn ConfigPort) -> Result<Box<dyn NotifyPort>, KabuError> {
    Err(KabuError::Notify {
        reason: "built without the webhook feature; use --dry-run".into(),
    })
}

/// Load, score, rank and deliver. Returns the report that was sent.
pub fn execute_scan(
    config: &dyn ConfigPort,
    notifier: &dyn NotifyPort,
) -> Result<ScanReport, KabuError> {
    let source = universe_source(config)?;
    validate_scan_sources(config, source)?;
    let scan = build_scan_config(config)?;
    let holdings = resolve_holdings(config)?;
    let options = build_report_options(config, &scan)?;

    let data_port = CsvAdapter::new(required_path(config, "data_dir")?);
    let universe = load_universe(config, source, &data_port)?;

    let report = screener::run_scan(&data_port, &universe, &holdings, &scan);
    let text = report::format_message(&report, &universe, &options);
    notifier.send(&text)?;
    Ok(report)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), KabuError> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Swallows the message; used when only the JSON result is wanted.
struct Discard;

impl NotifyPort for Discard {
    fn send(&self, _text: &str) -> Result<(), KabuError> {
        Ok(())
    }
}

fn run_scan_command(config_path: &Path, dry_run: bool, json: bool) -> Result<(), KabuError> {
    let adapter = load_config(config_path)?;

    let notifier: Box<dyn NotifyPort> = match (dry_run, json) {
        (true, true) => Box::new(Discard),
        (true, false) => Box::new(StdoutNotifier),
        (false, _) => webhook_notifier(&adapter)?,
    };

    let report = execute_scan(&adapter, notifier.as_ref())?;
    if json {
        print_json(&report)?;
    }
    Ok(())
}

fn run_score_command(config_path: &Path, code: &str, json: bool) -> Result<(), KabuError> {
    let adapter = load_config(config_path)?;
    let scan = build_scan_config(&adapter)?;
    let data_port = CsvAdapter::new(required_path(&adapter, "data_dir")?);

    let code = normalize_code(code);
    let result = screener::score_code(&data_port, &code, &scan)?;

    if json {
        return print_json(&result);
    }
    let mut out = std::io::stdout().lock();
    writeln!(out, "{} ▶ {}", result.code(), result.score())?;
    for reason in result.reason_tags() {
        writeln!(out, "  {}", reason)?;
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), KabuError> {
    let adapter = load_config(config_path)?;
    validate_scan_sources(&adapter, universe_source(&adapter)?)?;
    let scan = build_scan_config(&adapter)?;
    let holdings = resolve_holdings(&adapter)?;
    build_report_options(&adapter, &scan)?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "Configuration OK: min_bars={}, top_n={}, history_bars={}, holdings={}",
        scan.scoring.min_bars,
        scan.top_n,
        scan.history_bars,
        holdings.join(",")
    )?;
    if resolve_webhook_url(&adapter).is_none() {
        writeln!(out, "note: no webhook URL configured; scan requires --dry-run")?;
    }
    Ok(())
}
