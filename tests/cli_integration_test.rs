//! CLI integration tests.
//!
//! Tests cover:
//! - Config parsing into typed scoring/scan/report settings
//! - Holdings and webhook resolution
//! - A full scan over CSV files on disk with a recording notifier
//! - `run` exit codes for validate, score and dry-run scan

mod common;

use common::*;
use kabusignal::adapters::file_config_adapter::FileConfigAdapter;
use kabusignal::adapters::WEBHOOK_ENV;
use kabusignal::cli::{self, Cli, Command};
use kabusignal::domain::error::KabuError;
use kabusignal::domain::scoring::RoundingRule;
use kabusignal::domain::screener::FailurePolicy;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

const FULL_INI: &str = r#"
[scoring]
min_bars = 40
sma_short = 5
sma_long = 25
macd_fast = 12
macd_slow = 26
macd_signal = 9
rsi_period = 14
bb_period = 20
bb_mult = 2.5
breakout_window = 10
market_bonus = 3
rounding = half_up
rsi_weak = 35
rsi_strong = 25
volume_scale = 20
volume_cap = 10

[scan]
data_dir = prices
listings = jpx_prime.csv
holdings = 2503, 72
top_n = 3
history_bars = 80
failure_policy = exclude

[report]
max_reasons = 2

[slack]
webhook_url = http://localhost:9/hook
"#;

fn write_csv(dir: &Path, code: &str, bars: &[OhlcvBar]) {
    let mut text = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        text.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{code}.csv")), text).unwrap();
}

/// Prices for three listings and one holding, plus a listing file and INI.
fn scan_fixture() -> (TempDir, tempfile::NamedTempFile) {
    let dir = TempDir::new().unwrap();
    let prices = dir.path().join("prices");
    fs::create_dir(&prices).unwrap();
    write_csv(&prices, "7203", &golden_cross_bars("7203"));
    write_csv(&prices, "8306", &flat_bars("8306", 40, 100.0));
    write_csv(&prices, "9984", &flat_bars("9984", 10, 100.0));
    write_csv(&prices, "2503", &breakdown_bars("2503"));

    let listings = dir.path().join("jpx_prime.csv");
    fs::write(
        &listings,
        "Code,Name\n7203,トヨタ自動車\n8306,三菱ＵＦＪ\n9984,ソフトバンクＧ\n",
    )
    .unwrap();

    let ini = write_temp_ini(&format!(
        "[scan]\ndata_dir = {}\nlistings = {}\nholdings = 2503\n",
        prices.display(),
        listings.display()
    ));
    (dir, ini)
}

mod config_loading {
    use super::*;

    #[test]
    fn build_scan_config_reads_every_key() {
        let adapter = FileConfigAdapter::from_string(FULL_INI).unwrap();
        let scan = cli::build_scan_config(&adapter).unwrap();

        assert_eq!(scan.scoring.min_bars, 40);
        assert_eq!(scan.scoring.breakout_window, 10);
        assert_eq!(scan.scoring.market_bonus, 3);
        assert_eq!(scan.scoring.rounding, RoundingRule::HalfUp);
        assert!((scan.scoring.indicators.bb_mult - 2.5).abs() < f64::EPSILON);
        assert!((scan.scoring.rsi_weak - 35.0).abs() < f64::EPSILON);
        assert!((scan.scoring.rsi_strong - 25.0).abs() < f64::EPSILON);
        assert!((scan.scoring.volume_scale - 20.0).abs() < f64::EPSILON);
        assert!((scan.scoring.volume_cap - 10.0).abs() < f64::EPSILON);
        assert_eq!(scan.top_n, 3);
        assert_eq!(scan.history_bars, 80);
        assert_eq!(scan.failure_policy, FailurePolicy::Exclude);

        let options = cli::build_report_options(&adapter, &scan).unwrap();
        assert_eq!(options.max_reasons, 2);
        assert_eq!(options.top_n, 3);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[scan]\n").unwrap();
        let scan = cli::build_scan_config(&adapter).unwrap();

        assert_eq!(scan.scoring.min_bars, 30);
        assert_eq!(scan.scoring.indicators.sma_long, 25);
        assert_eq!(scan.scoring.rounding, RoundingRule::HalfEven);
        assert_eq!(scan.top_n, 5);
        assert_eq!(scan.history_bars, 64);
        assert_eq!(scan.failure_policy, FailurePolicy::Placeholder);
    }

    #[test]
    fn unknown_rounding_is_invalid() {
        let adapter = FileConfigAdapter::from_string("[scoring]\nrounding = nearest\n").unwrap();
        let err = cli::build_scan_config(&adapter).unwrap_err();
        assert!(matches!(err, KabuError::ConfigInvalid { key, .. } if key == "rounding"));
    }

    #[test]
    fn unknown_failure_policy_is_invalid() {
        let adapter = FileConfigAdapter::from_string("[scan]\nfailure_policy = drop\n").unwrap();
        let err = cli::build_scan_config(&adapter).unwrap_err();
        assert!(matches!(err, KabuError::ConfigInvalid { key, .. } if key == "failure_policy"));
    }

    #[test]
    fn inconsistent_windows_are_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[scoring]\nsma_short = 30\nsma_long = 20\n").unwrap();
        let err = cli::build_scan_config(&adapter).unwrap_err();
        assert!(matches!(err, KabuError::ConfigInvalid { key, .. } if key == "sma_short"));
    }

    #[test]
    fn holdings_are_normalized() {
        let adapter = FileConfigAdapter::from_string(FULL_INI).unwrap();
        assert_eq!(cli::resolve_holdings(&adapter).unwrap(), vec!["2503", "0072"]);
    }

    #[test]
    fn holdings_default_list() {
        let adapter = FileConfigAdapter::from_string("[scan]\n").unwrap();
        assert_eq!(
            cli::resolve_holdings(&adapter).unwrap(),
            vec!["2503", "4661", "5411", "8233", "8304"]
        );
    }

    #[test]
    fn webhook_url_from_config() {
        if std::env::var(WEBHOOK_ENV).is_ok() {
            return;
        }
        let adapter = FileConfigAdapter::from_string(FULL_INI).unwrap();
        assert_eq!(
            cli::resolve_webhook_url(&adapter),
            Some("http://localhost:9/hook".to_string())
        );
        let empty = FileConfigAdapter::from_string("[slack]\nwebhook_url =\n").unwrap();
        assert_eq!(cli::resolve_webhook_url(&empty), None);
    }
}

mod scan_end_to_end {
    use super::*;

    #[test]
    fn execute_scan_sends_formatted_report() {
        let (_dir, ini) = scan_fixture();
        let adapter = FileConfigAdapter::from_file(ini.path()).unwrap();
        let notifier = RecordingNotifier::new();

        let report = cli::execute_scan(&adapter, &notifier).unwrap();

        assert_eq!(codes(&report.buy), vec!["7203", "8306", "9984"]);
        assert_eq!(codes(&report.sell), vec!["2503"]);

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        let text = &sent[0];
        assert!(text.starts_with("📈【買い候補 TOP5】("));
        assert!(text.contains("1. 7203 トヨタ自動車 ▶ 25"));
        assert!(text.contains("ゴールデンクロス（15）｜7日高値更新（5）｜市場加点（5）"));
        assert!(text.contains("3. 9984 ソフトバンクＧ ▶ 0\n   └ ERR:DataInsufficient"));
        assert!(text.contains("📉【売却候補（保有銘柄）】\n1. 2503 ▶ -5"));
    }

    #[test]
    fn data_dir_universe_scans_every_price_file() {
        let (dir, _ini) = scan_fixture();
        let ini = format!(
            "[scan]\ndata_dir = {}\nlistings = {}\nuniverse = data_dir\nholdings = 2503\n",
            dir.path().join("prices").display(),
            dir.path().join("jpx_prime.csv").display()
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let notifier = RecordingNotifier::new();

        let report = cli::execute_scan(&adapter, &notifier).unwrap();

        assert_eq!(codes(&report.buy), vec!["7203", "8306", "2503", "9984"]);
        assert_eq!(codes(&report.sell), vec!["2503"]);
        let sent = notifier.sent.borrow();
        assert!(sent[0].contains("1. 7203 トヨタ自動車 ▶ 25"));
        assert!(sent[0].contains("3. 2503 ▶ -5"));
    }

    #[test]
    fn data_dir_universe_without_listing_file() {
        let (dir, _ini) = scan_fixture();
        let ini = format!(
            "[scan]\ndata_dir = {}\nuniverse = data_dir\n",
            dir.path().join("prices").display()
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();

        let report = cli::execute_scan(&adapter, &RecordingNotifier::new()).unwrap();
        assert_eq!(report.buy.len(), 4);
        assert_eq!(report.buy[0].code(), "7203");
    }

    #[test]
    fn unknown_universe_source_is_invalid() {
        let adapter = FileConfigAdapter::from_string("[scan]\nuniverse = everything\n").unwrap();
        let err = cli::universe_source(&adapter).unwrap_err();
        assert!(matches!(err, KabuError::ConfigInvalid { key, .. } if key == "universe"));
    }

    #[test]
    fn execute_scan_requires_sources() {
        let adapter = FileConfigAdapter::from_string("[scan]\ndata_dir = prices\n").unwrap();
        let err = cli::execute_scan(&adapter, &RecordingNotifier::new()).unwrap_err();
        assert!(matches!(err, KabuError::ConfigMissing { key, .. } if key == "listings"));
    }

    #[test]
    fn missing_listing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let ini = format!(
            "[scan]\ndata_dir = {}\nlistings = {}\n",
            dir.path().display(),
            dir.path().join("absent.csv").display()
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let err = cli::execute_scan(&adapter, &RecordingNotifier::new()).unwrap_err();
        assert!(matches!(err, KabuError::DataSource { .. }));
    }
}

mod run_exit_codes {
    use super::*;

    #[test]
    fn validate_succeeds_for_valid_config() {
        let (_dir, ini) = scan_fixture();
        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn validate_fails_for_invalid_config() {
        let ini = write_temp_ini("[scan]\ndata_dir = a\nlistings = b\ntop_n = 0\n");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::from(2)));
    }

    #[test]
    fn missing_config_file_fails() {
        let code = cli::run(Cli {
            command: Command::Validate {
                config: "/nonexistent/kabusignal.ini".into(),
            },
        });
        assert!(!is_success(code));
    }

    #[test]
    fn dry_run_scan_succeeds() {
        let (_dir, ini) = scan_fixture();
        let code = cli::run(Cli {
            command: Command::Scan {
                config: ini.path().to_path_buf(),
                dry_run: true,
                json: false,
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn score_short_history_exits_with_insufficient_data() {
        let (_dir, ini) = scan_fixture();
        let code = cli::run(Cli {
            command: Command::Score {
                config: ini.path().to_path_buf(),
                code: "9984".into(),
                json: false,
            },
        });
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::from(5)));
    }

    #[test]
    fn score_known_code_succeeds() {
        let (_dir, ini) = scan_fixture();
        let code = cli::run(Cli {
            command: Command::Score {
                config: ini.path().to_path_buf(),
                code: "7203".into(),
                json: true,
            },
        });
        assert!(is_success(code));
    }
}
