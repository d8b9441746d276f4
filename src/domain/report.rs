//! Plain-text scan report for chat delivery.
//!
//! ```text
//! 📈【買い候補 TOP5】(10/16 15:30)
//! 1. 7203 トヨタ自動車 ▶ 25
//!    └ ゴールデンクロス（15）｜7日高値更新（5）｜市場加点（5）
//!
//! 📉【売却候補（保有銘柄）】
//! 該当なし
//! ```

use crate::domain::reason::{Reason, RuleKind, ScoreResult};
use crate::domain::screener::ScanReport;
use crate::domain::universe::Universe;
use chrono::{FixedOffset, Offset, Utc};
use std::fmt::Write;

/// Tokyo is UTC+9 with no daylight saving.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;
/// 0 shows every reason.
pub const DEFAULT_MAX_REASONS: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLabels {
    pub buy_heading: String,
    pub sell_heading: String,
    pub none: String,
    pub golden_cross: String,
    pub macd_cross: String,
    pub volume_rise: String,
    pub oversold_rsi: String,
    pub below_bollinger: String,
    pub high_breakout: String,
    pub low_breakdown: String,
    pub market: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            buy_heading: "📈【買い候補 TOP{n}】".into(),
            sell_heading: "📉【売却候補（保有銘柄）】".into(),
            none: "該当なし".into(),
            golden_cross: "ゴールデンクロス".into(),
            macd_cross: "MACD".into(),
            volume_rise: "出来高".into(),
            oversold_rsi: "RSI".into(),
            below_bollinger: "BB下限割れ".into(),
            high_breakout: "7日高値更新".into(),
            low_breakdown: "7日安値割れ".into(),
            market: "市場加点".into(),
        }
    }
}

impl ReportLabels {
    pub fn rule_label(&self, kind: RuleKind) -> &str {
        match kind {
            RuleKind::GoldenCross => &self.golden_cross,
            RuleKind::MacdCross => &self.macd_cross,
            RuleKind::VolumeRise => &self.volume_rise,
            RuleKind::OversoldRsi => &self.oversold_rsi,
            RuleKind::BelowBollinger => &self.below_bollinger,
            RuleKind::HighBreakout => &self.high_breakout,
            RuleKind::LowBreakdown => &self.low_breakdown,
            RuleKind::Market => &self.market,
        }
    }

    /// `label（pts）` for rule hits; failure markers are shown verbatim.
    pub fn render_reason(&self, reason: &Reason) -> String {
        match reason {
            Reason::Rule { kind, points } => format!("{}（{}）", self.rule_label(*kind), points),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub labels: ReportLabels,
    pub max_reasons: usize,
    pub top_n: usize,
    pub utc_offset_secs: i32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            labels: ReportLabels::default(),
            max_reasons: DEFAULT_MAX_REASONS,
            top_n: crate::domain::screener::DEFAULT_TOP_N,
            utc_offset_secs: JST_OFFSET_SECS,
        }
    }
}

fn write_entry(
    out: &mut String,
    rank: usize,
    result: &ScoreResult,
    universe: &Universe,
    options: &ReportOptions,
) {
    let label = match universe.name_of(result.code()) {
        Some(name) => format!("{} {}", result.code(), name),
        None => result.code().to_string(),
    };
    let _ = writeln!(out, "{}. {} ▶ {}", rank, label, result.score());
    let reasons: Vec<String> = result
        .reasons()
        .iter()
        .take(match options.max_reasons {
            0 => usize::MAX,
            n => n,
        })
        .map(|r| options.labels.render_reason(r))
        .collect();
    if !reasons.is_empty() {
        let _ = writeln!(out, "   └ {}", reasons.join("｜"));
    }
}

pub fn format_message(report: &ScanReport, universe: &Universe, options: &ReportOptions) -> String {
    let offset = FixedOffset::east_opt(options.utc_offset_secs).unwrap_or_else(|| Utc.fix());
    let stamp = report.generated_at.with_timezone(&offset).format("%m/%d %H:%M");
    let heading = options
        .labels
        .buy_heading
        .replace("{n}", &options.top_n.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{}({})", heading, stamp);
    if report.buy.is_empty() {
        let _ = writeln!(out, "{}", options.labels.none);
    }
    for (i, result) in report.buy.iter().enumerate() {
        write_entry(&mut out, i + 1, result, universe, options);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", options.labels.sell_heading);
    if report.sell.is_empty() {
        out.push_str(&options.labels.none);
    }
    for (i, result) in report.sell.iter().enumerate() {
        write_entry(&mut out, i + 1, result, universe, options);
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reason::{LoadFailure, Reason};
    use crate::domain::universe::Listing;
    use chrono::TimeZone;

    fn report(buy: Vec<ScoreResult>, sell: Vec<ScoreResult>) -> ScanReport {
        ScanReport {
            generated_at: Utc.with_ymd_and_hms(2024, 10, 16, 6, 30, 0).unwrap(),
            buy,
            sell,
            scored: 0,
            failed: 0,
        }
    }

    fn universe() -> Universe {
        Universe::new(vec![
            Listing::new("7203", Some("トヨタ自動車")),
            Listing::new("2503", Some("キリンＨＤ")),
        ])
    }

    #[test]
    fn renders_buy_and_empty_sell() {
        let buy = vec![ScoreResult::from_reasons(
            "7203",
            vec![
                Reason::rule(RuleKind::GoldenCross, 15),
                Reason::rule(RuleKind::HighBreakout, 5),
                Reason::rule(RuleKind::Market, 5),
            ],
        )];
        let text = format_message(&report(buy, vec![]), &universe(), &ReportOptions::default());
        assert_eq!(
            text,
            "📈【買い候補 TOP5】(10/16 15:30)\n\
             1. 7203 トヨタ自動車 ▶ 25\n   \
             └ ゴールデンクロス（15）｜7日高値更新（5）｜市場加点（5）\n\
             \n\
             📉【売却候補（保有銘柄）】\n\
             該当なし"
        );
    }

    #[test]
    fn shows_every_reason_by_default() {
        let sell = vec![ScoreResult::from_reasons(
            "2503",
            vec![
                Reason::rule(RuleKind::VolumeRise, 2),
                Reason::rule(RuleKind::OversoldRsi, 5),
                Reason::rule(RuleKind::BelowBollinger, 1),
                Reason::rule(RuleKind::LowBreakdown, -10),
                Reason::rule(RuleKind::Market, 5),
            ],
        )];
        let text = format_message(&report(vec![], sell), &universe(), &ReportOptions::default());
        assert!(text.contains("1. 2503 キリンＨＤ ▶ 3"));
        assert!(text.contains(
            "出来高（2）｜RSI（5）｜BB下限割れ（1）｜7日安値割れ（-10）｜市場加点（5）"
        ));
    }

    #[test]
    fn limits_reasons_and_shows_sells() {
        let sell = vec![ScoreResult::from_reasons(
            "2503",
            vec![
                Reason::rule(RuleKind::VolumeRise, 2),
                Reason::rule(RuleKind::OversoldRsi, 5),
                Reason::rule(RuleKind::BelowBollinger, 1),
                Reason::rule(RuleKind::LowBreakdown, -10),
                Reason::rule(RuleKind::Market, 1),
            ],
        )];
        let options = ReportOptions {
            max_reasons: 3,
            ..ReportOptions::default()
        };
        let text = format_message(&report(vec![], sell), &universe(), &options);
        assert!(text.contains("1. 2503 キリンＨＤ ▶ -1"));
        assert!(text.contains("出来高（2）｜RSI（5）｜BB下限割れ（1）"));
        assert!(!text.contains("7日安値割れ"));
    }

    #[test]
    fn unknown_name_and_failure_reason() {
        let buy = vec![ScoreResult::placeholder(
            "9999",
            Reason::LoadFailed(LoadFailure::NoData),
        )];
        let text = format_message(&report(buy, vec![]), &universe(), &ReportOptions::default());
        assert!(text.contains("1. 9999 ▶ 0\n   └ LOAD:NoData"));
    }

    #[test]
    fn custom_labels_and_offset() {
        let options = ReportOptions {
            labels: ReportLabels {
                buy_heading: "Top {n} buys".into(),
                none: "none".into(),
                ..ReportLabels::default()
            },
            top_n: 3,
            utc_offset_secs: 0,
            ..ReportOptions::default()
        };
        let text = format_message(&report(vec![], vec![]), &universe(), &options);
        assert!(text.starts_with("Top 3 buys(10/16 06:30)\nnone\n"));
        assert!(text.ends_with("none"));
    }
}
