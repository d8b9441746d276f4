//! Score records and the reason tags attached to them.
//!
//! A reason is either a rule hit with its signed point delta (`GC+15`,
//! `Low-10`) or a failure marker. Failure markers carry a reserved prefix so
//! consumers can tell them apart mechanically: `ERR:` for scoring failures,
//! `LOAD:` for data-loading failures.

use serde::Serialize;
use std::fmt;

pub const SCORING_FAILURE_PREFIX: &str = "ERR:";
pub const LOAD_FAILURE_PREFIX: &str = "LOAD:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    GoldenCross,
    MacdCross,
    VolumeRise,
    OversoldRsi,
    BelowBollinger,
    HighBreakout,
    LowBreakdown,
    Market,
}

impl RuleKind {
    /// Evaluation order of the scoring rules.
    pub const ALL: [RuleKind; 8] = [
        RuleKind::GoldenCross,
        RuleKind::MacdCross,
        RuleKind::VolumeRise,
        RuleKind::OversoldRsi,
        RuleKind::BelowBollinger,
        RuleKind::HighBreakout,
        RuleKind::LowBreakdown,
        RuleKind::Market,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RuleKind::GoldenCross => "GC",
            RuleKind::MacdCross => "MACD",
            RuleKind::VolumeRise => "Vol",
            RuleKind::OversoldRsi => "RSI",
            RuleKind::BelowBollinger => "BB",
            RuleKind::HighBreakout => "High",
            RuleKind::LowBreakdown => "Low",
            RuleKind::Market => "Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringFailure {
    DataInsufficient,
    MalformedInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadFailure {
    NoData,
    SourceError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Reason {
    Rule { kind: RuleKind, points: i64 },
    ScoringFailed(ScoringFailure),
    LoadFailed(LoadFailure),
}

impl Reason {
    pub fn rule(kind: RuleKind, points: i64) -> Self {
        Reason::Rule { kind, points }
    }

    pub fn points(&self) -> i64 {
        match self {
            Reason::Rule { points, .. } => *points,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Reason::Rule { .. })
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Rule { kind, points } => write!(f, "{}{:+}", kind.tag(), points),
            Reason::ScoringFailed(kind) => {
                let name = match kind {
                    ScoringFailure::DataInsufficient => "DataInsufficient",
                    ScoringFailure::MalformedInput => "MalformedInput",
                };
                write!(f, "{SCORING_FAILURE_PREFIX}{name}")
            }
            Reason::LoadFailed(kind) => {
                let name = match kind {
                    LoadFailure::NoData => "NoData",
                    LoadFailure::SourceError => "SourceError",
                };
                write!(f, "{LOAD_FAILURE_PREFIX}{name}")
            }
        }
    }
}

impl From<Reason> for String {
    fn from(reason: Reason) -> Self {
        reason.to_string()
    }
}

/// Outcome of scoring one instrument.
///
/// The score is always the sum of the reasons' point deltas; the fields are
/// private so that relationship cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    code: String,
    score: i64,
    reasons: Vec<Reason>,
}

impl ScoreResult {
    pub fn from_reasons(code: impl Into<String>, reasons: Vec<Reason>) -> Self {
        let score = reasons.iter().map(Reason::points).sum();
        Self {
            code: code.into(),
            score,
            reasons,
        }
    }

    /// Zero-score record standing in for an instrument that could not be scored.
    pub fn placeholder(code: impl Into<String>, reason: Reason) -> Self {
        Self::from_reasons(code, vec![reason])
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    pub fn is_placeholder(&self) -> bool {
        self.reasons.iter().any(Reason::is_failure)
    }

    /// Points contributed by `kind`, if that rule fired.
    pub fn points_for(&self, kind: RuleKind) -> Option<i64> {
        self.reasons.iter().find_map(|r| match r {
            Reason::Rule { kind: k, points } if *k == kind => Some(*points),
            _ => None,
        })
    }

    pub fn reason_tags(&self) -> Vec<String> {
        self.reasons.iter().map(Reason::to_string).collect()
    }
}
