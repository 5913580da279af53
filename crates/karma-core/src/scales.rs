//! Strength classifier shared by every score-bearing view.
//!
//! Scores are normalized to [0, 1]. Each score falls in one bucket:
//! - boss:    >= 0.70
//! - steady:  >= 0.55
//! - boost:   >= 0.40
//! - support: below 0.40
//!
//! Non-finite scores (NaN, infinities) land in `Unknown` instead of being
//! silently coerced to zero.

use serde::{Deserialize, Serialize};

/// Lower bounds (inclusive) of the upper three buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub boss: f64,
    pub steady: f64,
    pub boost: f64,
}

pub const THRESHOLDS: Thresholds = Thresholds {
    boss: 0.70,
    steady: 0.55,
    boost: 0.40,
};

/// Strength bucket for a normalized score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBucket {
    /// Very strong
    Boss,
    /// Average to good
    Steady,
    /// Weak
    Boost,
    /// Very weak
    Support,
    /// Score was not a finite number
    Unknown,
}

impl ScoreBucket {
    /// Human label shown next to a score.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBucket::Boss => "Very strong • Boss Mode",
            ScoreBucket::Steady => "Average to good • Holding Steady",
            ScoreBucket::Boost => "Weak • Needs a Boost",
            ScoreBucket::Support => "Very weak • Needs Support",
            ScoreBucket::Unknown => "Unknown • No score",
        }
    }

    /// Palette name used for badges (border + background + text).
    pub fn badge_class(&self) -> &'static str {
        match self {
            ScoreBucket::Boss => "emerald",
            ScoreBucket::Steady => "violet",
            ScoreBucket::Boost => "amber",
            ScoreBucket::Support => "rose",
            ScoreBucket::Unknown => "slate",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBucket::Boss => "boss",
            ScoreBucket::Steady => "steady",
            ScoreBucket::Boost => "boost",
            ScoreBucket::Support => "support",
            ScoreBucket::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ScoreBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a score. Finite values are clamped to [0, 1] first.
pub fn bucket(score: f64) -> ScoreBucket {
    if !score.is_finite() {
        return ScoreBucket::Unknown;
    }
    let v = score.clamp(0.0, 1.0);
    if v >= THRESHOLDS.boss {
        ScoreBucket::Boss
    } else if v >= THRESHOLDS.steady {
        ScoreBucket::Steady
    } else if v >= THRESHOLDS.boost {
        ScoreBucket::Boost
    } else {
        ScoreBucket::Support
    }
}

pub fn label(score: f64) -> &'static str {
    bucket(score).label()
}

pub fn badge_class(score: f64) -> &'static str {
    bucket(score).badge_class()
}

pub fn is_boss(score: f64) -> bool {
    bucket(score) == ScoreBucket::Boss
}

/// Weak means the lowest bucket; unknown scores are never weak.
pub fn is_weak(score: f64) -> bool {
    bucket(score) == ScoreBucket::Support
}
