//! Raw and classified competitor signals.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum strategic weight a signal needs before it may produce an insight.
pub const INSIGHT_WEIGHT_THRESHOLD: u8 = 4;

/// An atomic observation about a competitor, supplied by the ingestion subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignal {
    pub id: String,
    pub competitor_id: String,
    pub competitor_name: String,
    /// Channel the signal was observed on (website, job board, changelog, ...).
    pub source: String,
    /// Coarse type tag assigned at ingestion (pricing, hiring, launch, ...).
    pub signal_type: String,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// Strategic category of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    OffensiveMove,
    DefensiveMove,
    MarketExpansion,
    InternalShift,
    EcosystemPlay,
}

impl SignalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffensiveMove => "offensive_move",
            Self::DefensiveMove => "defensive_move",
            Self::MarketExpansion => "market_expansion",
            Self::InternalShift => "internal_shift",
            Self::EcosystemPlay => "ecosystem_play",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "offensive_move" => Some(Self::OffensiveMove),
            "defensive_move" => Some(Self::DefensiveMove),
            "market_expansion" => Some(Self::MarketExpansion),
            "internal_shift" => Some(Self::InternalShift),
            "ecosystem_play" => Some(Self::EcosystemPlay),
            _ => None,
        }
    }
}

impl Default for SignalCategory {
    fn default() -> Self {
        Self::InternalShift
    }
}

/// Whether a competitor's related signals show an accelerating pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Velocity {
    Accelerating,
    Steady,
    Decelerating,
}

impl Velocity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerating => "accelerating",
            Self::Steady => "steady",
            Self::Decelerating => "decelerating",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "accelerating" => Some(Self::Accelerating),
            "steady" => Some(Self::Steady),
            "decelerating" => Some(Self::Decelerating),
            _ => None,
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::Steady
    }
}

/// Classifier verdict attached to exactly one raw signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: SignalCategory,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    /// Integer in `[1, 10]`.
    pub strategic_weight: u8,
    pub velocity: Velocity,
    #[serde(default)]
    pub related_signal_ids: BTreeSet<String>,
}

impl Classification {
    pub const DEFAULT_CONFIDENCE: f64 = 0.5;
    pub const DEFAULT_WEIGHT: u8 = 5;

    /// Classification assigned to a signal the classifier did not return.
    pub fn fallback() -> Self {
        Self {
            category: SignalCategory::InternalShift,
            confidence: Self::DEFAULT_CONFIDENCE,
            reasoning: "Not classified by the model; default classification applied".to_string(),
            strategic_weight: Self::DEFAULT_WEIGHT,
            velocity: Velocity::Steady,
            related_signal_ids: BTreeSet::new(),
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::fallback()
    }
}

/// A raw signal with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSignal {
    #[serde(flatten)]
    pub signal: RawSignal,
    pub classification: Classification,
}

impl ClassifiedSignal {
    pub fn new(signal: RawSignal, classification: Classification) -> Self {
        Self {
            signal,
            classification,
        }
    }

    pub fn id(&self) -> &str {
        &self.signal.id
    }

    pub fn weight(&self) -> u8 {
        self.classification.strategic_weight
    }

    /// Whether this signal may be escalated to a strategic insight.
    pub fn is_insight_eligible(&self) -> bool {
        self.weight() >= INSIGHT_WEIGHT_THRESHOLD
    }
}

/// Lowercase and fold separators so `"Offensive-Move"` matches `offensive_move`.
pub(crate) fn normalize_tag(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}
