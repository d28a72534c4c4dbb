//! Strategic insights produced by the strategist.

use serde::{Deserialize, Serialize};

use super::signal::normalize_tag;

/// How quickly the user should act on an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Self::Medium
    }
}

/// Whether a competitor move is good, bad, or indifferent for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Opportunity,
    Threat,
    Neutral,
}

impl Outlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opportunity => "opportunity",
            Self::Threat => "threat",
            Self::Neutral => "neutral",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "opportunity" => Some(Self::Opportunity),
            "threat" => Some(Self::Threat),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl Default for Outlook {
    fn default() -> Self {
        Self::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "immediate" => Some(Self::Immediate),
            "short_term" => Some(Self::ShortTerm),
            "long_term" => Some(Self::LongTerm),
            _ => None,
        }
    }
}

impl Default for TimeHorizon {
    fn default() -> Self {
        Self::ShortTerm
    }
}

/// A product-specific reading of one classified signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicInsight {
    /// References a `ClassifiedSignal` of the same run.
    pub signal_id: String,
    pub competitor_name: String,
    pub what_happened: String,
    pub strategic_implication: String,
    pub impact_on_user: String,
    pub recommended_action: String,
    pub urgency: Urgency,
    #[serde(rename = "opportunity_or_threat")]
    pub outlook: Outlook,
    pub time_horizon: TimeHorizon,
}
