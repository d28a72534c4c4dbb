//! Execution trace of a single pipeline run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::digest::FinalDigest;
use super::insight::StrategicInsight;
use super::quality::QualityJudgment;
use super::review::{InsightContradiction, RedTeamChallenge, ScenarioPrediction, VerificationResult};
use super::signal::ClassifiedSignal;
use super::usage::AgentUsage;
use crate::domain::errors::{DomainError, DomainResult};

/// Pipeline states, in declared dependency order.
///
/// The four reviewer stages share a dependency level and carry no order
/// between themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Started,
    Classified,
    Strategized,
    RedTeamed,
    ScenariosGenerated,
    Verified,
    ContradictionsChecked,
    QualityJudged,
    Completed,
}

impl PipelineStage {
    pub const ALL: [Self; 9] = [
        Self::Started,
        Self::Classified,
        Self::Strategized,
        Self::RedTeamed,
        Self::ScenariosGenerated,
        Self::Verified,
        Self::ContradictionsChecked,
        Self::QualityJudged,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Classified => "classified",
            Self::Strategized => "strategized",
            Self::RedTeamed => "red_teamed",
            Self::ScenariosGenerated => "scenarios_generated",
            Self::Verified => "verified",
            Self::ContradictionsChecked => "contradictions_checked",
            Self::QualityJudged => "quality_judged",
            Self::Completed => "completed",
        }
    }

    /// Dependency level; stages on the same level may complete in any order.
    pub fn level(&self) -> u8 {
        match self {
            Self::Started => 0,
            Self::Classified => 1,
            Self::Strategized => 2,
            Self::RedTeamed
            | Self::ScenariosGenerated
            | Self::Verified
            | Self::ContradictionsChecked => 3,
            Self::QualityJudged => 4,
            Self::Completed => 5,
        }
    }
}

/// Completion time of every stage. Only constructible with all nine populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimestamps {
    pub started_at: DateTime<Utc>,
    pub classified_at: DateTime<Utc>,
    pub strategized_at: DateTime<Utc>,
    pub red_teamed_at: DateTime<Utc>,
    pub scenarios_generated_at: DateTime<Utc>,
    pub verified_at: DateTime<Utc>,
    pub contradictions_checked_at: DateTime<Utc>,
    pub quality_judged_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl StageTimestamps {
    pub fn get(&self, stage: PipelineStage) -> DateTime<Utc> {
        match stage {
            PipelineStage::Started => self.started_at,
            PipelineStage::Classified => self.classified_at,
            PipelineStage::Strategized => self.strategized_at,
            PipelineStage::RedTeamed => self.red_teamed_at,
            PipelineStage::ScenariosGenerated => self.scenarios_generated_at,
            PipelineStage::Verified => self.verified_at,
            PipelineStage::ContradictionsChecked => self.contradictions_checked_at,
            PipelineStage::QualityJudged => self.quality_judged_at,
            PipelineStage::Completed => self.completed_at,
        }
    }

    /// Whether every stage completed no earlier than each stage on a lower level.
    pub fn respects_dependency_order(&self) -> bool {
        PipelineStage::ALL.iter().all(|later| {
            PipelineStage::ALL
                .iter()
                .filter(|earlier| earlier.level() < later.level())
                .all(|earlier| self.get(*earlier) <= self.get(*later))
        })
    }

    pub fn total_duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}

/// Collects stage completion times while a run is in flight.
#[derive(Debug, Clone, Default)]
pub struct StageClock {
    marks: BTreeMap<PipelineStage, DateTime<Utc>>,
}

impl StageClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, stage: PipelineStage) -> DateTime<Utc> {
        let now = Utc::now();
        self.marks.insert(stage, now);
        now
    }

    pub fn mark_at(&mut self, stage: PipelineStage, at: DateTime<Utc>) {
        self.marks.insert(stage, at);
    }

    /// Freeze the clock; fails if any stage was never marked.
    pub fn finish(&self) -> DomainResult<StageTimestamps> {
        let at = |stage: PipelineStage| {
            self.marks
                .get(&stage)
                .copied()
                .ok_or(DomainError::IncompleteTrace(stage.as_str()))
        };

        Ok(StageTimestamps {
            started_at: at(PipelineStage::Started)?,
            classified_at: at(PipelineStage::Classified)?,
            strategized_at: at(PipelineStage::Strategized)?,
            red_teamed_at: at(PipelineStage::RedTeamed)?,
            scenarios_generated_at: at(PipelineStage::ScenariosGenerated)?,
            verified_at: at(PipelineStage::Verified)?,
            contradictions_checked_at: at(PipelineStage::ContradictionsChecked)?,
            quality_judged_at: at(PipelineStage::QualityJudged)?,
            completed_at: at(PipelineStage::Completed)?,
        })
    }
}

/// Full record of one run: every stage's output plus the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTrace {
    pub run_id: String,
    pub timestamps: StageTimestamps,
    pub classified_signals: Vec<ClassifiedSignal>,
    pub strategist_insights: Vec<StrategicInsight>,
    pub red_team_challenges: Vec<RedTeamChallenge>,
    pub scenario_prediction: ScenarioPrediction,
    pub verification_results: Vec<VerificationResult>,
    pub contradictions: Vec<InsightContradiction>,
    pub quality_judgment: QualityJudgment,
    pub final_digest: FinalDigest,
    /// Keyed by agent name.
    pub usage: BTreeMap<String, AgentUsage>,
}

impl PipelineTrace {
    pub fn total_tokens(&self) -> u64 {
        self.usage.values().map(AgentUsage::total_tokens).sum()
    }
}
