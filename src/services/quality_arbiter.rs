//! Quality arbiter: scores every insight in light of all four reviews and
//! writes the executive summary.

use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, QualityJudgment, StrategicInsight, UserProduct};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::system_message;
use crate::services::reviewers::ReviewOutcome;
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const ROLE: &str = "You are the editor of a weekly competitive-intelligence digest. You decide \
                    which insights are specific, actionable and well evidenced enough to ship.";

/// Grade reported when the arbiter gave none.
pub const DEFAULT_GRADE: &str = "N/A";
/// Summary used when the run produced no insights to judge.
pub const NO_INSIGHTS_SUMMARY: &str = "No competitor activity this period warranted action.";
/// Summary used when the arbiter judged insights but wrote no summary.
pub const MISSING_SUMMARY: &str = "Executive summary unavailable for this run.";

pub struct QualityArbiter {
    client: GenerationClient,
    params: AgentParams,
}

impl QualityArbiter {
    pub const AGENT: &'static str = "quality_arbiter";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    #[instrument(skip_all, fields(agent = "quality_arbiter", insights = insights.len()))]
    pub async fn judge(
        &self,
        ctx: &RunContext,
        product: &UserProduct,
        insights: &[StrategicInsight],
        reviews: &ReviewOutcome,
    ) -> DomainResult<QualityJudgment> {
        if insights.is_empty() {
            debug!("no insights to judge; skipping arbiter call");
            return Ok(QualityJudgment {
                scores: Vec::new(),
                executive_summary: NO_INSIGHTS_SUMMARY.to_string(),
                quality_grade: DEFAULT_GRADE.to_string(),
            });
        }

        let dossier = json!({
            "insights": insights,
            "red_team_challenges": reviews.red_team_challenges,
            "scenario_prediction": reviews.scenario_prediction,
            "verification_results": reviews.verification_results,
            "contradictions": reviews.contradictions,
        });
        let prompt = format!(
            "Judge every insight using the reviews attached to it. Return a JSON object with:\n\
             - scores: list with, per insight, signal_id, specificity, actionability, evidence and \
               overall_score (each an integer 1 to 10), include_in_digest (true or false) and revision_note\n\
             - executive_summary: three to five sentences for a busy founder\n\
             - quality_grade: a letter grade A to F for the run as a whole\n\
             Exclude insights that are vague, unsupported or overturned by the red team.\n\n\
             Material:\n{}",
            serde_json::to_string_pretty(&dossier)?
        );
        let messages = vec![system_message(ROLE, product), ChatMessage::user(prompt)];

        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let ids: HashSet<&str> = insights.iter().map(|i| i.signal_id.as_str()).collect();
        let mut seen = HashSet::new();
        let scores: Vec<_> = sanitize::items(&root, "scores")
            .iter()
            .filter_map(sanitize::quality_score)
            .filter(|s| ids.contains(s.signal_id.as_str()))
            .filter(|s| seen.insert(s.signal_id.clone()))
            .collect();

        let mut executive_summary = sanitize::text(&root, "executive_summary");
        if executive_summary.is_empty() {
            executive_summary = MISSING_SUMMARY.to_string();
        }
        let mut quality_grade = sanitize::text(&root, "quality_grade");
        if quality_grade.is_empty() {
            quality_grade = DEFAULT_GRADE.to_string();
        }

        let included = scores.iter().filter(|s| s.include_in_digest).count();
        info!(scores = scores.len(), included, grade = %quality_grade, "quality judged");

        Ok(QualityJudgment {
            scores,
            executive_summary,
            quality_grade,
        })
    }
}
