//! Shared prompt-building helpers for the pipeline agents.

use serde_json::{json, Value};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ClassifiedSignal, RawSignal, StrategicInsight, UserProduct};
use crate::domain::ports::ChatMessage;

/// Raw text beyond this many characters is cut from prompts.
const RAW_CONTENT_LIMIT: usize = 2_000;

pub fn signal_payload(signal: &RawSignal) -> Value {
    let raw_content = signal.raw_content.as_deref().map(|raw| {
        if raw.chars().count() > RAW_CONTENT_LIMIT {
            raw.chars().take(RAW_CONTENT_LIMIT).collect::<String>()
        } else {
            raw.to_string()
        }
    });

    json!({
        "id": signal.id,
        "competitor_name": signal.competitor_name,
        "source": signal.source,
        "signal_type": signal.signal_type,
        "title": signal.title,
        "summary": signal.summary,
        "raw_content": raw_content,
        "detected_at": signal.detected_at.to_rfc3339(),
    })
}

pub fn classified_payload(signal: &ClassifiedSignal) -> Value {
    let c = &signal.classification;
    let mut payload = signal_payload(&signal.signal);
    payload["classification"] = json!({
        "category": c.category.as_str(),
        "confidence": c.confidence,
        "strategic_weight": c.strategic_weight,
        "velocity": c.velocity.as_str(),
        "reasoning": c.reasoning,
        "related_signal_ids": c.related_signal_ids,
    });
    payload
}

pub fn insights_payload(insights: &[StrategicInsight]) -> DomainResult<String> {
    Ok(serde_json::to_string_pretty(insights)?)
}

/// System message that frames an agent against the user's product.
pub fn system_message(role: &str, product: &UserProduct) -> ChatMessage {
    ChatMessage::system(format!(
        "{role}\n\nYou are advising the team behind this product:\n{}\n\n\
         Respond with a single JSON object only.",
        product.prompt_block()
    ))
}
