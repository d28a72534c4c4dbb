//! Builders shared by the service unit tests.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::adapters::substrates::MockGenerator;
use crate::domain::models::{
    Classification, ClassifiedSignal, Outlook, RawSignal, StrategicInsight, TimeHorizon, Urgency,
    UserProduct,
};
use crate::services::generation_client::GenerationClient;
use crate::services::trace_recorder::TraceRecorder;

pub fn product() -> UserProduct {
    UserProduct::new(
        "Ledgerly",
        "Bookkeeping for freelancers that files itself",
        "Freelancers and sole traders in the EU",
    )
    .with_features(["bank sync", "VAT returns", "invoice reminders"])
}

pub fn signal(id: &str, competitor: &str) -> RawSignal {
    let base = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().unwrap_or_else(Utc::now);
    RawSignal {
        id: id.to_string(),
        competitor_id: competitor.to_lowercase(),
        competitor_name: competitor.to_string(),
        source: "website".to_string(),
        signal_type: "pricing".to_string(),
        title: format!("{competitor} update {id}"),
        summary: format!("{competitor} changed something ({id})"),
        raw_content: None,
        detected_at: base + Duration::hours(1),
    }
}

pub fn classified(id: &str, competitor: &str, weight: u8) -> ClassifiedSignal {
    let classification = Classification {
        strategic_weight: weight,
        ..Classification::fallback()
    };
    ClassifiedSignal::new(signal(id, competitor), classification)
}

pub fn insight(id: &str) -> StrategicInsight {
    StrategicInsight {
        signal_id: id.to_string(),
        competitor_name: "Rival".to_string(),
        what_happened: format!("Rival did {id}"),
        strategic_implication: "Pressure on pricing".to_string(),
        impact_on_user: "Churn risk among price-sensitive users".to_string(),
        recommended_action: "Review the entry tier".to_string(),
        urgency: Urgency::High,
        outlook: Outlook::Threat,
        time_horizon: TimeHorizon::ShortTerm,
    }
}

pub fn client(generator: Arc<MockGenerator>) -> GenerationClient {
    GenerationClient::new(generator, TraceRecorder::disabled())
}
