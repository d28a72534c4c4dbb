//! User product profile.

use serde::{Deserialize, Serialize};

/// The user's own product, as supplied by the product-profile store.
///
/// Every stage receives the same immutable profile so that insights are
/// framed against what the user actually sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProduct {
    pub name: String,
    pub positioning: String,
    pub target_market: String,
    /// Ordered by importance, most important first.
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UserProduct {
    pub fn new(
        name: impl Into<String>,
        positioning: impl Into<String>,
        target_market: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            positioning: positioning.into(),
            target_market: target_market.into(),
            key_features: Vec::new(),
            description: None,
        }
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Render the profile as a compact block for inclusion in prompts.
    pub fn prompt_block(&self) -> String {
        let mut lines = vec![
            format!("Product: {}", self.name),
            format!("Positioning: {}", self.positioning),
            format!("Target market: {}", self.target_market),
        ];
        if !self.key_features.is_empty() {
            lines.push(format!("Key features: {}", self.key_features.join(", ")));
        }
        if let Some(description) = &self.description {
            lines.push(format!("Description: {description}"));
        }
        lines.join("\n")
    }
}
