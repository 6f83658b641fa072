use serde::{Deserialize, Serialize};

// =============================================================================
// Model Catalog Types
// =============================================================================

/// Per-token prices as reported by the catalog.
///
/// OpenRouter sends prices as decimal strings such as `"0"` or `"0.000001"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per prompt token.
    #[serde(default)]
    pub prompt: String,
    /// Price per completion token.
    #[serde(default)]
    pub completion: String,
}

impl ModelPricing {
    pub fn new(prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            completion: completion.into(),
        }
    }

    /// Prompt price as a number, `None` when it does not parse.
    pub fn prompt_price(&self) -> Option<f64> {
        parse_price(&self.prompt)
    }

    /// Completion price as a number, `None` when it does not parse.
    pub fn completion_price(&self) -> Option<f64> {
        parse_price(&self.completion)
    }

    /// Both prices are exactly zero.
    pub fn is_free(&self) -> bool {
        self.prompt_price() == Some(0.0) && self.completion_price() == Some(0.0)
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Identifier passed back as `modelId`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Token prices.
    #[serde(default)]
    pub pricing: ModelPricing,
    /// Context window, when advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pricing: ModelPricing) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            pricing,
            context_length: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_free(&self) -> bool {
        self.pricing.is_free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_pricing() {
        assert!(ModelPricing::new("0", "0").is_free());
        assert!(ModelPricing::new("0.0", "0.000").is_free());
        assert!(!ModelPricing::new("0", "0.000001").is_free());
        assert!(!ModelPricing::new("0.000002", "0").is_free());
    }

    #[test]
    fn test_unparseable_pricing_is_not_free() {
        assert!(!ModelPricing::new("", "").is_free());
        assert!(!ModelPricing::new("free", "0").is_free());
        assert!(!ModelPricing::new("-1", "0").is_free());
        assert!(!ModelPricing::new("NaN", "NaN").is_free());
    }

    #[test]
    fn test_descriptor_tolerates_catalog_extras() {
        let raw = serde_json::json!({
            "id": "meta-llama/llama-3.2-3b-instruct:free",
            "name": "Llama 3.2 3B (free)",
            "pricing": { "prompt": "0", "completion": "0", "image": "0" },
            "context_length": 131072,
            "architecture": { "modality": "text->text" },
            "per_request_limits": null
        });
        let model: ModelDescriptor = serde_json::from_value(raw).unwrap();
        assert!(model.is_free());
        assert_eq!(model.context_length, Some(131072));
        assert!(model.description.is_none());
    }
}
