use super::params::TripParameter;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tripwise_core::{Content, Llm, LlmRequest, Result};

/// Pulls trip parameters out of free-form user text.
#[async_trait]
pub trait ParameterExtractor: Send + Sync {
    /// Values for any of `missing` that `text` states. Slots the text does
    /// not mention are left out of the result.
    async fn extract(
        &self,
        text: &str,
        missing: &[TripParameter],
    ) -> Result<HashMap<TripParameter, String>>;
}

const EXTRACTION_INSTRUCTION: &str = "You extract travel-planning details from a single user \
message. Fill a field only when the message states it explicitly. Use an empty string for \
anything not stated. Never guess.";

/// [`ParameterExtractor`] backed by a model call with a JSON response schema.
///
/// The reply must be a JSON object keyed by parameter name. Malformed
/// replies extract nothing; transport errors propagate.
pub struct LlmParameterExtractor {
    model: Arc<dyn Llm>,
    model_name: String,
}

impl LlmParameterExtractor {
    pub fn new(model: Arc<dyn Llm>) -> Self {
        let model_name = model.name().to_string();
        Self { model, model_name }
    }

    fn response_schema(missing: &[TripParameter]) -> Value {
        let properties: Map<String, Value> = missing
            .iter()
            .map(|p| (p.key().to_string(), json!({"type": "string", "description": p.question()})))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
        })
    }

    fn parse_reply(reply: &str, missing: &[TripParameter]) -> HashMap<TripParameter, String> {
        let trimmed = reply.trim().trim_start_matches("```json").trim_matches('`').trim();
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(trimmed) else {
            tracing::warn!("parameter extraction reply was not a JSON object");
            return HashMap::new();
        };

        missing
            .iter()
            .filter_map(|p| {
                let raw = fields.get(p.key())?.as_str()?;
                p.accept(raw).map(|value| (*p, value))
            })
            .collect()
    }
}

#[async_trait]
impl ParameterExtractor for LlmParameterExtractor {
    async fn extract(
        &self,
        text: &str,
        missing: &[TripParameter],
    ) -> Result<HashMap<TripParameter, String>> {
        if missing.is_empty() || text.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let request = LlmRequest::new(&self.model_name, vec![Content::user(text)])
            .with_system_instruction(EXTRACTION_INSTRUCTION)
            .with_response_schema(Self::response_schema(missing));
        let response = self.model.generate_content(request).await?;

        let extracted = response.text().map(|t| Self::parse_reply(&t, missing)).unwrap_or_default();
        tracing::debug!(
            extracted = ?extracted.keys().map(|p| p.key()).collect::<Vec<_>>(),
            "extracted trip parameters"
        );
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_schema_lists_missing_only() {
        let schema = LlmParameterExtractor::response_schema(&[
            TripParameter::Destination,
            TripParameter::Dates,
        ]);
        let props = schema["properties"].as_object().unwrap();
        assert_eq!(props.len(), 2);
        assert!(props.contains_key("destination"));
        assert!(props.contains_key("dates"));
    }

    #[test]
    fn test_parse_reply_filters() {
        let missing = [TripParameter::Destination, TripParameter::Dates, TripParameter::Travelers];
        let reply = r#"{"destination": "Paris", "dates": "sometime", "travelers": "", "budget": "$10"}"#;
        let extracted = LlmParameterExtractor::parse_reply(reply, &missing);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted.get(&TripParameter::Destination).map(String::as_str), Some("Paris"));
    }

    #[test]
    fn test_parse_reply_fenced_and_malformed() {
        let missing = [TripParameter::Dates];
        let fenced = "```json\n{\"dates\": \"3 days\"}\n```";
        assert_eq!(LlmParameterExtractor::parse_reply(fenced, &missing).len(), 1);
        assert!(LlmParameterExtractor::parse_reply("not json", &missing).is_empty());
    }
}
