//! Free-text command to filter mapping.
//!
//! The interpreter is the boundary between the language model and the
//! search engine: whatever goes wrong on the model side is logged here and
//! degrades to "no filters", so callers always get a mapping.

use crate::error::{LlmError, Result};
use crate::provider::{CompletionRequest, LlmProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use scout_core::{FilterCategory, RawFilterMapping, RawFilterValue};
use serde_json::Value;
use std::sync::Arc;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("valid regex"));

/// Extracts directory search filters from a free-text command.
pub struct FilterInterpreter {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl FilterInterpreter {
    /// Create an interpreter backed by the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: 0.0,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Interpret a command. Never fails: any provider or parse error yields
    /// an empty mapping, i.e. a single unconstrained search.
    pub async fn interpret(&self, command: &str) -> RawFilterMapping {
        match self.try_interpret(command).await {
            Ok(filters) => {
                tracing::info!("Interpreted filters: {:?}", filters);
                filters
            }
            Err(e) => {
                tracing::warn!(
                    "Error interpreting command with {}: {}; continuing without filters",
                    self.provider.provider_id(),
                    e
                );
                RawFilterMapping::new()
            }
        }
    }

    async fn try_interpret(&self, command: &str) -> Result<RawFilterMapping> {
        let request = CompletionRequest::new(build_prompt(command))
            .with_temperature(self.temperature)
            .with_json_output();

        let response = self.provider.complete(request).await?;
        tracing::debug!("Raw extraction reply: {}", response.content);
        parse_reply(&response.content)
    }
}

/// Extraction prompt for one command.
#[must_use]
pub fn build_prompt(command: &str) -> String {
    format!(
        r#"You are an expert at interpreting directory search commands. Analyze the following user request and extract the filter criteria.
Return the output as a JSON object with the keys "state", "member", and "breed".
If multiple values are mentioned for ANY key (e.g., "kansas and texas" or "member A and member B"), the value for that key MUST be a list of strings. Otherwise, it should be a single string.
If a criterion is not mentioned, omit its key from the JSON.

User Request: "{command}""#
    )
}

/// Parse the model's reply into a raw mapping.
///
/// Accepts replies wrapped in a Markdown code fence. Unknown keys are
/// ignored; non-string scalars are kept as their text form.
pub fn parse_reply(reply: &str) -> Result<RawFilterMapping> {
    let json_text = CODE_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map_or(reply.trim(), |m| m.as_str());

    let value: Value = serde_json::from_str(json_text)?;
    let Value::Object(object) = value else {
        return Err(LlmError::ParseError {
            provider: "interpreter".to_string(),
            message: format!("expected a JSON object, got: {json_text}"),
        });
    };

    let mut mapping = RawFilterMapping::new();
    for (key, value) in object {
        let Some(category) = FilterCategory::from_key(&key) else {
            tracing::debug!("Ignoring unknown filter key '{}'", key);
            continue;
        };
        if let Some(raw) = coerce_value(value) {
            mapping.insert(category, raw);
        }
    }
    Ok(mapping)
}

fn coerce_value(value: Value) -> Option<RawFilterValue> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(RawFilterValue::One(s)),
        Value::Array(items) => Some(RawFilterValue::Many(
            items.into_iter().filter_map(text_form).collect(),
        )),
        other => text_form(other).map(RawFilterValue::One),
    }
}

fn text_form(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CompletionResponse;
    use async_trait::async_trait;

    struct CannedProvider {
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    model: "canned".to_string(),
                    stop_reason: None,
                    usage: None,
                }),
                Err(message) => Err(LlmError::Internal(message.clone())),
            }
        }

        fn provider_id(&self) -> &'static str {
            "canned"
        }
    }

    fn interpreter(reply: std::result::Result<&str, &str>) -> FilterInterpreter {
        FilterInterpreter::new(Arc::new(CannedProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
        }))
    }

    #[test]
    fn test_prompt_mentions_keys_and_command() {
        let prompt = build_prompt("find members in Kansas and Texas");
        assert!(prompt.contains(r#""state", "member", and "breed""#));
        assert!(prompt.contains(r#"User Request: "find members in Kansas and Texas""#));
    }

    #[test]
    fn test_parse_list_and_scalar() {
        let mapping = parse_reply(r#"{"state": ["Texas", "Kansas"], "breed": "Red"}"#).unwrap();
        assert_eq!(
            mapping.get(&FilterCategory::Location),
            Some(&RawFilterValue::Many(vec![
                "Texas".to_string(),
                "Kansas".to_string()
            ]))
        );
        assert_eq!(
            mapping.get(&FilterCategory::BreedType),
            Some(&RawFilterValue::One("Red".to_string()))
        );
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "```json\n{\"member\": \"Dwight Elmore\"}\n```";
        let mapping = parse_reply(reply).unwrap();
        assert_eq!(
            mapping.get(&FilterCategory::Member),
            Some(&RawFilterValue::One("Dwight Elmore".to_string()))
        );
    }

    #[test]
    fn test_parse_coerces_odd_types() {
        let mapping =
            parse_reply(r#"{"state": 42, "member": null, "breed": [true, "Boer", null], "colour": "red"}"#)
                .unwrap();
        assert_eq!(
            mapping.get(&FilterCategory::Location),
            Some(&RawFilterValue::One("42".to_string()))
        );
        assert!(!mapping.contains_key(&FilterCategory::Member));
        assert_eq!(
            mapping.get(&FilterCategory::BreedType),
            Some(&RawFilterValue::Many(vec![
                "true".to_string(),
                "Boer".to_string()
            ]))
        );
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_reply(r#"["Kansas"]"#).is_err());
        assert!(parse_reply("I could not find any filters").is_err());
    }

    #[tokio::test]
    async fn test_interpret_success() {
        let mapping = interpreter(Ok(r#"{"state": ["Texas", "Kansas"]}"#))
            .interpret("find members in Texas and Kansas")
            .await;
        assert_eq!(mapping.len(), 1);
    }

    #[tokio::test]
    async fn test_interpret_degrades_on_provider_error() {
        let mapping = interpreter(Err("connection refused"))
            .interpret("find cats in Indonesia")
            .await;
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn test_interpret_degrades_on_malformed_json() {
        let mapping = interpreter(Ok("{\"state\": "))
            .interpret("find members in Oklahoma")
            .await;
        assert!(mapping.is_empty());
    }
}
