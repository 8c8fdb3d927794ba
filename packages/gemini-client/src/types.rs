//! Gemini API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Content
// =============================================================================

/// A single turn of content (user prompt, model reply, or system instruction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model". Omitted for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Ordered parts of this turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a role-less text block (used for system instructions and embeddings).
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenate all text parts.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A part of a content turn. Only text parts are used by this client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

// =============================================================================
// Generate Content
// =============================================================================

/// Generate-content request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns
    pub contents: Vec<Content>,

    /// Fixed instruction applied to every turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Sampling and output configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// Create a single-turn request from a user prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Set the system instruction.
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::text(instruction));
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config_mut().temperature = Some(temperature);
        self
    }

    /// Cap the number of output tokens.
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.config_mut().max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Constrain the reply to JSON, optionally matching a JSON schema.
    pub fn json(mut self, schema: Option<serde_json::Value>) -> Self {
        let config = self.config_mut();
        config.response_mime_type = Some("application/json".to_string());
        config.response_json_schema = schema;
        self
    }

    fn config_mut(&mut self) -> &mut GenerationConfig {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
    }
}

/// Generation configuration.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// "text/plain" (default) or "application/json"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<serde_json::Value>,
}

/// Generate-content response.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Text of the first candidate
    pub text: String,

    /// Why the model stopped (STOP, MAX_TOKENS, SAFETY, ...)
    pub finish_reason: Option<String>,

    /// Token usage statistics
    pub usage: Option<UsageMetadata>,
}

/// Raw generate response from API (for internal parsing).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponseRaw {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,

    #[serde(default)]
    pub candidates_token_count: u32,

    #[serde(default)]
    pub total_token_count: u32,
}

// =============================================================================
// Embeddings
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct EmbedContentRequest {
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentEmbedding {
    pub values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let req = GenerateRequest::new("Price is $")
            .system("You estimate prices of items.")
            .temperature(0.0)
            .max_output_tokens(5);

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Price is $");
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "You estimate prices of items."
        );
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 5);
        assert!(value["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_json_mode_sets_mime_type() {
        let schema = serde_json::json!({"type": "object"});
        let req = GenerateRequest::new("deals").json(Some(schema.clone()));

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseJsonSchema"], schema);
    }

    #[test]
    fn test_raw_response_parses() {
        let raw: GenerateResponseRaw = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "12"}, {"text": "9.99"}]},
                    "finishReason": "MAX_TOKENS"
                }],
                "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 5, "totalTokenCount": 45}
            }"#,
        )
        .unwrap();

        let candidate = &raw.candidates[0];
        assert_eq!(candidate.content.as_ref().unwrap().joined_text(), "129.99");
        assert_eq!(candidate.finish_reason.as_deref(), Some("MAX_TOKENS"));
        assert_eq!(raw.usage_metadata.unwrap().total_token_count, 45);
    }
}
