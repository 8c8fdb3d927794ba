//! Gemini implementation of the `TextModel` trait.
//!
//! ```rust,ignore
//! use deal_agents::models::GeminiModel;
//!
//! let model = GeminiModel::from_env()?.with_model("gemini-2.5-flash");
//! let estimator = PriceEstimator::new(retriever, Arc::new(model));
//! ```

use async_trait::async_trait;
use gemini_client::{normalize_schema, GeminiClient, GenerateRequest};
use tracing::debug;

use crate::error::Result;
use crate::traits::model::{GenerationOptions, ResponseFormat, TextModel};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Gemini-backed text model.
#[derive(Clone)]
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

impl GeminiModel {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    /// Create from `GEMINI_API_KEY`; a missing key is a config error.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiClient::from_env()?))
    }

    /// Set the model (default: gemini-2.5-flash-lite).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Underlying client, e.g. to share with a `GeminiEncoder`.
    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    fn build_request(prompt: &str, options: &GenerationOptions) -> GenerateRequest {
        let mut request = GenerateRequest::new(prompt).temperature(options.temperature);

        if let Some(instruction) = &options.system_instruction {
            request = request.system(instruction.clone());
        }
        if let Some(max) = options.max_output_tokens {
            request = request.max_output_tokens(max);
        }
        if let ResponseFormat::Json { schema } = &options.response_format {
            request = request.json(schema.clone().map(normalize_schema));
        }
        request
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = Self::build_request(prompt, options);
        let response = self.client.generate_content(&self.model, request).await?;

        debug!(
            model = %self.model,
            finish_reason = ?response.finish_reason,
            reply_len = response.text.len(),
            "Gemini reply"
        );
        Ok(response.text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_has_no_mime_type() {
        let options = GenerationOptions::new()
            .with_max_output_tokens(5)
            .with_system_instruction("Reply only with the price");

        let request = GeminiModel::build_request("Price is $", &options);
        let config = request.generation_config.unwrap();

        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.max_output_tokens, Some(5));
        assert!(config.response_mime_type.is_none());
        assert!(request.system_instruction.is_some());
    }

    #[test]
    fn test_json_request_carries_schema() {
        let schema = serde_json::json!({"type": "object"});
        let options = GenerationOptions::new().with_json_schema(schema.clone());

        let request = GeminiModel::build_request("deals", &options);
        let config = request.generation_config.unwrap();

        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(config.response_json_schema, Some(schema));
    }

    #[test]
    fn test_json_schema_refs_inlined() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"item": {"$ref": "#/definitions/Item"}},
            "definitions": {"Item": {"type": "object", "properties": {"url": {"type": "string"}}}}
        });
        let options = GenerationOptions::new().with_json_schema(schema);

        let request = GeminiModel::build_request("deals", &options);
        let sent = request.generation_config.unwrap().response_json_schema.unwrap();

        assert!(sent.get("definitions").is_none());
        assert_eq!(sent["properties"]["item"]["properties"]["url"]["type"], "string");
    }
}
