//! Generative text model trait.

use async_trait::async_trait;

use crate::error::Result;

/// Shape of the reply the model is asked for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,

    /// JSON, optionally constrained by a JSON schema
    Json { schema: Option<serde_json::Value> },
}

/// Options for a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature; 0.0 for the most deterministic output
    pub temperature: f32,

    /// Cap on reply length
    pub max_output_tokens: Option<u32>,

    /// Fixed per use case (pricing vs curation)
    pub system_instruction: Option<String>,

    pub response_format: ResponseFormat,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: None,
            system_instruction: None,
            response_format: ResponseFormat::Text,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Request JSON output matching `schema`.
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_format = ResponseFormat::Json {
            schema: Some(schema),
        };
        self
    }

    pub fn is_json(&self) -> bool {
        matches!(self.response_format, ResponseFormat::Json { .. })
    }
}

/// A generative text model.
///
/// Implementations wrap a specific provider and map its failures onto
/// `DealError::{Network, Api, Parse}`. Calls are not retried here.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a reply to `prompt`.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
