use crate::error::{AnalysisError, Result};
use crate::llm::types::*;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl GeminiSettings {
    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none() && self.max_output_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        })
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    generation_config: Option<GenerationConfig>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            generation_config: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_settings(api_key: impl Into<String>, settings: &GeminiSettings) -> Self {
        let mut client = Self::new(api_key).with_base_url(settings.base_url.clone());
        client.generation_config = settings.generation_config();
        client
    }

    /// Sends one `generateContent` call and returns the text of the first candidate.
    pub async fn generate_content(
        &self,
        model: &str,
        system_instruction: Option<&str>,
        contents: Vec<Content>,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents,
            system_instruction: system_instruction.map(Content::system),
            generation_config: self.generation_config.clone(),
        };

        debug!(
            "Calling {} with {} content turn(s)",
            model,
            payload.contents.len()
        );

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(AnalysisError::NarrativeFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let candidate = body
            .candidates
            .ok_or_else(|| AnalysisError::NarrativeFailed("No candidates returned".to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::NarrativeFailed("Empty candidates list".to_string()))?;

        let text = candidate.content.map(|c| c.text()).unwrap_or_default();
        if text.is_empty() {
            return Err(AnalysisError::NarrativeFailed(format!(
                "Model returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
