use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use stailist_common::models::InlineImage;

use crate::models::ProviderConfig;
use crate::schema::to_gemini_schema;
use crate::traits::{GenerationRequest, ModelProvider};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Longest slice of a raw response that ends up in the logs.
const LOG_PREVIEW_CHARS: usize = 500;

pub(crate) fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}

fn build_http_client(config: &ProviderConfig) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Pull `error.message` out of an API error body, if there is one.
fn api_error_message(data: &Value) -> Option<String> {
    let error = data.get("error")?;
    Some(
        error
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| error.to_string()),
    )
}

/// Send a request and return the parsed JSON body, turning non-2xx answers and
/// API error objects into errors.
async fn send_json(provider: &str, request: reqwest::RequestBuilder) -> anyhow::Result<Value> {
    let response = request.send().await?;
    let status = response.status();

    // Get the raw response text first for better error handling
    let response_text = response.text().await?;
    tracing::debug!("Raw {} response ({}): {}", provider, status, preview(&response_text));

    let data = match serde_json::from_str::<Value>(&response_text) {
        Ok(json) => json,
        Err(e) if status.is_success() => {
            tracing::error!("Failed to parse {} response as JSON: {:?}", provider, e);
            return Err(anyhow::anyhow!("{} returned non-JSON response: {}", provider, e));
        }
        Err(_) => Value::Null,
    };

    if let Some(message) = api_error_message(&data) {
        tracing::error!("{} returned error ({}): {}", provider, status, message);
        return Err(anyhow::anyhow!("{} API error ({}): {}", provider, status, message));
    }

    if !status.is_success() {
        tracing::error!("{} returned HTTP {}", provider, status);
        return Err(anyhow::anyhow!("{} returned HTTP {}", provider, status));
    }

    Ok(data)
}

/// Google Gemini provider implementation
pub struct GeminiProvider {
    config: ProviderConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    fn api_base(&self) -> String {
        self.config
            .api_base
            .clone()
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
    }

    fn image_model(&self) -> String {
        self.config
            .options
            .get("image_model")
            .cloned()
            .unwrap_or_else(|| GEMINI_IMAGE_MODEL.to_string())
    }

    async fn generate_content(&self, model: &str, payload: &Value) -> anyhow::Result<Value> {
        let api_base = self.api_base();
        tracing::info!("Making API call to {}/models/{}:generateContent", api_base, model);
        tracing::debug!(
            "Gemini request payload:\n{}",
            preview(&serde_json::to_string_pretty(payload).unwrap_or_else(|_| format!("{:?}", payload)))
        );

        let request = self
            .client
            .post(format!("{}/models/{}:generateContent", api_base, model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(payload);

        send_json(self.name(), request).await
    }

    /// The parts of the first candidate, or an error if the model returned none.
    fn first_candidate_parts(data: &Value) -> anyhow::Result<&Vec<Value>> {
        let candidates = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                tracing::error!("Response missing 'candidates' array: {:?}", data);
                anyhow::anyhow!("Response missing 'candidates' array")
            })?;

        let first = candidates.first().ok_or_else(|| {
            tracing::error!("Gemini returned empty candidates array");
            anyhow::anyhow!("No candidates returned")
        })?;

        first
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                let reason = first
                    .get("finishReason")
                    .and_then(|r| r.as_str())
                    .unwrap_or("unknown");
                anyhow::anyhow!("Candidate has no content (finish reason: {})", reason)
            })
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_json(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let mut parts = vec![json!({ "text": request.prompt })];
        if let Some(image) = &request.image {
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            }));
        }

        let mut generation_config = json!({ "responseMimeType": "application/json" });
        if let Some(schema) = &request.response_schema {
            generation_config["responseSchema"] = to_gemini_schema(schema);
        }

        let payload = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": generation_config,
        });

        let data = self.generate_content(&self.config.default_model, &payload).await?;
        let parts = Self::first_candidate_parts(&data)?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            tracing::warn!("Gemini returned no text");
        }
        Ok(text)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        reference: &InlineImage,
    ) -> anyhow::Result<Option<InlineImage>> {
        let payload = json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": reference.mime_type,
                            "data": reference.data,
                        }
                    },
                    { "text": prompt },
                ]
            }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
        });

        let data = self.generate_content(&self.image_model(), &payload).await?;
        let parts = Self::first_candidate_parts(&data)?;

        let image = parts.iter().find_map(|part| {
            let inline = part.get("inlineData")?;
            Some(InlineImage {
                mime_type: inline.get("mimeType")?.as_str()?.to_string(),
                data: inline.get("data")?.as_str()?.to_string(),
            })
        });

        if image.is_none() {
            tracing::warn!("Gemini image model answered without an image");
        }
        Ok(image)
    }
}

/// OpenAI-compatible chat completions provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_json(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let api_base = self.config.api_base.clone().unwrap_or_else(|| {
            OPENAI_API_BASE.to_string()
        });

        // json_object mode needs the word "JSON" in the prompt; the schema doubles as that hint
        let mut prompt = request.prompt.clone();
        if let Some(schema) = &request.response_schema {
            prompt.push_str("\n\nRespond with JSON matching this schema:\n");
            prompt.push_str(&schema.to_string());
        }

        let content = match &request.image {
            Some(image) => json!([
                { "type": "text", "text": prompt },
                { "type": "image_url", "image_url": { "url": image.to_data_url() } },
            ]),
            None => json!(prompt),
        };

        let mut messages = Vec::new();
        if let Some(system_prompt) = self.config.options.get("system_prompt") {
            messages.push(json!({ "role": "system", "content": system_prompt }));
        }
        messages.push(json!({ "role": "user", "content": content }));

        let request_payload = json!({
            "model": self.config.default_model,
            "messages": messages,
            "response_format": { "type": "json_object" },
            "max_tokens": 1000,
        });

        tracing::info!("Making API call to {}/chat/completions", api_base);

        let request = self
            .client
            .post(format!("{}/chat/completions", api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_payload);

        let data = send_json(self.name(), request).await?;

        let choices = match data.get("choices").and_then(|c| c.as_array()) {
            Some(choices) => choices,
            None => {
                tracing::error!("Response missing 'choices' array: {:?}", data);
                return Err(anyhow::anyhow!("Response missing 'choices' array"));
            }
        };

        let message = choices
            .first()
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| anyhow::anyhow!("No completions returned"))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                tracing::error!("Message missing 'content': {:?}", message);
                anyhow::anyhow!("Response message missing 'content'")
            })?
            .to_string();

        Ok(content)
    }
}

/// Registry of configured AI providers
pub struct Provider {
    providers: Arc<RwLock<HashMap<String, Arc<dyn ModelProvider>>>>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new provider
    pub async fn register<P: ModelProvider + 'static>(&self, provider: P) {
        self.register_arc(Arc::new(provider)).await;
    }

    pub async fn register_arc(&self, provider: Arc<dyn ModelProvider>) {
        let mut providers = self.providers.write().await;
        providers.insert(provider.name().to_string(), provider);
    }

    /// Get a provider by name
    pub async fn get(&self, name: &str) -> Option<Arc<dyn ModelProvider>> {
        let providers = self.providers.read().await;
        providers.get(name).cloned()
    }

    /// Names of all registered providers, sorted
    pub async fn get_all(&self) -> Vec<String> {
        let providers = self.providers.read().await;
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build the provider named by `config.provider_type`
    pub fn from_config(config: ProviderConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
        match config.provider_type.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Arc::new(GeminiProvider::new(config)?)),
            "openai" => Ok(Arc::new(OpenAIProvider::new(config)?)),
            other => Err(anyhow::anyhow!("Unknown provider type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_prefers_message_field() {
        let body = json!({ "error": { "code": 400, "message": "API key not valid" } });
        assert_eq!(api_error_message(&body).as_deref(), Some("API key not valid"));
        assert_eq!(api_error_message(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_first_candidate_parts_reports_finish_reason() {
        let blocked = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let err = GeminiProvider::first_candidate_parts(&blocked).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let ok = json!({ "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }] });
        assert_eq!(GeminiProvider::first_candidate_parts(&ok).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_lists_names_sorted() -> anyhow::Result<()> {
        let registry = Provider::new();
        registry.register_arc(Provider::from_config(ProviderConfig::new("openai", "k", "gpt-4o-mini"))?).await;
        registry.register_arc(Provider::from_config(ProviderConfig::new("gemini", "k", "gemini-2.5-flash"))?).await;

        assert_eq!(registry.get_all().await, vec!["gemini".to_string(), "openai".to_string()]);
        assert!(registry.get("gemini").await.is_some());
        assert!(Provider::from_config(ProviderConfig::new("llama", "k", "m")).is_err());
        Ok(())
    }
}
