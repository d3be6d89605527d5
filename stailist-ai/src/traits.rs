use async_trait::async_trait;

use stailist_common::models::InlineImage;

/// One structured-output generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON schema the answer should follow, if the provider can enforce one.
    pub response_schema: Option<serde_json::Value>,
    /// Optional picture sent alongside the prompt.
    pub image: Option<InlineImage>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            image: None,
        }
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// A generative text/image backend.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Ask for a JSON answer and return the model's raw text. The caller is
    /// responsible for validating it; providers only fail on transport or API errors.
    async fn generate_json(&self, request: &GenerationRequest) -> anyhow::Result<String>;

    /// Produce an edited picture from `reference`. `Ok(None)` means the model
    /// answered without an image.
    async fn generate_image(
        &self,
        prompt: &str,
        reference: &InlineImage,
    ) -> anyhow::Result<Option<InlineImage>> {
        let _ = (prompt, reference);
        Err(anyhow::anyhow!("{} does not support image generation", self.name()))
    }
}
