use std::sync::Arc;

use tracing::{debug, info, warn};

use stailist_common::Error;
use stailist_common::models::{
    ClothingItem, ClothingSuggestion, InlineImage, ItemDraft, RecommendationRequest,
    RecommendationResult, UserProfile, WardrobeAnalysis,
};

use crate::interpret::{interpret_item_guess, interpret_recommendation, interpret_suggestions};
use crate::prompt::{
    build_identify_from_image, build_identify_from_text, build_suggestions_request, build_try_on,
};
use crate::provider::{Provider, preview};
use crate::traits::{GenerationRequest, ModelProvider};

/// Runs the stylist's generative calls against the configured providers.
///
/// Every method takes the snapshot it needs by reference and returns a typed
/// result. Malformed model output never surfaces as an error, only transport
/// and provider failures do.
pub struct StylistClient {
    /// Provider registry for different AI models
    provider: Arc<Provider>,

    /// Default provider to use
    default_provider: String,
}

impl StylistClient {
    pub fn new(provider: Arc<Provider>, default_provider: impl Into<String>) -> Self {
        Self {
            provider,
            default_provider: default_provider.into(),
        }
    }

    pub fn set_default_provider(&mut self, provider: impl Into<String>) {
        self.default_provider = provider.into();
    }

    pub fn provider(&self) -> Arc<Provider> {
        self.provider.clone()
    }

    /// Send a composed outfit request and resolve the answer against its own wardrobe snapshot.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResult, Error> {
        let provider = self.get_provider(None).await?;
        info!(
            "Requesting outfit from '{}' ({} items, vibe '{}')",
            provider.name(),
            request.wardrobe.len(),
            request.vibe
        );
        debug!("Recommendation prompt: {}", request.prompt);

        let generation = GenerationRequest::text(request.prompt.clone())
            .with_schema(request.response_schema.clone());
        let raw = provider.generate_json(&generation).await?;
        debug!("Recommendation response: {}", preview(&raw));

        let result = interpret_recommendation(&raw, &request.wardrobe);
        info!("Stylist picked {} item(s)", result.items.len());
        Ok(result)
    }

    /// Autofill from a typed description.
    pub async fn identify_from_text(&self, query: &str) -> Result<ItemDraft, Error> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("describe the item to look it up".into()));
        }
        let provider = self.get_provider(None).await?;
        let raw = provider.generate_json(&build_identify_from_text(query)).await?;
        debug!("Identification response: {}", preview(&raw));
        Ok(interpret_item_guess(&raw))
    }

    /// Autofill from a photo.
    pub async fn identify_from_image(&self, image: InlineImage) -> Result<ItemDraft, Error> {
        let provider = self.get_provider(None).await?;
        let raw = provider.generate_json(&build_identify_from_image(image)).await?;
        debug!("Identification response: {}", preview(&raw));
        Ok(interpret_item_guess(&raw))
    }

    /// Render the profile photo wearing `outfit`.
    pub async fn try_on(&self, profile: &UserProfile, outfit: &[ClothingItem]) -> Result<InlineImage, Error> {
        let request = build_try_on(profile.photo.as_deref(), outfit)?;
        let provider = self.get_provider(None).await?;
        info!("Generating try-on for: {}", request.outfit_description);

        match provider.generate_image(&request.prompt, &request.photo).await? {
            Some(image) => Ok(image),
            None => {
                warn!("'{}' returned no image for the try-on", provider.name());
                Err(Error::Ai("the model did not return an image".into()))
            }
        }
    }

    /// Ask for purchase suggestions. An empty list means the model gave nothing usable.
    pub async fn suggest(
        &self,
        analysis: &WardrobeAnalysis,
        profile: &UserProfile,
    ) -> Result<Vec<ClothingSuggestion>, Error> {
        let provider = self.get_provider(None).await?;
        let raw = provider
            .generate_json(&build_suggestions_request(analysis, profile))
            .await?;
        debug!("Suggestions response: {}", preview(&raw));
        Ok(interpret_suggestions(&raw))
    }

    /// Get a provider by name, or the default provider if none specified
    pub async fn get_provider(&self, name: Option<&str>) -> anyhow::Result<Arc<dyn ModelProvider>> {
        if let Some(provider_name) = name {
            return self
                .provider
                .get(provider_name)
                .await
                .ok_or_else(|| anyhow::anyhow!("Provider not found: {}", provider_name));
        }

        if let Some(provider) = self.provider.get(&self.default_provider).await {
            return Ok(provider);
        }

        let providers = self.provider.get_all().await;
        let first_provider = providers
            .first()
            .ok_or_else(|| anyhow::anyhow!("No AI providers configured"))?;
        self.provider
            .get(first_provider)
            .await
            .ok_or_else(|| anyhow::anyhow!("Provider not found: {}", first_provider))
    }
}
