pub mod client;
pub mod interpret;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod traits;

// Re-export public APIs
pub use client::StylistClient;
pub use interpret::{
    RecommendationPayload, interpret_item_guess, interpret_recommendation, interpret_suggestions,
};
pub use models::ProviderConfig;
pub use prompt::{
    TryOnRequest, build_identify_from_image, build_identify_from_text, build_recommendation,
    build_suggestions_request, build_try_on,
};
pub use provider::{GeminiProvider, OpenAIProvider, Provider};
pub use traits::{GenerationRequest, ModelProvider};
