// File: stailist-common/src/models/recommendation.rs

use serde::{Deserialize, Serialize};

use crate::models::clothing::ClothingItem;
use crate::models::profile::UserProfile;

/// Hard cap on the justification the stylist may return.
pub const MAX_REASONING_WORDS: usize = 40;

/// Used whenever the model's justification is missing or unusable.
pub const DEFAULT_REASONING: &str = "A style suggestion is available.";

/// A fully composed outfit request. Built per call and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    /// Wardrobe snapshot captured when the request was built.
    pub wardrobe: Vec<ClothingItem>,
    pub profile: UserProfile,
    pub vibe: String,
    pub prompt: String,
    /// JSON schema of the expected `{ reasoning, wardrobeItemIds }` response.
    pub response_schema: serde_json::Value,
}

/// The interpreted outfit. Every id in `wardrobe_item_ids` exists in the snapshot
/// the request was built from, and `items` holds those entries in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub reasoning: String,

    #[serde(rename = "wardrobeItemIds")]
    pub wardrobe_item_ids: Vec<String>,

    #[serde(skip)]
    pub items: Vec<ClothingItem>,
}

impl RecommendationResult {
    pub fn fallback() -> Self {
        Self {
            reasoning: DEFAULT_REASONING.to_string(),
            wardrobe_item_ids: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
