// File: stailist-common/src/models/mod.rs
pub mod calls;
pub mod clothing;
pub mod export;
pub mod identification;
pub mod image;
pub mod profile;
pub mod recommendation;
pub mod stats;

pub use calls::CallKind;
pub use clothing::{ClothingCategory, ClothingItem, Fit, GraphicSize, NewClothingItem, now_millis};
pub use export::{ImportSummary, WardrobeExport};
pub use identification::ItemDraft;
pub use image::InlineImage;
pub use profile::UserProfile;
pub use recommendation::{
    DEFAULT_REASONING, MAX_REASONING_WORDS, RecommendationRequest, RecommendationResult,
};
pub use stats::{ClothingSuggestion, SuggestedAttributes, WardrobeAnalysis, WardrobeStats};
