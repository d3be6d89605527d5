//! Turning untrusted model output into typed results.
//!
//! Nothing in here fails: malformed answers degrade to neutral defaults and a
//! `warn!` line, never to an error the caller has to handle.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use stailist_common::models::{
    ClothingCategory, ClothingItem, ClothingSuggestion, DEFAULT_REASONING, Fit, GraphicSize,
    ItemDraft, MAX_REASONING_WORDS, RecommendationResult, SuggestedAttributes,
};

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$").unwrap();
}

/// A recommendation answer after shape validation, before id resolution.
///
/// Only a non-object answer is `Malformed`. Inside an object each field is
/// defaulted on its own, so a usable selection survives a missing reasoning
/// and the other way round.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationPayload {
    Valid {
        reasoning: String,
        item_ids: Vec<String>,
    },
    Malformed {
        reason: String,
    },
}

impl RecommendationPayload {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::malformed("response is not a JSON object");
        };

        let reasoning = match obj.get("reasoning").and_then(Value::as_str).map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => {
                warn!("Recommendation response has no reasoning, using the default");
                DEFAULT_REASONING.to_string()
            }
        };

        let item_ids = match obj.get("wardrobeItemIds").and_then(Value::as_array) {
            Some(ids) => {
                let mut seen = HashSet::new();
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
                    .map(str::to_string)
                    .collect()
            }
            None => {
                warn!("Recommendation response has no wardrobeItemIds array");
                Vec::new()
            }
        };

        Self::Valid { reasoning, item_ids }
    }

    fn malformed(reason: &str) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }
}

/// Strip an optional Markdown code fence and parse what is left as JSON.
pub fn parse_model_json(raw: &str) -> Option<Value> {
    let body = match CODE_FENCE.captures(raw) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => raw,
    };
    match serde_json::from_str(body.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Model output is not JSON: {}", e);
            None
        }
    }
}

/// Keep at most `max_words` whitespace-separated words.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.trim().to_string()
    } else {
        words[..max_words].join(" ")
    }
}

/// Look every id up in `wardrobe`, keeping the model's order and dropping unknown ids.
pub fn resolve(item_ids: &[String], wardrobe: &[ClothingItem]) -> Vec<ClothingItem> {
    item_ids
        .iter()
        .filter_map(|id| wardrobe.iter().find(|item| &item.id == id))
        .cloned()
        .collect()
}

pub fn interpret_recommendation_value(value: &Value, wardrobe: &[ClothingItem]) -> RecommendationResult {
    match RecommendationPayload::from_value(value) {
        RecommendationPayload::Valid { reasoning, item_ids } => {
            let items = resolve(&item_ids, wardrobe);
            let dropped = item_ids.len() - items.len();
            if dropped > 0 {
                debug!("Dropped {} recommended id(s) not present in the wardrobe", dropped);
            }
            RecommendationResult {
                reasoning: truncate_words(&reasoning, MAX_REASONING_WORDS),
                wardrobe_item_ids: items.iter().map(|item| item.id.clone()).collect(),
                items,
            }
        }
        RecommendationPayload::Malformed { reason } => {
            warn!("Malformed recommendation response: {}", reason);
            RecommendationResult::fallback()
        }
    }
}

/// Interpret the model's raw text against the wardrobe snapshot the request was built from.
pub fn interpret_recommendation(raw: &str, wardrobe: &[ClothingItem]) -> RecommendationResult {
    match parse_model_json(raw) {
        Some(value) => interpret_recommendation_value(&value, wardrobe),
        None => {
            warn!("Malformed recommendation response: not JSON");
            RecommendationResult::fallback()
        }
    }
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn known_brand(brand: String) -> Option<String> {
    match brand.to_ascii_lowercase().as_str() {
        "unknown" | "n/a" | "none" | "null" => None,
        _ => Some(brand),
    }
}

pub fn item_draft_from_value(value: &Value) -> ItemDraft {
    let Some(obj) = value.as_object() else {
        warn!("Malformed identification response: not a JSON object");
        return ItemDraft::default();
    };

    ItemDraft {
        title: first_text(obj, &["title", "officialTitle", "name"]),
        brand: first_text(obj, &["brand"]).and_then(known_brand),
        category: first_text(obj, &["type", "category"])
            .as_deref()
            .and_then(ClothingCategory::parse_loose),
        fabric: first_text(obj, &["fabric", "material", "fabricType"]),
        fit: first_text(obj, &["fit"]).as_deref().and_then(Fit::parse_loose),
        color: first_text(obj, &["color"]),
        design: first_text(obj, &["design", "graphicSize"])
            .as_deref()
            .and_then(GraphicSize::parse_loose),
        notes: first_text(obj, &["notes", "specialNotes", "technicalNotes"]),
    }
}

/// Map an identification answer onto a draft. Unusable fields are left empty.
pub fn interpret_item_guess(raw: &str) -> ItemDraft {
    match parse_model_json(raw) {
        Some(value) => item_draft_from_value(&value),
        None => {
            warn!("Malformed identification response: not JSON");
            ItemDraft::default()
        }
    }
}

fn suggestion_from_value(value: &Value) -> Option<ClothingSuggestion> {
    let obj = value.as_object()?;
    let item_type = first_text(obj, &["itemType", "type"])?;
    let reason = first_text(obj, &["reason"]).unwrap_or_default();

    let recommended_attributes = obj
        .get("recommendedAttributes")
        .and_then(Value::as_object)
        .map(|attrs| SuggestedAttributes {
            color: first_text(attrs, &["color"]),
            fit: first_text(attrs, &["fit"]),
            fabric: first_text(attrs, &["fabric", "fabricType"]),
            reasoning: first_text(attrs, &["reasoning"]),
        })
        .unwrap_or_default();

    Some(ClothingSuggestion {
        item_type,
        reason,
        recommended_attributes,
    })
}

/// Parse `{ "suggestions": [...] }`. Entries without an item type are skipped.
pub fn interpret_suggestions(raw: &str) -> Vec<ClothingSuggestion> {
    let Some(value) = parse_model_json(raw) else {
        warn!("Malformed suggestions response: not JSON");
        return Vec::new();
    };

    let list = match &value {
        Value::Array(list) => Some(list),
        Value::Object(obj) => obj.get("suggestions").and_then(Value::as_array),
        _ => None,
    };

    match list {
        Some(list) => list.iter().filter_map(suggestion_from_value).collect(),
        None => {
            warn!("Malformed suggestions response: no suggestions array");
            Vec::new()
        }
    }
}
