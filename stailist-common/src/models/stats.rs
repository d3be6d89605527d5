// File: stailist-common/src/models/stats.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeStats {
    pub total_items: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_color: BTreeMap<String, usize>,
    pub by_fit: BTreeMap<String, usize>,
    /// Share of the essential categories present, 0.0 ..= 1.0.
    pub completeness: f64,
    pub recommendations: Vec<String>,
}

/// Summary fed to the "what should I buy next" prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeAnalysis {
    pub total_items: usize,
    pub most_common_color: Option<String>,
    pub most_common_category: Option<String>,
    pub most_common_fabric: Option<String>,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fabricType")]
    pub fabric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingSuggestion {
    pub item_type: String,
    pub reason: String,
    #[serde(default)]
    pub recommended_attributes: SuggestedAttributes,
}
