// File: src/stats.rs
//
// Rule-based wardrobe analysis. Used on its own for `stats`, and as the input
// (and fallback) for AI purchase suggestions.

use std::collections::BTreeMap;

use stailist_common::models::{
    ClothingCategory, ClothingItem, ClothingSuggestion, Fit, SuggestedAttributes,
    WardrobeAnalysis, WardrobeStats,
};

/// A wardrobe with one of each of these counts as complete.
pub const ESSENTIAL_CATEGORIES: [ClothingCategory; 4] = [
    ClothingCategory::TShirt,
    ClothingCategory::Pants,
    ClothingCategory::Jacket,
    ClothingCategory::Sweater,
];

/// Categories checked for gaps, in reporting order.
pub const GAP_CATEGORIES: [ClothingCategory; 7] = [
    ClothingCategory::TShirt,
    ClothingCategory::Hoodie,
    ClothingCategory::Jacket,
    ClothingCategory::Sweater,
    ClothingCategory::Pants,
    ClothingCategory::Shorts,
    ClothingCategory::Dress,
];

pub const MAX_GAPS: usize = 5;
pub const MAX_FALLBACK_SUGGESTIONS: usize = 3;
const SMALL_WARDROBE: usize = 5;

fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Most frequent non-blank value. Ties go to the value seen first.
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value.to_string())
}

fn has_category(items: &[ClothingItem], category: ClothingCategory) -> bool {
    items.iter().any(|item| item.category == category)
}

pub fn wardrobe_stats(items: &[ClothingItem]) -> WardrobeStats {
    let present = ESSENTIAL_CATEGORIES
        .iter()
        .filter(|c| has_category(items, **c))
        .count();
    let completeness = present as f64 / ESSENTIAL_CATEGORIES.len() as f64;

    let mut recommendations = Vec::new();
    if !has_category(items, ClothingCategory::Jacket) {
        recommendations.push("Consider adding jackets to your wardrobe".to_string());
    }
    if !has_category(items, ClothingCategory::Pants) {
        recommendations.push("Your wardrobe lacks pants".to_string());
    }
    if items.len() < SMALL_WARDROBE {
        recommendations.push("Consider expanding your wardrobe with more items".to_string());
    }

    WardrobeStats {
        total_items: items.len(),
        by_category: count_by(items.iter().map(|item| item.category.label())),
        by_color: count_by(items.iter().map(|item| item.color.as_str())),
        by_fit: count_by(items.iter().map(|item| item.fit.label())),
        completeness,
        recommendations,
    }
}

pub fn analyze_wardrobe(items: &[ClothingItem]) -> WardrobeAnalysis {
    let gaps = GAP_CATEGORIES
        .iter()
        .filter(|c| !has_category(items, **c))
        .take(MAX_GAPS)
        .map(|c| c.label().to_string())
        .collect();

    WardrobeAnalysis {
        total_items: items.len(),
        most_common_color: most_common(items.iter().map(|item| item.color.as_str())),
        most_common_category: most_common(items.iter().map(|item| item.category.label())),
        most_common_fabric: most_common(items.iter().map(|item| item.fabric.as_str())),
        gaps,
    }
}

/// Suggestions used when the model has nothing usable: one per gap, dressed in
/// the wardrobe's usual color and fabric.
pub fn fallback_suggestions(analysis: &WardrobeAnalysis) -> Vec<ClothingSuggestion> {
    let color = analysis.most_common_color.as_deref().unwrap_or("Black");
    let fabric = analysis.most_common_fabric.as_deref().unwrap_or("Cotton");

    analysis
        .gaps
        .iter()
        .take(MAX_FALLBACK_SUGGESTIONS)
        .map(|gap| ClothingSuggestion {
            item_type: gap.clone(),
            reason: format!(
                "Your wardrobe has no {} yet. Adding one would complement it.",
                gap.to_lowercase()
            ),
            recommended_attributes: SuggestedAttributes {
                color: Some(color.to_string()),
                fit: Some(Fit::Regular.label().to_string()),
                fabric: Some(fabric.to_string()),
                reasoning: Some("Matches your existing color palette".to_string()),
            },
        })
        .collect()
}
