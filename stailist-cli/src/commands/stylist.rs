use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::warn;

use stailist_common::models::{ClothingItem, ClothingSuggestion, ItemDraft, RecommendationResult};
use stailist_core::{Error, StylistService, WardrobeStore};

use super::wardrobe::item_line;
use super::{load_image, save_image};
use crate::config::AppConfig;

#[derive(Subcommand, Debug, Clone)]
pub enum AutofillCommand {
    /// From a typed name, e.g. "nike tech fleece grey"
    Text { query: String },
    /// From a photo of the item
    Image { path: PathBuf },
}

fn render_outfit(result: &RecommendationResult) -> String {
    let mut out = result.reasoning.clone();
    if result.items.is_empty() {
        out.push_str("\n(No matching items from your wardrobe.)");
    }
    for item in &result.items {
        out.push_str("\n- ");
        out.push_str(&item_line(item));
    }
    out
}

pub async fn recommend(
    vibe: &str,
    try_on: Option<&Path>,
    config: &AppConfig,
    store: &WardrobeStore,
) -> Result<String, Error> {
    let stylist = config.stylist().await?;
    let result = stylist.recommend(store.items(), store.profile(), vibe).await?;
    let mut out = render_outfit(&result);

    if let Some(path) = try_on {
        if result.items.is_empty() {
            out.push_str("\nSkipping try-on: there is no outfit to render.");
        } else {
            // the outfit is already shown; a failed render only adds a line
            let outcome = render_try_on(&stylist, store, &result.items, path).await;
            out.push('\n');
            out.push_str(&try_on_line(outcome, path));
        }
    }
    Ok(out)
}

async fn render_try_on(
    stylist: &StylistService,
    store: &WardrobeStore,
    outfit: &[ClothingItem],
    path: &Path,
) -> Result<(), Error> {
    let image = stylist.try_on(store.profile(), outfit).await?;
    save_image(path, &image).await
}

fn try_on_line(outcome: Result<(), Error>, path: &Path) -> String {
    match outcome {
        Ok(()) => format!("Try-on saved to {}", path.display()),
        Err(e) => {
            warn!("Try-on failed: {}", e);
            format!("Try-on failed: {}", e)
        }
    }
}

fn render_draft(draft: &ItemDraft) -> String {
    if draft.is_empty() {
        return "Could not identify anything; fill in the details yourself.".to_string();
    }
    let line = |label: &str, value: Option<String>| format!("{}: {}", label, value.unwrap_or_else(|| "?".into()));
    [
        line("Title", draft.title.clone()),
        line("Type", draft.category.map(|c| c.to_string())),
        line("Color", draft.color.clone()),
        line("Fabric", draft.fabric.clone()),
        line("Fit", draft.fit.map(|f| f.to_string())),
        line("Design", draft.design.map(|d| d.to_string())),
        line("Brand", draft.brand.clone()),
        line("Notes", draft.notes.clone()),
    ]
    .join("\n")
}

pub async fn autofill(cmd: AutofillCommand, config: &AppConfig) -> Result<String, Error> {
    let stylist = config.stylist().await?;
    let draft = match cmd {
        AutofillCommand::Text { query } => stylist.autofill_from_text(&query).await?,
        AutofillCommand::Image { path } => stylist.autofill_from_image(load_image(&path).await?).await?,
    };
    Ok(render_draft(&draft))
}

fn render_suggestion(suggestion: &ClothingSuggestion) -> String {
    let attrs = &suggestion.recommended_attributes;
    let details: Vec<&str> = [&attrs.color, &attrs.fit, &attrs.fabric]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    let mut out = format!("- {}", suggestion.item_type);
    if !details.is_empty() {
        out.push_str(&format!(" ({})", details.join(", ")));
    }
    if !suggestion.reason.is_empty() {
        out.push_str(&format!(": {}", suggestion.reason));
    }
    out
}

pub async fn suggest(config: &AppConfig, store: &WardrobeStore) -> Result<String, Error> {
    let stylist = config.stylist().await?;
    let suggestions = stylist.suggest(store.items(), store.profile()).await?;
    if suggestions.is_empty() {
        return Ok("Your wardrobe covers the basics; nothing to suggest.".to_string());
    }
    Ok(suggestions
        .iter()
        .map(render_suggestion)
        .collect::<Vec<_>>()
        .join("\n"))
}
