// File: stailist-common/src/models/identification.rs

use serde::{Deserialize, Serialize};

use crate::models::clothing::{ClothingCategory, Fit, GraphicSize};

/// Typed result of an autofill call. Whatever the model could not tell us stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub category: Option<ClothingCategory>,
    pub fabric: Option<String>,
    pub fit: Option<Fit>,
    pub color: Option<String>,
    pub design: Option<GraphicSize>,
    pub notes: Option<String>,
}

impl ItemDraft {
    pub fn is_empty(&self) -> bool {
        self == &ItemDraft::default()
    }
}
