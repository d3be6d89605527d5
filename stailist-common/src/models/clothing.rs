// File: stailist-common/src/models/clothing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::Error;
use crate::models::identification::ItemDraft;

/// Folds a free-text label into a comparison key: lowercase ASCII alphanumerics only,
/// so "T-Shirt", "t shirt" and "TSHIRT" all compare equal.
fn fold_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Implements serde for the closed wardrobe enums. Stored documents never fail on an
/// unknown label; they fall back to the enum's `Default`.
macro_rules! loose_label_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw
                    .as_deref()
                    .and_then(<$ty>::parse_loose)
                    .unwrap_or_default())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ClothingCategory {
    Hoodie,
    TShirt,
    Jacket,
    Sweater,
    Pants,
    Shorts,
    Dress,
    Shoes,
    #[default]
    Other,
}

impl ClothingCategory {
    pub const ALL: [ClothingCategory; 9] = [
        ClothingCategory::Hoodie,
        ClothingCategory::TShirt,
        ClothingCategory::Jacket,
        ClothingCategory::Sweater,
        ClothingCategory::Pants,
        ClothingCategory::Shorts,
        ClothingCategory::Dress,
        ClothingCategory::Shoes,
        ClothingCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClothingCategory::Hoodie => "Hoodie",
            ClothingCategory::TShirt => "T-Shirt",
            ClothingCategory::Jacket => "Jacket",
            ClothingCategory::Sweater => "Sweater",
            ClothingCategory::Pants => "Pants",
            ClothingCategory::Shorts => "Shorts",
            ClothingCategory::Dress => "Dress",
            ClothingCategory::Shoes => "Shoes",
            ClothingCategory::Other => "Other",
        }
    }

    /// Case-insensitive match against the known labels and the spellings used by
    /// the REST backend. Returns `None` for anything unrecognised.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "hoodie" | "hoodies" | "hoody" => Some(ClothingCategory::Hoodie),
            "tshirt" | "tshirts" | "tee" | "teeshirt" => Some(ClothingCategory::TShirt),
            "jacket" | "jackets" | "coat" => Some(ClothingCategory::Jacket),
            "sweater" | "sweaters" | "jumper" | "pullover" => Some(ClothingCategory::Sweater),
            "pants" | "bottoms" | "trousers" | "jeans" => Some(ClothingCategory::Pants),
            "shorts" => Some(ClothingCategory::Shorts),
            "dress" | "dresses" => Some(ClothingCategory::Dress),
            "shoes" | "shoe" | "sneakers" | "boots" => Some(ClothingCategory::Shoes),
            "other" => Some(ClothingCategory::Other),
            _ => None,
        }
    }
}

loose_label_serde!(ClothingCategory);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Fit {
    Baggy,
    #[default]
    Regular,
    Tight,
}

impl Fit {
    pub const ALL: [Fit; 3] = [Fit::Baggy, Fit::Regular, Fit::Tight];

    pub fn label(&self) -> &'static str {
        match self {
            Fit::Baggy => "Baggy",
            Fit::Regular => "Regular",
            Fit::Tight => "Tight",
        }
    }

    pub fn parse_loose(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "baggy" | "loose" | "oversized" | "relaxed" => Some(Fit::Baggy),
            "regular" | "normal" | "standard" => Some(Fit::Regular),
            "tight" | "slim" | "fitted" | "skinny" => Some(Fit::Tight),
            _ => None,
        }
    }
}

loose_label_serde!(Fit);

/// How loud the print or decoration on an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicSize {
    #[default]
    None,
    Subtle,
    Large,
}

impl GraphicSize {
    pub fn label(&self) -> &'static str {
        match self {
            GraphicSize::None => "None",
            GraphicSize::Subtle => "Subtle",
            GraphicSize::Large => "Large Graphic",
        }
    }

    pub fn parse_loose(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "none" | "plain" | "nographic" => Some(GraphicSize::None),
            "subtle" | "small" | "smallgraphic" => Some(GraphicSize::Subtle),
            "large" | "largegraphic" | "big" => Some(GraphicSize::Large),
            _ => None,
        }
    }
}

loose_label_serde!(GraphicSize);

/// A single piece of clothing in the wardrobe.
///
/// Serializes in the shape the local-storage app exported, and also reads the
/// backend's field names (`name`, `fabricType`, `graphicSize`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,

    #[serde(default, alias = "name")]
    pub title: String,

    #[serde(rename = "type", alias = "category", default)]
    pub category: ClothingCategory,

    #[serde(default)]
    pub color: String,

    #[serde(default, alias = "fabricType", alias = "material")]
    pub fabric: String,

    #[serde(default)]
    pub fit: Fit,

    #[serde(default, alias = "graphicSize", skip_serializing_if = "Option::is_none")]
    pub design: Option<GraphicSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(rename = "specialNotes", alias = "notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(rename = "dateAdded", default, with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    /// Display name, falling back to "{color} {category}" for untitled imports.
    pub fn display_name(&self) -> String {
        if self.title.trim().is_empty() {
            format!("{} {}", self.color, self.category).trim().to_string()
        } else {
            self.title.clone()
        }
    }
}

/// Current time truncated to the millisecond precision used on the wire.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// What the user typed into the "add item" form. No identifier yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClothingItem {
    pub title: String,
    pub category: ClothingCategory,
    pub color: String,
    pub fabric: String,
    pub fit: Fit,
    pub design: Option<GraphicSize>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

impl NewClothingItem {
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [("title", &self.title), ("color", &self.color), ("fabric", &self.fabric)] {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!("{} is required", field)));
            }
        }
        Ok(())
    }

    pub fn into_item(self, id: String, created_at: DateTime<Utc>) -> ClothingItem {
        ClothingItem {
            id,
            title: self.title.trim().to_string(),
            category: self.category,
            color: self.color.trim().to_string(),
            fabric: self.fabric.trim().to_string(),
            fit: self.fit,
            design: self.design,
            brand: non_blank(self.brand),
            image_url: non_blank(self.image_url),
            notes: non_blank(self.notes),
            created_at,
        }
    }

    /// Autofill: copy every field the draft knows about, keep the rest as typed.
    pub fn apply_draft(&mut self, draft: &ItemDraft) {
        if let Some(title) = &draft.title {
            self.title = title.clone();
        }
        if let Some(category) = draft.category {
            self.category = category;
        }
        if let Some(color) = &draft.color {
            self.color = color.clone();
        }
        if let Some(fabric) = &draft.fabric {
            self.fabric = fabric.clone();
        }
        if let Some(fit) = draft.fit {
            self.fit = fit;
        }
        if let Some(design) = draft.design {
            self.design = Some(design);
        }
        if let Some(brand) = &draft.brand {
            self.brand = Some(brand.clone());
        }
        if let Some(notes) = &draft.notes {
            self.notes = Some(notes.clone());
        }
    }
}
