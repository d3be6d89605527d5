// File: stailist-common/src/models/export.rs

use serde::{Deserialize, Serialize};

use crate::models::clothing::ClothingItem;
use crate::models::profile::UserProfile;

/// The bulk export/import document.
///
/// Written as `{ "wardrobe": [...], "profile": {...} }`; the backend's
/// `clothes`/`personalInfo` spelling is read as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardrobeExport {
    #[serde(alias = "clothes")]
    pub wardrobe: Vec<ClothingItem>,

    #[serde(default, alias = "personalInfo")]
    pub profile: UserProfile,
}

/// Outcome of a successful import, for the user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub items_imported: usize,
    pub profile_updated: bool,
}
