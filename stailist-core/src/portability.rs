//! Bulk export and import of the wardrobe document.
//!
//! Export writes `{ "wardrobe": [...], "profile": {...} }`. Import also reads the
//! `clothes` / `personalInfo` spelling and validates the whole document before
//! returning anything, so a rejected file never leaves a half-applied state.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use stailist_common::models::{ClothingItem, ImportSummary, UserProfile, WardrobeExport};

use crate::Error;
use crate::store::WardrobeState;

const WARDROBE_KEYS: [&str; 2] = ["wardrobe", "clothes"];
const PROFILE_KEYS: [&str; 2] = ["profile", "personalInfo"];

pub fn export_document(state: &WardrobeState) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(&state.to_export())?)
}

fn invalid(reason: impl Into<String>) -> Error {
    let reason = reason.into();
    warn!("Rejected import: {}", reason);
    Error::InvalidFile(reason)
}

fn first_key<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

/// Every item needs a non-blank id that no other item in the list shares.
pub fn check_item_ids(items: &[ClothingItem]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(Error::InvalidFile(format!("item {} has an empty id", idx)));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(Error::InvalidFile(format!("duplicate item id '{}'", item.id)));
        }
    }
    Ok(())
}

/// Validate an import document. `current_profile` is kept when the document
/// carries no profile.
pub fn parse_import(
    raw: &str,
    current_profile: &UserProfile,
) -> Result<(WardrobeExport, ImportSummary), Error> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| invalid(format!("not a valid wardrobe export file ({})", e)))?;

    let obj = doc
        .as_object()
        .ok_or_else(|| invalid("the file does not contain a JSON object"))?;

    let list = match first_key(obj, &WARDROBE_KEYS) {
        Some(list @ Value::Array(_)) => list.clone(),
        Some(_) => return Err(invalid("the wardrobe field is not a list")),
        None => return Err(invalid("the file has no wardrobe list")),
    };

    let wardrobe: Vec<ClothingItem> = serde_path_to_error::deserialize(list)
        .map_err(|e| invalid(format!("bad item at {}: {}", e.path(), e.inner())))?;

    check_item_ids(&wardrobe).inspect_err(|e| warn!("Rejected import: {}", e))?;

    let (profile, profile_updated) = match first_key(obj, &PROFILE_KEYS) {
        Some(Value::Null) | None => (current_profile.clone(), false),
        Some(value) => {
            let profile: UserProfile = serde_path_to_error::deserialize(value.clone())
                .map_err(|e| invalid(format!("bad profile at {}: {}", e.path(), e.inner())))?;
            (profile, true)
        }
    };

    let summary = ImportSummary {
        items_imported: wardrobe.len(),
        profile_updated,
    };
    Ok((WardrobeExport { wardrobe, profile }, summary))
}

pub async fn write_export(path: &Path, state: &WardrobeState) -> Result<(), Error> {
    let doc = export_document(state)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, doc).await?;
    info!("Exported {} item(s) to {}", state.items.len(), path.display());
    Ok(())
}

pub async fn read_import_file(path: &Path) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| invalid(format!("could not read {} ({})", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_or_non_list_wardrobe() {
        let profile = UserProfile::default();
        for raw in [
            r#"{"profile":{}}"#,
            r#"{"clothes":{"a":1}}"#,
            r#"{"wardrobe":"lots"}"#,
            r#"[1,2]"#,
            "garbage",
        ] {
            assert!(
                matches!(parse_import(raw, &profile), Err(Error::InvalidFile(_))),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn test_bad_item_reports_its_path() {
        let raw = r#"{"wardrobe":[{"id":"a1","title":"ok"},{"title":"no id"}]}"#;
        match parse_import(raw, &UserProfile::default()) {
            Err(Error::InvalidFile(msg)) => assert!(msg.contains("[1]"), "{msg}"),
            other => panic!("expected InvalidFile, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"{"wardrobe":[{"id":"a1"},{"id":"a1"}]}"#;
        assert!(matches!(
            parse_import(raw, &UserProfile::default()),
            Err(Error::InvalidFile(msg)) if msg.contains("a1")
        ));
    }

    #[test]
    fn test_missing_profile_keeps_current() {
        let current = UserProfile {
            location: Some("Lisbon".into()),
            ..Default::default()
        };
        let (data, summary) = parse_import(r#"{"clothes":[]}"#, &current).unwrap();
        assert_eq!(data.profile, current);
        assert!(!summary.profile_updated);
        assert_eq!(summary.items_imported, 0);
    }

    #[test]
    fn test_backend_spelling_is_accepted() {
        let raw = r#"{
            "clothes": [{"id":"1","name":"Tee","type":"t-shirt","color":"white","fabricType":"cotton","fit":"regular","graphicSize":"none"}],
            "personalInfo": {"gender":"male","preferredStyle":"minimal"}
        }"#;
        let (data, summary) = parse_import(raw, &UserProfile::default()).unwrap();
        assert_eq!(data.wardrobe[0].title, "Tee");
        assert_eq!(data.profile.style_description.as_deref(), Some("minimal"));
        assert!(summary.profile_updated);
    }
}
