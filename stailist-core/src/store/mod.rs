// File: src/store/mod.rs
//
// Pure state transitions for the wardrobe. No I/O happens here; the
// `WardrobeStore` applies these and then talks to the backend.

use stailist_common::models::{ClothingItem, UserProfile, WardrobeExport};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardrobeState {
    pub items: Vec<ClothingItem>,
    pub profile: UserProfile,
}

impl WardrobeState {
    pub fn get(&self, item_id: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.get(item_id).is_some()
    }

    pub fn to_export(&self) -> WardrobeExport {
        WardrobeExport {
            wardrobe: self.items.clone(),
            profile: self.profile.clone(),
        }
    }
}

impl From<WardrobeExport> for WardrobeState {
    fn from(data: WardrobeExport) -> Self {
        Self {
            items: data.wardrobe,
            profile: data.profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WardrobeAction {
    AddItem(ClothingItem),
    RemoveItem(String),
    /// Swap the item stored under `id` for `item`, keeping its position.
    ReplaceItem { id: String, item: ClothingItem },
    UpdateProfile(UserProfile),
    ReplaceAll(WardrobeExport),
}

pub fn reduce(mut state: WardrobeState, action: &WardrobeAction) -> WardrobeState {
    match action {
        WardrobeAction::AddItem(item) => {
            state.items.push(item.clone());
        }
        WardrobeAction::RemoveItem(item_id) => {
            state.items.retain(|item| &item.id != item_id);
        }
        WardrobeAction::ReplaceItem { id, item } => {
            if let Some(slot) = state.items.iter_mut().find(|existing| &existing.id == id) {
                *slot = item.clone();
            }
        }
        WardrobeAction::UpdateProfile(profile) => {
            state.profile = profile.clone();
        }
        WardrobeAction::ReplaceAll(data) => {
            state = WardrobeState::from(data.clone());
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use stailist_common::models::{ClothingCategory, Fit, now_millis};

    fn item(id: &str) -> ClothingItem {
        ClothingItem {
            id: id.into(),
            title: format!("Item {}", id),
            category: ClothingCategory::TShirt,
            color: "White".into(),
            fabric: "Cotton".into(),
            fit: Fit::Regular,
            design: None,
            brand: None,
            image_url: None,
            notes: None,
            created_at: now_millis(),
        }
    }

    #[test]
    fn test_add_then_remove() {
        let state = reduce(WardrobeState::default(), &WardrobeAction::AddItem(item("a")));
        let state = reduce(state, &WardrobeAction::AddItem(item("b")));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1].id, "b");

        let state = reduce(state, &WardrobeAction::RemoveItem("a".into()));
        assert_eq!(state.items.len(), 1);
        assert!(!state.contains("a"));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let before = reduce(WardrobeState::default(), &WardrobeAction::AddItem(item("a")));
        let after = reduce(before.clone(), &WardrobeAction::RemoveItem("zzz".into()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_replace_item_keeps_position() {
        let state = reduce(WardrobeState::default(), &WardrobeAction::AddItem(item("a")));
        let state = reduce(state, &WardrobeAction::AddItem(item("b")));
        let state = reduce(
            state,
            &WardrobeAction::ReplaceItem {
                id: "a".into(),
                item: item("server-1"),
            },
        );
        assert_eq!(state.items[0].id, "server-1");
        assert_eq!(state.items[1].id, "b");
    }

    #[test]
    fn test_replace_all_overwrites_everything() {
        let state = reduce(WardrobeState::default(), &WardrobeAction::AddItem(item("a")));
        let data = WardrobeExport {
            wardrobe: vec![item("x"), item("y")],
            profile: UserProfile {
                location: Some("Oslo".into()),
                ..Default::default()
            },
        };
        let state = reduce(state, &WardrobeAction::ReplaceAll(data.clone()));
        assert_eq!(state.to_export(), data);
    }
}
