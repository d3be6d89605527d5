use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use stailist_common::models::{
    ClothingItem, ImportSummary, NewClothingItem, UserProfile, WardrobeExport, now_millis,
};
use stailist_common::traits::WardrobeBackend;

use crate::Error;
use crate::portability;
use crate::store::{WardrobeAction, WardrobeState, reduce};

/// The result of a mutation plus a notice for the user when the backend could
/// not be updated or did not keep every field. The in-memory change has
/// happened either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub notice: Option<String>,
}

impl<T> Persisted<T> {
    fn saved(value: T) -> Self {
        Self { value, notice: None }
    }

    fn unsaved(value: T, notice: String) -> Self {
        Self {
            value,
            notice: Some(notice),
        }
    }

    /// True when the backend holds everything the session does.
    pub fn is_saved(&self) -> bool {
        self.notice.is_none()
    }
}

/// Owns the wardrobe for one session and is the only thing that changes it.
///
/// Every mutation goes through [`reduce`] first, then to the backend. A backend
/// failure is reported as a notice and never rolls the in-memory state back.
pub struct WardrobeStore {
    backend: Arc<dyn WardrobeBackend>,
    state: WardrobeState,
    startup_notice: Option<String>,
}

impl WardrobeStore {
    /// An empty store that has not read anything from `backend`.
    pub fn new(backend: Arc<dyn WardrobeBackend>) -> Self {
        Self {
            backend,
            state: WardrobeState::default(),
            startup_notice: None,
        }
    }

    /// Start a session from whatever `backend` holds. If that fails the session
    /// starts empty and [`startup_notice`](Self::startup_notice) says why.
    pub async fn load(backend: Arc<dyn WardrobeBackend>) -> Self {
        let mut store = Self::new(backend);
        match store.backend.load_all().await {
            Ok(data) => {
                info!(
                    "Loaded {} item(s) from {}",
                    data.wardrobe.len(),
                    store.backend.name()
                );
                store.dispatch(&WardrobeAction::ReplaceAll(data));
            }
            Err(e) => {
                warn!("Could not load wardrobe from {}: {}", store.backend.name(), e);
                store.startup_notice = Some(format!(
                    "Could not load your wardrobe from {}; starting empty. ({})",
                    store.backend.name(),
                    e
                ));
            }
        }
        store
    }

    pub fn startup_notice(&self) -> Option<&str> {
        self.startup_notice.as_deref()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn state(&self) -> &WardrobeState {
        &self.state
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.state.items
    }

    pub fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    fn dispatch(&mut self, action: &WardrobeAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn unsaved_notice(&self, what: &str, err: &Error) -> String {
        warn!("Failed to persist {} to {}: {}", what, self.backend.name(), err);
        format!(
            "Your {} was kept for this session, but {} could not save it: {}",
            what,
            self.backend.name(),
            err
        )
    }

    fn partial_notice(&self, what: &str, fields: &[&str]) -> Option<String> {
        if fields.is_empty() {
            return None;
        }
        info!("{} does not keep {} of the {}", self.backend.name(), fields.join(", "), what);
        Some(format!(
            "Your {} was saved to {}, but it does not keep {}; those last for this session only.",
            what,
            self.backend.name(),
            fields.join(", ")
        ))
    }

    fn saved_item(&self, item: ClothingItem) -> Persisted<ClothingItem> {
        let notice = self.partial_notice("new item", &self.backend.unkept_item_fields(&item));
        Persisted { value: item, notice }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.state.contains(&id) {
                return id;
            }
        }
    }

    /// Validate the form, give it an id and a timestamp, and add it.
    pub async fn add_item(&mut self, form: NewClothingItem) -> Result<Persisted<ClothingItem>, Error> {
        form.validate()?;
        let item = form.into_item(self.fresh_id(), now_millis());
        debug!("Adding item '{}' ({})", item.title, item.id);
        self.dispatch(&WardrobeAction::AddItem(item.clone()));

        match self.backend.create_item(&item).await {
            Ok(stored) if stored.id != item.id && !stored.id.is_empty() => {
                debug!("{} stored '{}' as {}", self.backend.name(), item.id, stored.id);
                self.dispatch(&WardrobeAction::ReplaceItem {
                    id: item.id.clone(),
                    item: stored.clone(),
                });
                Ok(self.saved_item(stored))
            }
            Ok(_) => Ok(self.saved_item(item)),
            Err(e) => {
                let notice = self.unsaved_notice("new item", &e);
                Ok(Persisted::unsaved(item, notice))
            }
        }
    }

    /// Remove by id. `value` is false when the id was not in the wardrobe, in
    /// which case nothing changes and the backend is not contacted.
    pub async fn remove_item(&mut self, item_id: &str) -> Persisted<bool> {
        if !self.state.contains(item_id) {
            debug!("Remove ignored, no item with id {}", item_id);
            return Persisted::saved(false);
        }
        self.dispatch(&WardrobeAction::RemoveItem(item_id.to_string()));

        match self.backend.delete_item(item_id).await {
            Ok(()) => Persisted::saved(true),
            Err(e) => {
                let notice = self.unsaved_notice("removal", &e);
                Persisted::unsaved(true, notice)
            }
        }
    }

    /// Replace the whole profile.
    pub async fn update_profile(&mut self, profile: UserProfile) -> Persisted<UserProfile> {
        self.dispatch(&WardrobeAction::UpdateProfile(profile.clone()));

        match self.backend.update_profile(&profile).await {
            Ok(()) => {
                let notice = self.partial_notice("profile", &self.backend.unkept_profile_fields(&profile));
                Persisted { value: profile, notice }
            }
            Err(e) => {
                let notice = self.unsaved_notice("profile", &e);
                Persisted::unsaved(profile, notice)
            }
        }
    }

    /// Overwrite wardrobe and profile with an already validated document.
    pub async fn replace_all(&mut self, data: WardrobeExport) -> Persisted<()> {
        info!("Replacing wardrobe with {} item(s)", data.wardrobe.len());
        self.dispatch(&WardrobeAction::ReplaceAll(data.clone()));

        match self.backend.replace_all(&data).await {
            Ok(()) => {
                let mut fields = self.backend.unkept_profile_fields(&data.profile);
                if data
                    .wardrobe
                    .iter()
                    .any(|item| !self.backend.unkept_item_fields(item).is_empty())
                {
                    fields.push("item notes");
                }
                Persisted {
                    value: (),
                    notice: self.partial_notice("imported wardrobe", &fields),
                }
            }
            Err(e) => {
                let notice = self.unsaved_notice("imported wardrobe", &e);
                Persisted::unsaved((), notice)
            }
        }
    }

    /// Validate and apply an export document. An invalid document is rejected
    /// before anything changes.
    pub async fn import_json(&mut self, raw: &str) -> Result<Persisted<ImportSummary>, Error> {
        let (data, summary) = portability::parse_import(raw, &self.state.profile)?;
        let persisted = self.replace_all(data).await;
        Ok(Persisted {
            value: summary,
            notice: persisted.notice,
        })
    }

    pub fn export_json(&self) -> Result<String, Error> {
        portability::export_document(&self.state)
    }
}
