use async_trait::async_trait;

use crate::error::Error;
use crate::models::{ClothingItem, UserProfile, WardrobeExport};

/// Where the wardrobe lives between sessions.
///
/// The store only ever talks to this trait; the REST backend and the local JSON
/// file are interchangeable behind it.
#[async_trait]
pub trait WardrobeBackend: Send + Sync {
    /// Short name for log lines and notices.
    fn name(&self) -> &str;

    async fn list_items(&self) -> Result<Vec<ClothingItem>, Error>;

    /// Returns the item as stored. Backends that assign their own ids hand back
    /// the new one and the caller re-keys its copy.
    async fn create_item(&self, item: &ClothingItem) -> Result<ClothingItem, Error>;

    /// Deleting an unknown id is not an error.
    async fn delete_item(&self, item_id: &str) -> Result<(), Error>;

    async fn get_profile(&self) -> Result<UserProfile, Error>;
    async fn update_profile(&self, profile: &UserProfile) -> Result<(), Error>;

    /// Bulk import: overwrite everything with `data`.
    async fn replace_all(&self, data: &WardrobeExport) -> Result<(), Error>;

    /// Profile fields this backend accepts but does not keep between sessions.
    fn unkept_profile_fields(&self, _profile: &UserProfile) -> Vec<&'static str> {
        Vec::new()
    }

    fn unkept_item_fields(&self, _item: &ClothingItem) -> Vec<&'static str> {
        Vec::new()
    }

    async fn load_all(&self) -> Result<WardrobeExport, Error> {
        let wardrobe = self.list_items().await?;
        let profile = self.get_profile().await?;
        Ok(WardrobeExport { wardrobe, profile })
    }
}
