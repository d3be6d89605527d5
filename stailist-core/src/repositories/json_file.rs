// File: src/repositories/json_file.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use stailist_common::models::{ClothingItem, UserProfile, WardrobeExport};
use stailist_common::traits::WardrobeBackend;

use crate::Error;
use crate::portability::check_item_ids;

/// Keeps the whole wardrobe in one JSON file, in the export document shape.
/// A missing file reads as an empty wardrobe; a file with blank or repeated
/// item ids is refused like an invalid import.
pub struct JsonFileBackend {
    path: PathBuf,
    // serialises read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<WardrobeExport, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(WardrobeExport::default()),
            Ok(raw) => {
                let data: WardrobeExport = serde_json::from_str(&raw)?;
                check_item_ids(&data.wardrobe)?;
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                Ok(WardrobeExport::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file and rename over the target.
    async fn write(&self, data: &WardrobeExport) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(data)?).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} item(s) to {}", data.wardrobe.len(), self.path.display());
        Ok(())
    }

    async fn modify<F>(&self, change: F) -> Result<(), Error>
    where
        F: FnOnce(&mut WardrobeExport) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        change(&mut data);
        self.write(&data).await
    }
}

#[async_trait]
impl WardrobeBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "local file"
    }

    async fn list_items(&self) -> Result<Vec<ClothingItem>, Error> {
        Ok(self.read().await?.wardrobe)
    }

    async fn create_item(&self, item: &ClothingItem) -> Result<ClothingItem, Error> {
        let stored = item.clone();
        self.modify(|data| data.wardrobe.push(item.clone())).await?;
        Ok(stored)
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), Error> {
        self.modify(|data| data.wardrobe.retain(|item| item.id != item_id))
            .await
    }

    async fn get_profile(&self) -> Result<UserProfile, Error> {
        Ok(self.read().await?.profile)
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), Error> {
        self.modify(|data| data.profile = profile.clone()).await
    }

    async fn replace_all(&self, data: &WardrobeExport) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        self.write(data).await
    }

    async fn load_all(&self) -> Result<WardrobeExport, Error> {
        self.read().await
    }
}
