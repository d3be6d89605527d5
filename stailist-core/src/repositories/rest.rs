// File: src/repositories/rest.rs
//
// Client for the wardrobe REST backend. The backend has its own field names
// and lower-case enum spellings, so items and the profile go through the
// `Api*` wire types below rather than the export document shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use stailist_common::models::{
    ClothingCategory, ClothingItem, Fit, GraphicSize, UserProfile, WardrobeExport,
};
use stailist_common::traits::WardrobeBackend;

use crate::Error;

/// Fabric values the backend accepts; anything else is sent as "other".
const API_FABRICS: [&str; 7] = ["cotton", "polyester", "wool", "denim", "leather", "silk", "linen"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiClothingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    fabric_type: String,
    #[serde(default)]
    fit: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    color: String,
    #[serde(rename = "type", default)]
    item_type: String,
    #[serde(default)]
    graphic_size: String,
    #[serde(default)]
    image_url: Option<String>,
}

fn api_category(category: ClothingCategory) -> &'static str {
    match category {
        ClothingCategory::Hoodie => "hoodie",
        ClothingCategory::TShirt => "t-shirt",
        ClothingCategory::Jacket => "jacket",
        ClothingCategory::Sweater => "sweater",
        ClothingCategory::Pants => "pants",
        ClothingCategory::Shorts => "shorts",
        ClothingCategory::Dress => "dress",
        ClothingCategory::Shoes | ClothingCategory::Other => "other",
    }
}

fn api_graphic_size(design: Option<GraphicSize>) -> &'static str {
    match design {
        Some(GraphicSize::Large) => "large",
        Some(GraphicSize::Subtle) => "small",
        Some(GraphicSize::None) | None => "none",
    }
}

fn api_fabric(fabric: &str) -> &'static str {
    let lowered = fabric.to_ascii_lowercase();
    API_FABRICS
        .iter()
        .find(|known| lowered.contains(*known))
        .copied()
        .unwrap_or("other")
}

impl ApiClothingItem {
    fn from_item(item: &ClothingItem, with_id: bool) -> Self {
        Self {
            id: with_id.then(|| item.id.clone()),
            name: item.display_name(),
            fabric_type: api_fabric(&item.fabric).to_string(),
            fit: item.fit.label().to_ascii_lowercase(),
            brand: item.brand.clone(),
            color: item.color.clone(),
            item_type: api_category(item.category).to_string(),
            graphic_size: api_graphic_size(item.design).to_string(),
            image_url: item.image_url.clone(),
        }
    }

    fn into_item(self) -> ClothingItem {
        ClothingItem {
            id: self.id.unwrap_or_default(),
            title: self.name,
            category: ClothingCategory::parse_loose(&self.item_type).unwrap_or_default(),
            color: self.color,
            fabric: self.fabric_type,
            fit: Fit::parse_loose(&self.fit).unwrap_or_default(),
            design: GraphicSize::parse_loose(&self.graphic_size),
            brand: self.brand.filter(|b| !b.trim().is_empty()),
            image_url: self.image_url,
            notes: None,
            created_at: Default::default(),
        }
    }
}

/// The backend's profile only has these fields. Age, location and the photo
/// stay local for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_style: Option<String>,
}

impl From<&UserProfile> for ApiPersonalInfo {
    fn from(profile: &UserProfile) -> Self {
        Self {
            gender: profile.gender.clone(),
            height: profile.height.clone(),
            weight: profile.weight.clone(),
            preferred_style: profile.style_description.clone(),
        }
    }
}

impl From<ApiPersonalInfo> for UserProfile {
    fn from(info: ApiPersonalInfo) -> Self {
        Self {
            height: info.height,
            weight: info.weight,
            gender: info.gender,
            style_description: info.preferred_style,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClothesEnvelope {
    #[serde(default)]
    clothes: Vec<ApiClothingItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiWardrobeData {
    clothes: Vec<ApiClothingItem>,
    personal_info: ApiPersonalInfo,
}

/// Talks to the wardrobe REST API (`/api/clothing`, `/api/personal-info`,
/// `/api/import-wardrobe`).
pub struct RestWardrobeBackend {
    client: Client,
    base: Url,
}

impl RestWardrobeBackend {
    pub fn new(api_base: &str, timeout_secs: u64) -> Result<Self, Error> {
        let mut base = Url::parse(api_base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        info!("Using wardrobe API at {}", base);
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base.join(path)?)
    }

    fn item_endpoint(&self, item_id: &str) -> Result<Url, Error> {
        let mut url = self.endpoint("api/clothing")?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("{} cannot be a base URL", self.base)))?
            .push(item_id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Backend {
            status: status.as_u16(),
            message: error_detail(&body).unwrap_or_else(|| status.to_string()),
        })
    }
}

/// FastAPI-style `{"detail": "..."}`, or the raw body if it is short text.
fn error_detail(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail") {
            return Some(match detail.as_str() {
                Some(text) => text.to_string(),
                None => detail.to_string(),
            });
        }
    }
    let body = body.trim();
    (!body.is_empty() && body.len() <= 200).then(|| body.to_string())
}

#[async_trait]
impl WardrobeBackend for RestWardrobeBackend {
    fn name(&self) -> &str {
        "wardrobe API"
    }

    fn unkept_profile_fields(&self, profile: &UserProfile) -> Vec<&'static str> {
        [("age", &profile.age), ("location", &profile.location), ("photo", &profile.photo)]
            .into_iter()
            .filter(|(_, value)| UserProfile::known(value).is_some())
            .map(|(name, _)| name)
            .collect()
    }

    fn unkept_item_fields(&self, item: &ClothingItem) -> Vec<&'static str> {
        match item.notes.as_deref().map(str::trim) {
            Some(notes) if !notes.is_empty() => vec!["notes"],
            _ => Vec::new(),
        }
    }

    async fn list_items(&self) -> Result<Vec<ClothingItem>, Error> {
        let url = self.endpoint("api/clothing")?;
        let envelope: ClothesEnvelope = self.send(self.client.get(url)).await?.json().await?;
        debug!("Fetched {} item(s)", envelope.clothes.len());
        Ok(envelope.clothes.into_iter().map(ApiClothingItem::into_item).collect())
    }

    async fn create_item(&self, item: &ClothingItem) -> Result<ClothingItem, Error> {
        let url = self.endpoint("api/clothing")?;
        let body = ApiClothingItem::from_item(item, false);
        let stored: ApiClothingItem = self.send(self.client.post(url).json(&body)).await?.json().await?;

        // keep local-only fields the backend does not store
        Ok(ClothingItem {
            notes: item.notes.clone(),
            created_at: item.created_at,
            fabric: item.fabric.clone(),
            ..stored.into_item()
        })
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), Error> {
        let url = self.item_endpoint(item_id)?;
        match self.send(self.client.delete(url)).await {
            Ok(_) => Ok(()),
            Err(Error::Backend { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!("Item {} was already gone", item_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn get_profile(&self) -> Result<UserProfile, Error> {
        let url = self.endpoint("api/personal-info")?;
        let info: ApiPersonalInfo = self.send(self.client.get(url)).await?.json().await?;
        Ok(info.into())
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), Error> {
        let url = self.endpoint("api/personal-info")?;
        self.send(self.client.post(url).json(&ApiPersonalInfo::from(profile)))
            .await?;
        Ok(())
    }

    async fn replace_all(&self, data: &WardrobeExport) -> Result<(), Error> {
        let url = self.endpoint("api/import-wardrobe")?;
        let body = ApiWardrobeData {
            clothes: data
                .wardrobe
                .iter()
                .map(|item| ApiClothingItem::from_item(item, true))
                .collect(),
            personal_info: ApiPersonalInfo::from(&data.profile),
        };
        self.send(self.client.post(url).json(&body)).await?;
        info!("Imported {} item(s) into the wardrobe API", data.wardrobe.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stailist_common::models::now_millis;

    #[test]
    fn test_item_uses_backend_spelling() {
        let item = ClothingItem {
            id: "a1".into(),
            title: "Graphic Tee".into(),
            category: ClothingCategory::TShirt,
            color: "White".into(),
            fabric: "Organic Cotton".into(),
            fit: Fit::Baggy,
            design: Some(GraphicSize::Subtle),
            brand: None,
            image_url: None,
            notes: None,
            created_at: now_millis(),
        };
        let value = serde_json::to_value(ApiClothingItem::from_item(&item, false)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Graphic Tee",
                "fabricType": "cotton",
                "fit": "baggy",
                "brand": null,
                "color": "White",
                "type": "t-shirt",
                "graphicSize": "small",
                "imageUrl": null
            })
        );
    }

    #[test]
    fn test_backend_item_maps_back() {
        let api: ApiClothingItem = serde_json::from_value(json!({
            "id": "0_42", "name": "Old Shirt", "fabricType": "linen", "fit": "tight",
            "color": "blue", "type": "shirt", "graphicSize": "large"
        }))
        .unwrap();
        let item = api.into_item();
        assert_eq!(item.id, "0_42");
        assert_eq!(item.category, ClothingCategory::Other);
        assert_eq!(item.fit, Fit::Tight);
        assert_eq!(item.design, Some(GraphicSize::Large));
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail":"Clothing item not found"}"#).as_deref(),
            Some("Clothing item not found")
        );
        assert_eq!(error_detail("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_detail(""), None);
    }

    #[test]
    fn test_item_endpoint_escapes_id() -> Result<(), Error> {
        let backend = RestWardrobeBackend::new("http://localhost:8000", 5)?;
        assert_eq!(backend.base_url().as_str(), "http://localhost:8000/");
        let url = backend.item_endpoint("a b/c")?;
        assert_eq!(url.as_str(), "http://localhost:8000/api/clothing/a%20b%2Fc");
        Ok(())
    }
}
