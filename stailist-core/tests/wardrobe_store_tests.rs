// File: stailist-core/tests/wardrobe_store_tests.rs

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use stailist_common::models::{
    ClothingCategory, ClothingItem, Fit, NewClothingItem, UserProfile, WardrobeExport,
};
use stailist_common::traits::WardrobeBackend;
use stailist_core::{Error, WardrobeStore};

mock! {
    Backend {}
    #[async_trait]
    impl WardrobeBackend for Backend {
        fn name(&self) -> &str;
        async fn list_items(&self) -> Result<Vec<ClothingItem>, Error>;
        async fn create_item(&self, item: &ClothingItem) -> Result<ClothingItem, Error>;
        async fn delete_item(&self, item_id: &str) -> Result<(), Error>;
        async fn get_profile(&self) -> Result<UserProfile, Error>;
        async fn update_profile(&self, profile: &UserProfile) -> Result<(), Error>;
        async fn replace_all(&self, data: &WardrobeExport) -> Result<(), Error>;
    }
}

fn backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("test backend".to_string());
    backend
}

fn offline() -> Error {
    Error::Backend {
        status: 503,
        message: "service unavailable".into(),
    }
}

fn hoodie_form() -> NewClothingItem {
    NewClothingItem {
        title: "Blue Hoodie".into(),
        category: ClothingCategory::Hoodie,
        color: "Blue".into(),
        fabric: "Cotton".into(),
        fit: Fit::Regular,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_load_failure_starts_empty_with_notice() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_list_items().returning(|| Err(offline()));

    let store = WardrobeStore::load(Arc::new(mock)).await;
    assert!(store.items().is_empty());
    assert!(store.startup_notice().is_some_and(|n| n.contains("test backend")));
    Ok(())
}

#[tokio::test]
async fn test_load_reads_backend_state() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_list_items().returning(|| {
        Ok(vec![serde_json::from_value(serde_json::json!({"id": "a1", "title": "Tee"})).unwrap()])
    });
    mock.expect_get_profile().returning(|| {
        Ok(UserProfile {
            gender: Some("female".into()),
            ..Default::default()
        })
    });

    let store = WardrobeStore::load(Arc::new(mock)).await;
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.profile().gender.as_deref(), Some("female"));
    assert!(store.startup_notice().is_none());
    Ok(())
}

#[tokio::test]
async fn test_added_items_get_distinct_ids() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item()
        .times(2)
        .returning(|item| Ok(item.clone()));
    let mut store = WardrobeStore::new(Arc::new(mock));

    let first = store.add_item(hoodie_form()).await?;
    let second = store.add_item(hoodie_form()).await?;

    assert!(first.is_saved() && second.is_saved());
    assert_ne!(first.value.id, second.value.id);
    let ids: HashSet<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_form_is_rejected_before_backend() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().times(0);
    let mut store = WardrobeStore::new(Arc::new(mock));

    let form = NewClothingItem {
        color: String::new(),
        ..hoodie_form()
    };
    assert!(matches!(store.add_item(form).await, Err(Error::InvalidInput(_))));
    assert!(store.items().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_persistence_failure_keeps_memory_state() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().returning(|_| Err(offline()));
    mock.expect_delete_item().returning(|_| Err(offline()));
    mock.expect_update_profile().returning(|_| Err(offline()));
    let mut store = WardrobeStore::new(Arc::new(mock));

    let added = store.add_item(hoodie_form()).await?;
    assert!(!added.is_saved());
    assert_eq!(store.items().len(), 1);

    let profile = UserProfile {
        location: Some("Seattle".into()),
        ..Default::default()
    };
    let updated = store.update_profile(profile.clone()).await;
    assert!(updated.notice.is_some());
    assert_eq!(store.profile(), &profile);

    let removed = store.remove_item(&added.value.id).await;
    assert!(removed.value);
    assert!(removed.notice.is_some());
    assert!(store.items().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remove_unknown_id_is_noop() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().returning(|item| Ok(item.clone()));
    mock.expect_delete_item().times(0);
    let mut store = WardrobeStore::new(Arc::new(mock));
    store.add_item(hoodie_form()).await?;

    let before = store.state().clone();
    let removed = store.remove_item("does-not-exist").await;
    assert!(!removed.value);
    assert!(removed.is_saved());
    assert_eq!(store.state(), &before);
    Ok(())
}

#[tokio::test]
async fn test_backend_assigned_id_replaces_local_one() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().returning(|item| {
        Ok(ClothingItem {
            id: "server-7".into(),
            ..item.clone()
        })
    });
    let mut store = WardrobeStore::new(Arc::new(mock));

    let added = store.add_item(hoodie_form()).await?;
    assert_eq!(added.value.id, "server-7");
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].id, "server-7");
    Ok(())
}

#[tokio::test]
async fn test_invalid_import_leaves_state_untouched() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().returning(|item| Ok(item.clone()));
    mock.expect_replace_all().times(0);
    let mut store = WardrobeStore::new(Arc::new(mock));
    store.add_item(hoodie_form()).await?;
    let before = store.state().clone();

    for raw in [r#"{"profile":{}}"#, r#"{"clothes":"nope"}"#, "not json"] {
        assert!(matches!(store.import_json(raw).await, Err(Error::InvalidFile(_))));
        assert_eq!(store.state(), &before);
    }
    Ok(())
}

#[tokio::test]
async fn test_export_import_round_trip() -> Result<(), Error> {
    let mut mock = backend();
    mock.expect_create_item().returning(|item| Ok(item.clone()));
    mock.expect_update_profile().returning(|_| Ok(()));
    mock.expect_replace_all().times(1).returning(|_| Ok(()));
    let mut store = WardrobeStore::new(Arc::new(mock));

    store.add_item(hoodie_form()).await?;
    store
        .add_item(NewClothingItem {
            title: "Black Jeans".into(),
            category: ClothingCategory::Pants,
            color: "Black".into(),
            fabric: "Denim".into(),
            fit: Fit::Tight,
            notes: Some("Ripped knees".into()),
            ..Default::default()
        })
        .await?;
    store
        .update_profile(UserProfile {
            height: Some("175cm".into()),
            style_description: Some("Streetwear".into()),
            ..Default::default()
        })
        .await;

    let exported = store.export_json()?;
    let before = store.state().clone();

    let imported = store.import_json(&exported).await?;
    assert!(imported.is_saved());
    assert_eq!(imported.value.items_imported, 2);
    assert!(imported.value.profile_updated);
    assert_eq!(store.state(), &before);
    Ok(())
}
