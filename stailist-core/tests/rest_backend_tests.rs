// File: stailist-core/tests/rest_backend_tests.rs

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use stailist_common::models::{ClothingCategory, Fit, NewClothingItem, UserProfile};
use stailist_common::traits::WardrobeBackend;
use stailist_core::{Error, RestWardrobeBackend, WardrobeStore};

/// Serve `app` on an ephemeral local port and return its base URL.
async fn serve(app: Router) -> Result<String, Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

async fn backend_for(app: Router) -> Result<RestWardrobeBackend, Error> {
    RestWardrobeBackend::new(&serve(app).await?, 5)
}

#[tokio::test]
async fn test_list_reads_clothes_envelope() -> Result<(), Error> {
    let app = Router::new().route(
        "/api/clothing",
        get(|| async {
            Json(json!({
                "clothes": [{
                    "id": "0_1", "name": "Denim Jacket", "fabricType": "denim", "fit": "baggy",
                    "color": "blue", "type": "jacket", "graphicSize": "none"
                }]
            }))
        }),
    );
    let backend = backend_for(app).await?;

    let items = backend.list_items().await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "0_1");
    assert_eq!(items[0].title, "Denim Jacket");
    assert_eq!(items[0].category, ClothingCategory::Jacket);
    assert_eq!(items[0].fit, Fit::Baggy);
    Ok(())
}

#[tokio::test]
async fn test_error_status_carries_detail() -> Result<(), Error> {
    let app = Router::new().route(
        "/api/personal-info",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "detail": "x" }))) }),
    );
    let backend = backend_for(app).await?;

    match backend.update_profile(&UserProfile::default()).await {
        Err(Error::Backend { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "x");
        }
        other => panic!("expected a backend error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_delete_of_missing_item_succeeds() -> Result<(), Error> {
    let app = Router::new().route(
        "/api/clothing/{id}",
        delete(|Path(id): Path<String>| async move {
            if id == "gone" {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Clothing item not found" })))
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "disk full" })))
            }
        }),
    );
    let backend = backend_for(app).await?;

    backend.delete_item("gone").await?;
    assert!(matches!(
        backend.delete_item("other").await,
        Err(Error::Backend { status: 500, ref message }) if message == "disk full"
    ));
    Ok(())
}

#[tokio::test]
async fn test_profile_fields_the_api_drops_are_reported() -> Result<(), Error> {
    let received = Arc::new(Mutex::new(None::<Value>));
    let sink = received.clone();
    let app = Router::new().route(
        "/api/personal-info",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().await = Some(body);
                Json(json!({ "message": "Personal info updated successfully" }))
            }
        }),
    );
    let mut store = WardrobeStore::new(Arc::new(backend_for(app).await?));

    let profile = UserProfile {
        height: Some("180cm".into()),
        location: Some("Oslo".into()),
        photo: Some("data:image/jpeg;base64,AAAA".into()),
        ..Default::default()
    };
    let saved = store.update_profile(profile.clone()).await;

    assert_eq!(saved.value, profile);
    assert_eq!(store.profile(), &profile);
    let notice = saved.notice.unwrap_or_default();
    assert!(notice.contains("does not keep location, photo;"), "{notice}");

    let body = received.lock().await.clone().unwrap_or_default();
    assert_eq!(body, json!({ "height": "180cm" }));
    Ok(())
}

#[tokio::test]
async fn test_created_item_is_rekeyed_and_notes_stay_local() -> Result<(), Error> {
    let app = Router::new().route(
        "/api/clothing",
        post(|Json(body): Json<Value>| async move {
            let mut stored = body;
            stored["id"] = json!("0_7");
            Json(stored)
        }),
    );
    let mut store = WardrobeStore::new(Arc::new(backend_for(app).await?));

    let added = store
        .add_item(NewClothingItem {
            title: "Linen Shirt".into(),
            color: "White".into(),
            fabric: "Linen".into(),
            notes: Some("Dry clean only".into()),
            ..Default::default()
        })
        .await?;

    assert_eq!(added.value.id, "0_7");
    assert_eq!(added.value.notes.as_deref(), Some("Dry clean only"));
    assert_eq!(store.items()[0].id, "0_7");
    assert!(added.notice.is_some_and(|n| n.contains("notes")));
    Ok(())
}
