// File: stailist-core/tests/stylist_service_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::Notify;

use stailist_ai::{GenerationRequest, ModelProvider, Provider, StylistClient};
use stailist_common::models::{
    CallKind, ClothingCategory, ClothingItem, DEFAULT_REASONING, Fit, InlineImage, UserProfile,
    now_millis,
};
use stailist_core::{Error, StylistService};

mock! {
    Model {}
    #[async_trait]
    impl ModelProvider for Model {
        fn name(&self) -> &str;
        async fn generate_json(&self, request: &GenerationRequest) -> anyhow::Result<String>;
        async fn generate_image(&self, prompt: &str, reference: &InlineImage) -> anyhow::Result<Option<InlineImage>>;
    }
}

/// Holds every call until the test releases it.
struct GatedModel {
    gate: Arc<Notify>,
    answer: String,
}

#[async_trait]
impl ModelProvider for GatedModel {
    fn name(&self) -> &str {
        "gated"
    }

    async fn generate_json(&self, _request: &GenerationRequest) -> anyhow::Result<String> {
        self.gate.notified().await;
        Ok(self.answer.clone())
    }
}

fn wardrobe() -> Vec<ClothingItem> {
    vec![ClothingItem {
        id: "a1".into(),
        title: "Blue Hoodie".into(),
        category: ClothingCategory::Hoodie,
        color: "Blue".into(),
        fabric: "Cotton".into(),
        fit: Fit::Regular,
        design: None,
        brand: None,
        image_url: None,
        notes: None,
        created_at: now_millis(),
    }]
}

async fn service_with<P: ModelProvider + 'static>(model: P) -> StylistService {
    let registry = Provider::new();
    registry.register(model).await;
    StylistService::new(Arc::new(StylistClient::new(Arc::new(registry), "gemini")))
}

#[tokio::test]
async fn test_blank_vibe_is_rejected_without_calling_model() -> Result<(), Error> {
    let mut model = MockModel::new();
    model.expect_name().return_const("mock".to_string());
    model.expect_generate_json().times(0);
    let service = service_with(model).await;

    let result = service.recommend(&wardrobe(), &UserProfile::default(), "   \n").await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(!service.is_busy(CallKind::Recommendation));
    Ok(())
}

#[tokio::test]
async fn test_second_recommendation_while_in_flight_is_busy() -> Result<(), Error> {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        service_with(GatedModel {
            gate: gate.clone(),
            answer: r#"{"reasoning":"Cozy layers.","wardrobeItemIds":["a1"]}"#.to_string(),
        })
        .await,
    );

    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .recommend(&wardrobe(), &UserProfile::default(), "rainy tuesday")
                .await
        })
    };
    while !service.is_busy(CallKind::Recommendation) {
        tokio::task::yield_now().await;
    }

    let second = service
        .recommend(&wardrobe(), &UserProfile::default(), "sunny brunch")
        .await;
    assert!(matches!(second, Err(Error::Busy(CallKind::Recommendation))));
    // other kinds are independent
    assert!(!service.is_busy(CallKind::Autofill));

    gate.notify_one();
    let result = first.await.map_err(|e| Error::Ai(e.to_string()))??;
    assert_eq!(result.items.len(), 1);
    assert!(!service.is_busy(CallKind::Recommendation));

    gate.notify_one();
    let again = service
        .recommend(&wardrobe(), &UserProfile::default(), "sunny brunch")
        .await?;
    assert_eq!(again.reasoning, "Cozy layers.");
    Ok(())
}

#[tokio::test]
async fn test_failed_call_releases_flag() -> Result<(), Error> {
    let mut model = MockModel::new();
    model.expect_name().return_const("mock".to_string());
    let mut calls = 0;
    model.expect_generate_json().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Err(anyhow::anyhow!("timed out"))
        } else {
            Ok("{}".to_string())
        }
    });
    let service = service_with(model).await;

    let failed = service.recommend(&wardrobe(), &UserProfile::default(), "office").await;
    assert!(matches!(failed, Err(ref e) if e.is_retryable()));
    assert!(!service.is_busy(CallKind::Recommendation));

    let retried = service.recommend(&wardrobe(), &UserProfile::default(), "office").await?;
    assert_eq!(retried.reasoning, DEFAULT_REASONING);
    Ok(())
}

#[tokio::test]
async fn test_suggestions_fall_back_to_gaps() -> Result<(), Error> {
    let mut model = MockModel::new();
    model.expect_name().return_const("mock".to_string());
    model
        .expect_generate_json()
        .returning(|_| Err(anyhow::anyhow!("quota exceeded")));
    let service = service_with(model).await;

    let suggestions = service.suggest(&wardrobe(), &UserProfile::default()).await?;
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].item_type, "T-Shirt");
    assert_eq!(suggestions[0].recommended_attributes.color.as_deref(), Some("Blue"));
    assert!(!service.is_busy(CallKind::Suggestions));
    Ok(())
}

#[tokio::test]
async fn test_ai_suggestions_are_used_when_present() -> Result<(), Error> {
    let mut model = MockModel::new();
    model.expect_name().return_const("mock".to_string());
    model.expect_generate_json().returning(|_| {
        Ok(r#"{"suggestions":[{"itemType":"Chelsea boots","reason":"Dress up the hoodie"}]}"#.to_string())
    });
    let service = service_with(model).await;

    let suggestions = service.suggest(&wardrobe(), &UserProfile::default()).await?;
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].item_type, "Chelsea boots");
    Ok(())
}
