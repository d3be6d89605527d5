use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use stailist_ai::{StylistClient, build_recommendation};
use stailist_common::models::{
    CallKind, ClothingItem, ClothingSuggestion, InlineImage, ItemDraft, RecommendationResult,
    UserProfile,
};

use crate::Error;
use crate::stats::{analyze_wardrobe, fallback_suggestions};

/// Clears its in-flight flag when dropped, whatever way the call ended.
struct InFlightGuard<'a> {
    kind: CallKind,
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        debug!("{} call finished", self.kind);
    }
}

/// Front door for the AI features. At most one call of each [`CallKind`] runs
/// at a time; a second one is refused with [`Error::Busy`] rather than queued.
pub struct StylistService {
    client: Arc<StylistClient>,
    in_flight: [AtomicBool; CallKind::ALL.len()],
}

impl StylistService {
    pub fn new(client: Arc<StylistClient>) -> Self {
        Self {
            client,
            in_flight: Default::default(),
        }
    }

    pub fn is_busy(&self, kind: CallKind) -> bool {
        self.in_flight[kind.index()].load(Ordering::Acquire)
    }

    fn begin(&self, kind: CallKind) -> Result<InFlightGuard<'_>, Error> {
        let flag = &self.in_flight[kind.index()];
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy(kind))?;
        debug!("{} call started", kind);
        Ok(InFlightGuard { kind, flag })
    }

    /// Pick an outfit for `vibe` from this wardrobe snapshot.
    pub async fn recommend(
        &self,
        wardrobe: &[ClothingItem],
        profile: &UserProfile,
        vibe: &str,
    ) -> Result<RecommendationResult, Error> {
        if vibe.trim().is_empty() {
            return Err(Error::InvalidInput("describe a vibe first".into()));
        }
        let _guard = self.begin(CallKind::Recommendation)?;
        let request = build_recommendation(wardrobe, profile, vibe);
        self.client.recommend(&request).await
    }

    pub async fn try_on(&self, profile: &UserProfile, outfit: &[ClothingItem]) -> Result<InlineImage, Error> {
        let _guard = self.begin(CallKind::TryOn)?;
        self.client.try_on(profile, outfit).await
    }

    pub async fn autofill_from_text(&self, query: &str) -> Result<ItemDraft, Error> {
        let _guard = self.begin(CallKind::Autofill)?;
        self.client.identify_from_text(query).await
    }

    pub async fn autofill_from_image(&self, image: InlineImage) -> Result<ItemDraft, Error> {
        let _guard = self.begin(CallKind::Autofill)?;
        self.client.identify_from_image(image).await
    }

    /// Purchase suggestions. Falls back to rule-based ones when the model
    /// fails or gives nothing usable.
    pub async fn suggest(
        &self,
        wardrobe: &[ClothingItem],
        profile: &UserProfile,
    ) -> Result<Vec<ClothingSuggestion>, Error> {
        let _guard = self.begin(CallKind::Suggestions)?;
        let analysis = analyze_wardrobe(wardrobe);

        match self.client.suggest(&analysis, profile).await {
            Ok(suggestions) if !suggestions.is_empty() => Ok(suggestions),
            Ok(_) => {
                info!("No usable AI suggestions, using wardrobe gaps");
                Ok(fallback_suggestions(&analysis))
            }
            Err(e) => {
                warn!("AI suggestions failed ({}), using wardrobe gaps", e);
                Ok(fallback_suggestions(&analysis))
            }
        }
    }
}
