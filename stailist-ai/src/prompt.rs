//! Prompt builders for every generative call the stylist makes.
//!
//! Builders are pure: they turn a wardrobe/profile snapshot into a prompt plus
//! the JSON schema of the answer. Sending it is up to a [`ModelProvider`].
//!
//! [`ModelProvider`]: crate::traits::ModelProvider

use stailist_common::Error;
use stailist_common::models::{
    ClothingCategory, ClothingItem, Fit, InlineImage, MAX_REASONING_WORDS, RecommendationRequest,
    UserProfile, WardrobeAnalysis,
};

use crate::models::SchemaProperty;
use crate::schema::object_schema;
use crate::traits::GenerationRequest;

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    UserProfile::known(value).unwrap_or(placeholder)
}

fn category_choices() -> String {
    ClothingCategory::ALL
        .iter()
        .filter(|c| **c != ClothingCategory::Other)
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fit_choices() -> String {
    Fit::ALL
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per item: title, category, color, fit and the id the model must echo back.
pub fn wardrobe_line(item: &ClothingItem) -> String {
    format!(
        "- {} (Type: {}, Color: {}, Fit: {}, ID: {})",
        item.display_name(),
        item.category,
        item.color,
        item.fit,
        item.id
    )
}

pub fn profile_summary(profile: &UserProfile) -> String {
    format!(
        "- Location: {}\n- Gender: {}\n- Age: {}\n- Body: {}, {}\n- Style: {}",
        or_placeholder(&profile.location, "Unknown"),
        or_placeholder(&profile.gender, "Not specified"),
        or_placeholder(&profile.age, "Not specified"),
        or_placeholder(&profile.height, "?"),
        or_placeholder(&profile.weight, "?"),
        or_placeholder(&profile.style_description, "No specific style"),
    )
}

pub fn recommendation_schema() -> serde_json::Value {
    object_schema(&[
        SchemaProperty::string(
            "reasoning",
            &format!("Why this outfit works for the vibe, at most {} words", MAX_REASONING_WORDS),
        ),
        SchemaProperty::string_array(
            "wardrobeItemIds",
            "IDs of the chosen wardrobe items, copied exactly from the list",
        ),
    ])
}

/// Compose the outfit request. `vibe` is expected to be non-blank; the stylist
/// service checks that before calling.
pub fn build_recommendation(
    wardrobe: &[ClothingItem],
    profile: &UserProfile,
    vibe: &str,
) -> RecommendationRequest {
    let vibe = vibe.trim();

    let wardrobe_section = if wardrobe.is_empty() {
        "No items available. The wardrobe is empty, so return an empty wardrobeItemIds list.".to_string()
    } else {
        wardrobe.iter().map(wardrobe_line).collect::<Vec<_>>().join("\n")
    };

    let prompt = format!(
        "You are a personal stylist.\n\
         \n\
         USER PROFILE:\n\
         {profile}\n\
         \n\
         USER WARDROBE:\n\
         {wardrobe}\n\
         \n\
         REQUESTED VIBE: \"{vibe}\"\n\
         \n\
         TASK:\n\
         Select the best outfit combination from the available wardrobe items that matches the vibe.\n\
         Only use items present in the wardrobe list and only return IDs exactly as listed. Do not invent items.\n\
         \n\
         OUTPUT JSON:\n\
         {{\n\
         \x20 \"reasoning\": \"A very short explanation (MAX {max_words} words) of why this outfit works for the vibe.\",\n\
         \x20 \"wardrobeItemIds\": [\"id_of_item_1\", \"id_of_item_2\"]\n\
         }}",
        profile = profile_summary(profile),
        wardrobe = wardrobe_section,
        vibe = vibe,
        max_words = MAX_REASONING_WORDS,
    );

    RecommendationRequest {
        wardrobe: wardrobe.to_vec(),
        profile: profile.clone(),
        vibe: vibe.to_string(),
        prompt,
        response_schema: recommendation_schema(),
    }
}

fn text_identification_schema() -> serde_json::Value {
    object_schema(&[
        SchemaProperty::string("officialTitle", "A nice looking title for the item"),
        SchemaProperty::string("brand", "The brand name").optional(),
        SchemaProperty::string("type", "The kind of clothing"),
        SchemaProperty::string("material", "What it is made of"),
        SchemaProperty::string("fit", "How it fits"),
        SchemaProperty::string("color", "The main color"),
        SchemaProperty::string("technicalNotes", "Any extra info").optional(),
    ])
}

fn image_identification_schema() -> serde_json::Value {
    object_schema(&[
        SchemaProperty::string("title", "A short name, e.g. \"Blue Denim Jacket\""),
        SchemaProperty::string("type", "The kind of clothing"),
        SchemaProperty::string("color", "The main color"),
        SchemaProperty::string("fabric", "Best guess at the material"),
        SchemaProperty::string("fit", "Best guess at the fit"),
        SchemaProperty::string("brand", "Brand if a logo is visible").optional(),
        SchemaProperty::string("graphicSize", "None, Subtle or Large Graphic").optional(),
        SchemaProperty::string("specialNotes", "Graphics, patterns or other details").optional(),
    ])
}

/// Autofill from a typed name such as "nike tech fleece grey".
pub fn build_identify_from_text(query: &str) -> GenerationRequest {
    let prompt = format!(
        "I need you to act as a fashion expert.\n\
         I have a clothing item described as: \"{query}\".\n\
         \n\
         Figure out the specific details for this item so it can be added to a wardrobe database.\n\
         \n\
         Return a JSON object with these exact keys:\n\
         - officialTitle: A nice looking title for the item\n\
         - brand: The brand name, or null if unknown\n\
         - type: One of these: {types}\n\
         - material: What is it made of?\n\
         - fit: One of these: {fits}\n\
         - color: The main color\n\
         - technicalNotes: Any extra info",
        query = query.trim(),
        types = category_choices(),
        fits = fit_choices(),
    );

    GenerationRequest::text(prompt).with_schema(text_identification_schema())
}

/// Autofill from a photo of the item (or of someone wearing it).
pub fn build_identify_from_image(image: InlineImage) -> GenerationRequest {
    let prompt = format!(
        "Look at this photo. It's a piece of clothing (or someone wearing it).\n\
         Extract the attributes needed to save it to a closet app.\n\
         If there are multiple items, pick the main one (like the shirt or jacket).\n\
         \n\
         Return a JSON object:\n\
         - title: A short name (e.g. \"Blue Denim Jacket\")\n\
         - type: Must be one of: {types}\n\
         - color: The main color\n\
         - fabric: Guess the material (Cotton, Denim, etc)\n\
         - fit: Guess the fit ({fits})\n\
         - brand: Guess the brand if you see a logo, otherwise null\n\
         - graphicSize: None, Subtle or Large Graphic\n\
         - specialNotes: Mention any graphics or patterns",
        types = category_choices(),
        fits = fit_choices(),
    );

    GenerationRequest::text(prompt)
        .with_schema(image_identification_schema())
        .with_image(image)
}

/// Everything the image model needs to dress the user in an outfit.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnRequest {
    pub photo: InlineImage,
    pub outfit_description: String,
    pub prompt: String,
}

/// Build a try-on request from the profile photo and the resolved outfit.
pub fn build_try_on(photo: Option<&str>, outfit: &[ClothingItem]) -> Result<TryOnRequest, Error> {
    let photo = photo
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::InvalidInput("add a profile photo before trying on an outfit".into()))?;
    let photo = InlineImage::from_data_url(photo)?;

    let outfit_description = outfit
        .iter()
        .map(|item| format!("{} {}", item.color, item.category).trim().to_string())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if outfit_description.is_empty() {
        return Err(Error::InvalidInput("there is no outfit to try on".into()));
    }

    let prompt = format!(
        "Edit this photo so the person is wearing the following outfit: {}.\n\
         Keep the person's face, body shape, pose and the background unchanged.\n\
         Make the clothes look realistic, with natural lighting and folds.",
        outfit_description
    );

    Ok(TryOnRequest {
        photo,
        outfit_description,
        prompt,
    })
}

fn suggestions_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "itemType": { "type": "string" },
                        "reason": { "type": "string" },
                        "recommendedAttributes": {
                            "type": "object",
                            "properties": {
                                "color": { "type": "string" },
                                "fit": { "type": "string" },
                                "fabric": { "type": "string" },
                                "reasoning": { "type": "string" }
                            }
                        }
                    },
                    "required": ["itemType", "reason"]
                }
            }
        },
        "required": ["suggestions"]
    })
}

/// "What should I buy next?" prompt built from the gap analysis.
pub fn build_suggestions_request(analysis: &WardrobeAnalysis, profile: &UserProfile) -> GenerationRequest {
    let gaps = if analysis.gaps.is_empty() {
        "none".to_string()
    } else {
        analysis.gaps.join(", ")
    };

    let prompt = format!(
        "You are a personal stylist helping someone grow their wardrobe.\n\
         \n\
         USER PROFILE:\n\
         {profile}\n\
         \n\
         WARDROBE ANALYSIS:\n\
         - Total items: {total}\n\
         - Most common color: {color}\n\
         - Most common type: {category}\n\
         - Most common fabric: {fabric}\n\
         - Missing types: {gaps}\n\
         \n\
         Suggest up to 3 new clothing items that would complement this wardrobe.\n\
         Return a JSON object with a \"suggestions\" array. Each suggestion has\n\
         \"itemType\", \"reason\" and \"recommendedAttributes\" (color, fit, fabric, reasoning).",
        profile = profile_summary(profile),
        total = analysis.total_items,
        color = analysis.most_common_color.as_deref().unwrap_or("unknown"),
        category = analysis.most_common_category.as_deref().unwrap_or("unknown"),
        fabric = analysis.most_common_fabric.as_deref().unwrap_or("unknown"),
        gaps = gaps,
    );

    GenerationRequest::text(prompt).with_schema(suggestions_schema())
}
