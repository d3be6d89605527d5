// File: stailist-common/src/models/profile.rs

use serde::{Deserialize, Serialize};

/// Personal details used to steer recommendations. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Mostly useful for weather-driven vibes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, alias = "preferredStyle", skip_serializing_if = "Option::is_none")]
    pub style_description: Option<String>,

    /// Only used for try-on rendering.
    #[serde(rename = "userPhoto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl UserProfile {
    /// Returns the trimmed value, treating blank strings as unknown.
    pub fn known(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.height,
            &self.weight,
            &self.age,
            &self.gender,
            &self.location,
            &self.style_description,
            &self.photo,
        ]
        .iter()
        .all(|field| Self::known(field).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_personal_info_is_accepted() {
        let profile: UserProfile = serde_json::from_value(json!({
            "gender": "female",
            "height": "170cm",
            "preferredStyle": "streetwear",
            "otherDescription": "ignored"
        }))
        .unwrap();
        assert_eq!(profile.style_description.as_deref(), Some("streetwear"));
        assert_eq!(profile.height.as_deref(), Some("170cm"));
        assert!(profile.location.is_none());
    }

    #[test]
    fn test_blank_fields_count_as_unknown() {
        let profile = UserProfile {
            gender: Some("  ".into()),
            ..Default::default()
        };
        assert!(profile.is_empty());
        assert_eq!(UserProfile::known(&profile.gender), None);
    }
}
