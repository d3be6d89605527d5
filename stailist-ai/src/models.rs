use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// Default request timeout for generative calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration for an AI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The type of provider ("gemini" or "openai")
    pub provider_type: String,

    /// Base URL for API requests
    pub api_base: Option<String>,

    /// API key for authentication
    pub api_key: String,

    /// Default model to use with this provider
    pub default_model: String,

    /// Whole-request timeout; a stuck call resolves to an error instead of hanging
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional provider-specific options (e.g. `image_model`)
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl ProviderConfig {
    pub fn new(
        provider_type: impl Into<String>,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider_type: provider_type.into(),
            api_base: None,
            api_key: api_key.into(),
            default_model: default_model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            options: HashMap::new(),
        }
    }
}

/// Describes one property of a structured-output schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Name of the property
    pub name: String,

    /// Description shown to the model
    pub description: String,

    /// JSON type of the property (string, array, ...)
    pub property_type: String,

    /// Element type for arrays
    pub items: Option<String>,

    /// Whether the model must always fill it in
    pub required: bool,

    /// Whether `null` is an acceptable answer
    pub nullable: bool,
}

impl SchemaProperty {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            property_type: "string".to_string(),
            items: None,
            required: true,
            nullable: false,
        }
    }

    pub fn string_array(name: &str, description: &str) -> Self {
        Self {
            property_type: "array".to_string(),
            items: Some("string".to_string()),
            ..Self::string(name, description)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self.nullable = true;
        self
    }
}
