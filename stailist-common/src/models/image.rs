// File: stailist-common/src/models/image.rs

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An image carried inline as base64, the way both the browser apps and the
/// generative API pass pictures around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parses `data:<mime>;base64,<payload>`. A bare base64 payload is accepted as JPEG.
    pub fn from_data_url(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        let (mime_type, data) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| Error::InvalidInput("data URL has no payload".into()))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| Error::InvalidInput("only base64 data URLs are supported".into()))?;
                (mime.to_string(), payload.to_string())
            }
            None => ("image/jpeg".to_string(), raw.to_string()),
        };

        if data.is_empty() {
            return Err(Error::InvalidInput("image payload is empty".into()));
        }
        STANDARD
            .decode(&data)
            .map_err(|e| Error::InvalidInput(format!("image is not valid base64: {}", e)))?;

        Ok(Self { mime_type, data })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| Error::InvalidInput(format!("image is not valid base64: {}", e)))
    }
}
