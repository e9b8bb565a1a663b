//! Job params submitted with a generation request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Page dimensions requested by the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDimensions {
    pub width: f64,
    pub height: f64,
}

/// Layout selection (e.g. `preserve_layout`, `print`, `png`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<LayoutDimensions>,
    /// Any further layout options, kept as submitted.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Decoded job params.
///
/// Known fields are typed; anything else is kept in `extra` and copied into
/// the report payload unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_source: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl JobParams {
    /// Convert a decoded RISON value into job params.
    pub fn from_value(value: JsonValue) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Encode as RISON, the form accepted by the generate endpoint.
    pub fn to_rison(&self) -> String {
        // Serializing plain data with string keys cannot fail.
        let value = serde_json::to_value(self).unwrap_or(JsonValue::Null);
        crate::rison::encode(&value)
    }

    /// Query string (`jobParams=...`) carrying these params, URL-encoded.
    pub fn to_query_string(&self) -> String {
        format!("jobParams={}", urlencoding::encode(&self.to_rison()))
    }

    /// Layout id, if one was given.
    pub fn layout_id(&self) -> Option<&str> {
        self.layout.as_ref().and_then(|l| l.id.as_deref())
    }
}
