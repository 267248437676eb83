use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// One review document as produced by the review backend.
///
/// Real documents are frequently partial: any field may be absent or carry
/// the wrong type. Deserialization is lenient per field: a malformed value
/// resolves to the field's default instead of rejecting the document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendReview {
    #[serde(deserialize_with = "lenient")]
    pub overall_recommendation: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub agents: Vec<BackendAgent>,
    #[serde(deserialize_with = "lenient")]
    pub metadata: BackendMetadata,
    #[serde(deserialize_with = "lenient")]
    pub pr_number: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub pr_title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendAgent {
    #[serde(deserialize_with = "lenient")]
    pub agent_name: String,
    #[serde(deserialize_with = "lenient")]
    pub risk_level: String,
    #[serde(deserialize_with = "lenient")]
    pub recommendation: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendMetadata {
    #[serde(deserialize_with = "lenient")]
    pub generated_at: String,
    #[serde(deserialize_with = "lenient")]
    pub took_ms: u64,
    #[serde(deserialize_with = "lenient")]
    pub model: String,
}

/// Parse one raw document into a `BackendReview`.
///
/// Invalid JSON and non-object top levels are rejected (the caller records
/// the document as skipped); any object is accepted, with absent or
/// wrong-typed fields resolved to defaults.
pub fn parse_review(raw: &str) -> Result<BackendReview> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::Document(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(Error::Document("top-level value is not an object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| Error::Document(format!("unexpected shape: {e}")))
}

/// Buffer the field as a `Value`, then fall back to `T::default()` when the
/// value has the wrong type.
fn lenient<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like `lenient`, but element-wise: a non-array yields an empty list, and
/// each malformed element falls back to its default independently.
fn lenient_vec<'de, D, T>(de: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect()),
        _ => Ok(Vec::new()),
    }
}
