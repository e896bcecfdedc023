//! Wire format
//!
//! Both directions carry a flat JSON object mapping parameter keys to
//! scalars, e.g. `{"bpm":120,"brightness":200}`. Outbound messages only name
//! the keys being changed; inbound messages may be a full or partial snapshot.

use crate::params::{ParamKey, ParamPatch, ParamValue};
use std::fmt;

/// Why an inbound payload was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum InboundError {
    /// Not valid JSON
    Json(String),
    /// Valid JSON but not an object
    NotAnObject,
}

impl fmt::Display for InboundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid JSON: {}", e),
            Self::NotAnObject => write!(f, "payload is not a JSON object"),
        }
    }
}

/// Decoded inbound snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inbound {
    /// Known keys with usable values
    pub patch: ParamPatch,
    /// Keys skipped: unknown names or non-scalar values
    pub skipped: Vec<String>,
}

/// Encode a patch as one outbound text message
pub fn encode_patch(patch: &ParamPatch) -> String {
    let object: serde_json::Map<String, serde_json::Value> = patch
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), value.to_json()))
        .collect();
    serde_json::Value::Object(object).to_string()
}

/// Encode a single-key change
pub fn encode_change(key: ParamKey, value: &ParamValue) -> String {
    encode_patch(&ParamPatch::new().with(key, value.clone()))
}

/// Decode an inbound text message
///
/// Values are taken as received; there is no range or type checking beyond
/// requiring a JSON number or string.
pub fn decode_inbound(text: &str) -> Result<Inbound, InboundError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| InboundError::Json(e.to_string()))?;
    let serde_json::Value::Object(object) = value else {
        return Err(InboundError::NotAnObject);
    };

    let mut inbound = Inbound::default();
    for (name, raw) in &object {
        let key = name.parse::<ParamKey>().ok();
        match (key, ParamValue::from_json(raw)) {
            (Some(key), Some(value)) => inbound.patch.insert(key, value),
            _ => inbound.skipped.push(name.clone()),
        }
    }
    Ok(inbound)
}

/// Comma-separated key list for log lines
pub fn describe_keys(patch: &ParamPatch) -> String {
    patch
        .keys()
        .map(ParamKey::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
