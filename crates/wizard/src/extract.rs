//! Summary-marker extraction.
//!
//! The model appends `|||SUMMARY:{"field":"…","value":"…"}|||` to a reply
//! when it has learned something concrete. The marker is stripped from the
//! text shown to the user and turned into a [`SummaryUpdate`].

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// One field/value pair carried by a marker. The field name is not checked
/// here; [`crate::Summary::apply_update`] decides what to keep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryUpdate {
    pub field: String,
    pub value: String,
}

/// A model reply split into display text and an optional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub update: Option<SummaryUpdate>,
}

fn marker_regex() -> &'static Regex {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    // The object ends at the first `}`; nested objects never match.
    MARKER_RE.get_or_init(|| {
        Regex::new(r"\|\|\|SUMMARY:(\{[^}]+\})\|\|\|").expect("summary marker regex must compile")
    })
}

/// Split `raw` into display text and at most one summary update.
///
/// - no marker: text unchanged, no update
/// - valid marker: first marker removed, result trimmed, update returned
/// - marker that is valid JSON but lacks string `field`/`value`: marker
///   removed, no update
/// - malformed marker: text unchanged (marker left visible), no update
///
/// Only the first marker is considered; any later ones stay in the text.
pub fn extract(raw: &str) -> Extraction {
    let Some(caps) = marker_regex().captures(raw) else {
        return Extraction {
            text: raw.to_string(),
            update: None,
        };
    };

    let (Some(whole), Some(payload)) = (caps.get(0), caps.get(1)) else {
        return Extraction {
            text: raw.to_string(),
            update: None,
        };
    };

    let parsed = match serde_json::from_str::<serde_json::Value>(payload.as_str()) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, payload = %payload.as_str(), "malformed summary marker");
            return Extraction {
                text: raw.to_string(),
                update: None,
            };
        }
    };

    let update = match (parsed.get("field"), parsed.get("value")) {
        (Some(serde_json::Value::String(field)), Some(serde_json::Value::String(value))) => {
            Some(SummaryUpdate {
                field: field.clone(),
                value: value.clone(),
            })
        }
        _ => {
            tracing::debug!(payload = %payload.as_str(), "summary marker without string field/value");
            None
        }
    };

    let mut text = String::with_capacity(raw.len() - whole.len());
    text.push_str(&raw[..whole.start()]);
    text.push_str(&raw[whole.end()..]);
    Extraction {
        text: text.trim().to_string(),
        update,
    }
}
