//! Brand context formatting.
//!
//! A brand profile is loosely structured external data. It is decoded into
//! typed fields exactly once, at this boundary; guidelines that fail to
//! parse become an explicit `Raw` variant instead of being poked at with
//! untyped lookups deeper in the pipeline.

use serde::{Deserialize, Serialize};

/// Optional brand profile attached to a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    /// Brand name
    pub name: String,

    /// Brand voice description
    pub voice: String,

    /// Optional guidelines, structured or raw
    #[serde(default)]
    pub guidelines: Option<BrandGuidelines>,
}

/// Brand guidelines, either decoded structure or opaque text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrandGuidelines {
    Structured {
        #[serde(rename = "keyMessages", default)]
        key_messages: Option<String>,
        #[serde(rename = "toneGuidelines", default)]
        tone_guidelines: Option<String>,
    },
    Raw(String),
}

impl BrandGuidelines {
    /// Decode guidelines from encoded text.
    ///
    /// Tries JSON first; anything that does not parse as an object becomes
    /// the raw fallback, so unparseable guidelines are preserved rather
    /// than dropped.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) if value.is_object() => Self::Structured {
                key_messages: value
                    .get("keyMessages")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                tone_guidelines: value
                    .get("toneGuidelines")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            },
            _ => Self::Raw(text.to_string()),
        }
    }
}

impl BrandProfile {
    /// Decode a profile from loosely structured JSON.
    ///
    /// External payloads carry guidelines either as a JSON object or as an
    /// encoded string; both shapes land in the typed enum here.
    pub fn from_json(value: &serde_json::Value) -> draftsmith_core::AppResult<Self> {
        let name = value
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let voice = value
            .get("voice")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let guidelines = match value.get("guidelines") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(BrandGuidelines::parse(text)),
            Some(other) => Some(serde_json::from_value(other.clone())?),
        };

        Ok(Self {
            name,
            voice,
            guidelines,
        })
    }
}

/// Format an optional brand profile into prompt text.
///
/// Pure function. Returns an empty string when no profile is supplied;
/// otherwise one line per present field.
pub fn brand_context(profile: Option<&BrandProfile>) -> String {
    let Some(profile) = profile else {
        return String::new();
    };

    let mut lines = vec![
        format!("Brand Name: {}", profile.name),
        format!("Brand Voice: {}", profile.voice),
    ];

    match &profile.guidelines {
        Some(BrandGuidelines::Structured {
            key_messages,
            tone_guidelines,
        }) => {
            if let Some(key_messages) = key_messages {
                lines.push(format!("Key Messages: {}", key_messages));
            }
            if let Some(tone_guidelines) = tone_guidelines {
                lines.push(format!("Tone Guidelines: {}", tone_guidelines));
            }
        }
        Some(BrandGuidelines::Raw(raw)) => {
            lines.push(format!("Brand Guidelines: {}", raw));
        }
        None => {}
    }

    lines.join("\n")
}
