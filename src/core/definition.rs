//! Dictionary response model
//!
//! Turns the Free Dictionary API payload into the short list of definitions shown in the popup.

use serde::Deserialize;
use serde_json::Value;

use crate::shared::error::AppResult;

// -- Serde structs for the Free Dictionary API --

// Entries are decoded one at a time as the cap walks over them, so anything past the cap is
// never looked at.

#[derive(Debug, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DefinitionDetail {
    pub definition: String,
}

// -- View model --

/// One part-of-speech heading with the definitions rendered under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartOfSpeech {
    pub label: String,
    pub definitions: Vec<String>,
}

/// Result of interpreting a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionView {
    Found {
        word: String,
        parts: Vec<PartOfSpeech>,
    },
    /// Well-formed response without usable meanings. Not an error.
    NotFound { word: String },
}

impl DefinitionView {
    pub fn word(&self) -> &str {
        match self {
            DefinitionView::Found { word, .. } | DefinitionView::NotFound { word } => word,
        }
    }

    /// Number of definition lines across all parts of speech
    pub fn definition_count(&self) -> usize {
        match self {
            DefinitionView::Found { parts, .. } => {
                parts.iter().map(|p| p.definitions.len()).sum()
            }
            DefinitionView::NotFound { .. } => 0,
        }
    }
}

/// Interpret a decoded response body.
///
/// Only the first entry is used. A missing entry, a non-object entry, or `meanings` that is
/// absent, empty or not a list all yield `NotFound`. A meaning or definition that is reached
/// before the cap but can't be decoded is a `MalformedResponse`.
pub fn interpret(word: &str, body: &Value, max_definitions: usize) -> AppResult<DefinitionView> {
    let meanings = body
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|first| first.get("meanings"))
        .and_then(Value::as_array);

    match meanings {
        Some(meanings) if !meanings.is_empty() => Ok(DefinitionView::Found {
            word: word.to_string(),
            parts: collect_capped(meanings, max_definitions)?,
        }),
        _ => Ok(not_found(word)),
    }
}

/// Walk meanings in response order until `max` definitions have been taken in total.
///
/// The cap is checked before each heading and before each definition, so a heading is only
/// started while there is room left. A meaning with no `definitions` still gets its heading.
fn collect_capped(meanings: &[Value], max: usize) -> AppResult<Vec<PartOfSpeech>> {
    let mut parts = Vec::new();
    let mut included = 0;

    for raw_meaning in meanings {
        if included >= max {
            break;
        }

        let meaning = Meaning::deserialize(raw_meaning)?;
        let mut part = PartOfSpeech {
            label: meaning.part_of_speech.unwrap_or_default(),
            definitions: Vec::new(),
        };

        for raw_detail in &meaning.definitions {
            if included >= max {
                break;
            }
            let detail = DefinitionDetail::deserialize(raw_detail)?;
            part.definitions.push(detail.definition);
            included += 1;
        }

        parts.push(part);
    }

    Ok(parts)
}

fn not_found(word: &str) -> DefinitionView {
    DefinitionView::NotFound {
        word: word.to_string(),
    }
}
