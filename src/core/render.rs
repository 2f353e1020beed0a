//! HTML fragments for the popup.
//!
//! Three shapes: a found definition, a well-formed "no definition" answer, and the fallback
//! shown when the lookup itself failed. All of them end with the close control; its click
//! handler is attached by the DOM layer once the fragment is in the page.

use askama::Template;
use tracing::warn;

use crate::core::definition::{DefinitionView, PartOfSpeech};
use crate::shared::error::AppResult;

/// CSS class of the close control, used by the DOM layer to find it after insertion
pub const CLOSE_CONTROL_CLASS: &str = "close-btn";

/// Used only if the fallback template itself fails to render
const FALLBACK_PLAIN: &str = "No definition found.";

#[derive(Template)]
#[template(
    source = r#"<strong>{{ word }}</strong>
{%- for part in parts -%}
<em>{{ part.label }}</em>
{%- for definition in part.definitions -%}
<div class="definition">- {{ definition }}</div>
{%- endfor -%}
{%- endfor -%}
<button type="button" class="close-btn">×</button>"#,
    ext = "html"
)]
struct FoundTemplate<'a> {
    word: &'a str,
    parts: &'a [PartOfSpeech],
}

#[derive(Template)]
#[template(
    source = r#"<strong>{{ word }}</strong><br/><div class="definition">No definition found.</div><button type="button" class="close-btn">×</button>"#,
    ext = "html"
)]
struct NotFoundTemplate<'a> {
    word: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<strong>{{ word }}</strong><br/><div class="definition">No definition found for "{{ word }}".</div><button type="button" class="close-btn">×</button>"#,
    ext = "html"
)]
struct FallbackTemplate<'a> {
    word: &'a str,
}

pub fn render_view(view: &DefinitionView) -> AppResult<String> {
    let html = match view {
        DefinitionView::Found { word, parts } => FoundTemplate { word, parts }.render()?,
        DefinitionView::NotFound { word } => NotFoundTemplate { word }.render()?,
    };
    Ok(html)
}

/// Fragment shown when the lookup failed for any reason
pub fn render_fallback(word: &str) -> String {
    FallbackTemplate { word }.render().unwrap_or_else(|e| {
        warn!("Failed to render fallback for '{}': {}", word, e);
        FALLBACK_PLAIN.to_string()
    })
}
