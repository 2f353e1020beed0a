//! Double-click a word on any page to see its dictionary definition in a small popup.
//!
//! The crate builds to a wasm module for the browser. The page-independent parts (response
//! interpretation, fragment rendering, the page controller) also compile natively so they can
//! be tested without a browser.

pub mod core;
pub mod shared;

#[cfg(target_arch = "wasm32")]
mod system;

pub use crate::core::definition::{DefinitionView, PartOfSpeech};
pub use crate::core::definition_client::{DefinitionClient, DefinitionSource};
pub use crate::core::page::{PageController, PendingLookup};
pub use crate::core::popup::{PopupState, PopupSurface};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::settings::PopupSettings;
pub use crate::shared::types::Position;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Create the popup and start listening for double-clicks.
///
/// `settings_json` is an optional JSON object with any of the `PopupSettings` fields.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn install(settings_json: Option<String>) -> Result<(), JsValue> {
    let settings = match settings_json {
        Some(json) => PopupSettings::from_json(&json),
        None => Ok(PopupSettings::default()),
    }
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    system::install(settings).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Hide the popup if it is showing
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = hidePopup)]
pub fn hide_popup() {
    system::close_popup();
}
