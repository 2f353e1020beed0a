//! Page controller
//!
//! Owns the one popup for the page and reacts to the two events that matter: a double-click
//! (look up the selection and show it) and any click (dismiss when it lands outside the popup).

use std::cell::{Cell, Ref, RefCell};

use tracing::{debug, info, warn};

use crate::core::definition_client::DefinitionSource;
use crate::core::popup::PopupSurface;
use crate::core::render;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::PopupSettings;
use crate::shared::types::Position;

/// A lookup that passed the synchronous checks and is waiting on the network
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLookup {
    pub word: String,
    pub position: Position,
    generation: u64,
}

pub struct PageController<P, S> {
    popup: RefCell<P>,
    source: S,
    cursor_offset: f64,
    discard_stale_responses: bool,
    generation: Cell<u64>,
}

impl<P: PopupSurface, S: DefinitionSource> PageController<P, S> {
    pub fn new(popup: P, source: S, settings: &PopupSettings) -> Self {
        Self {
            popup: RefCell::new(popup),
            source,
            cursor_offset: settings.cursor_offset,
            discard_stale_responses: settings.discard_stale_responses,
            generation: Cell::new(0),
        }
    }

    pub fn popup(&self) -> Ref<'_, P> {
        self.popup.borrow()
    }

    /// Synchronous half of the double-click handler.
    ///
    /// Trims the selection and computes where the popup goes. An empty selection is
    /// `EmptySelection` and nothing else happens: no request, no popup change.
    pub fn begin_lookup(&self, selection: &str, cursor: Position) -> AppResult<PendingLookup> {
        let word = selection.trim();
        if word.is_empty() {
            debug!("Double-click without a selection, ignoring");
            return Err(AppError::EmptySelection);
        }

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        Ok(PendingLookup {
            word: word.to_string(),
            position: cursor.offset_by(self.cursor_offset),
            generation,
        })
    }

    /// Asynchronous half: fetch, then show the definition or the fallback.
    ///
    /// Overlapping lookups are not cancelled; whichever finishes last wins unless
    /// `discard_stale_responses` is set.
    pub async fn complete_lookup(&self, pending: PendingLookup) {
        let content = match self.source.fetch_definition(&pending.word).await {
            Ok(html) => html,
            Err(e) => {
                info!("No definition for '{}': {}", pending.word, e);
                render::render_fallback(&pending.word)
            }
        };

        if self.discard_stale_responses && pending.generation != self.generation.get() {
            debug!(
                "Dropping stale response for '{}' (lookup {} superseded by {})",
                pending.word,
                pending.generation,
                self.generation.get()
            );
            return;
        }

        if let Err(e) = self.popup.borrow_mut().show(&content, pending.position) {
            warn!("Failed to show popup: {}", e);
        }
    }

    /// Full double-click handler
    pub async fn handle_double_click(&self, selection: &str, cursor: Position) -> AppResult<()> {
        let pending = self.begin_lookup(selection, cursor)?;
        self.complete_lookup(pending).await;
        Ok(())
    }

    /// Click handler. Hides the popup if it is shown and the click landed outside it.
    ///
    /// Returns whether the popup was hidden.
    pub fn handle_click(&self, inside_popup: bool) -> bool {
        let mut popup = self.popup.borrow_mut();
        if !popup.is_shown() || inside_popup {
            return false;
        }

        match popup.hide() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to hide popup: {}", e);
                false
            }
        }
    }

    /// Close control: hide regardless of where the click landed
    pub fn close(&self) {
        if let Err(e) = self.popup.borrow_mut().hide() {
            warn!("Failed to hide popup: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::popup::PopupState;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    /// Answers from a fixed table and counts calls
    struct ScriptedSource {
        answers: HashMap<String, AppResult<String>>,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(answers: Vec<(&str, AppResult<String>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(word, answer)| (word.to_string(), answer))
                    .collect(),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl DefinitionSource for ScriptedSource {
        async fn fetch_definition(&self, word: &str) -> AppResult<String> {
            self.calls.set(self.calls.get() + 1);
            self.answers
                .get(word)
                .cloned()
                .unwrap_or(Err(AppError::LookupFailed(404)))
        }
    }

    /// Each word resolves when its channel is fed, so tests choose the completion order
    struct GatedSource {
        gates: RefCell<HashMap<String, oneshot::Receiver<String>>>,
    }

    #[async_trait(?Send)]
    impl DefinitionSource for GatedSource {
        async fn fetch_definition(&self, word: &str) -> AppResult<String> {
            let gate = self.gates.borrow_mut().remove(word);
            match gate {
                Some(rx) => rx.await.map_err(|e| AppError::Network(e.to_string())),
                None => Err(AppError::LookupFailed(404)),
            }
        }
    }

    fn controller<S: DefinitionSource>(
        source: S,
        settings: &PopupSettings,
    ) -> PageController<PopupState, S> {
        PageController::new(PopupState::new(), source, settings)
    }

    #[tokio::test]
    async fn test_double_click_shows_definition_near_cursor() {
        let source = ScriptedSource::new(vec![("cat", Ok("<strong>cat</strong>".to_string()))]);
        let page = controller(source, &PopupSettings::default());

        page.handle_double_click("  cat \n", Position::new(100.0, 200.0))
            .await
            .unwrap();

        let popup = page.popup();
        assert!(popup.is_shown());
        assert_eq!(popup.content, "<strong>cat</strong>");
        assert_eq!(popup.position, Position::new(105.0, 205.0));
    }

    #[tokio::test]
    async fn test_empty_selection_does_nothing() {
        let source = ScriptedSource::new(vec![]);
        let page = controller(source, &PopupSettings::default());

        for selection in ["", "   ", "\n\t"] {
            let result = page
                .handle_double_click(selection, Position::new(1.0, 1.0))
                .await;
            assert_eq!(result, Err(AppError::EmptySelection));
        }

        assert_eq!(page.source.calls.get(), 0); // No request made
        assert_eq!(*page.popup(), PopupState::new());
    }

    #[tokio::test]
    async fn test_empty_selection_leaves_visible_popup_alone() {
        let source = ScriptedSource::new(vec![("dog", Ok("dog html".to_string()))]);
        let page = controller(source, &PopupSettings::default());

        page.handle_double_click("dog", Position::new(10.0, 10.0))
            .await
            .unwrap();
        let before = page.popup().clone();

        let _ = page.handle_double_click(" ", Position::new(50.0, 50.0)).await;

        assert_eq!(*page.popup(), before);
    }

    #[tokio::test]
    async fn test_lookup_failure_shows_fallback() {
        let source = ScriptedSource::new(vec![]);
        let page = controller(source, &PopupSettings::default());

        page.handle_double_click("word", Position::new(0.0, 0.0))
            .await
            .unwrap();

        let popup = page.popup();
        assert!(popup.is_shown());
        assert!(popup.content.contains(r#"No definition found for "word"."#));
        assert!(!popup.content.contains("404"));
    }

    #[tokio::test]
    async fn test_malformed_response_shows_fallback() {
        let source = ScriptedSource::new(vec![(
            "cat",
            Err(AppError::MalformedResponse("bad".to_string())),
        )]);
        let page = controller(source, &PopupSettings::default());

        page.handle_double_click("cat", Position::new(0.0, 0.0))
            .await
            .unwrap();

        assert_eq!(page.popup().content, render::render_fallback("cat"));
    }

    #[tokio::test]
    async fn test_click_outside_hides_popup() {
        let source = ScriptedSource::new(vec![("cat", Ok("cat".to_string()))]);
        let page = controller(source, &PopupSettings::default());
        page.handle_double_click("cat", Position::new(0.0, 0.0))
            .await
            .unwrap();

        assert!(page.handle_click(false));
        assert!(!page.popup().is_shown());
    }

    #[tokio::test]
    async fn test_click_inside_keeps_popup() {
        let source = ScriptedSource::new(vec![("cat", Ok("cat".to_string()))]);
        let page = controller(source, &PopupSettings::default());
        page.handle_double_click("cat", Position::new(0.0, 0.0))
            .await
            .unwrap();

        assert!(!page.handle_click(true));
        assert!(page.popup().is_shown());
    }

    #[test]
    fn test_click_while_hidden_is_noop() {
        let page = controller(ScriptedSource::new(vec![]), &PopupSettings::default());
        assert!(!page.handle_click(false));
        assert!(!page.popup().is_shown());
    }

    #[tokio::test]
    async fn test_close_hides_even_from_inside() {
        let source = ScriptedSource::new(vec![("cat", Ok("cat".to_string()))]);
        let page = controller(source, &PopupSettings::default());
        page.handle_double_click("cat", Position::new(0.0, 0.0))
            .await
            .unwrap();

        page.close();
        assert!(!page.popup().is_shown());

        page.close(); // Idempotent
        assert!(!page.popup().is_shown());
    }

    #[test]
    fn test_begin_lookup_uses_configured_offset() {
        let settings = PopupSettings {
            cursor_offset: 12.0,
            ..PopupSettings::default()
        };
        let page = controller(ScriptedSource::new(vec![]), &settings);

        let pending = page.begin_lookup("cat", Position::new(1.0, 2.0)).unwrap();
        assert_eq!(pending.word, "cat");
        assert_eq!(pending.position, Position::new(13.0, 14.0));
    }

    fn gated(words: &[&str]) -> (GatedSource, HashMap<String, oneshot::Sender<String>>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for word in words {
            let (tx, rx) = oneshot::channel();
            gates.insert(word.to_string(), rx);
            senders.insert(word.to_string(), tx);
        }
        (
            GatedSource {
                gates: RefCell::new(gates),
            },
            senders,
        )
    }

    #[tokio::test]
    async fn test_last_to_resolve_wins_by_default() {
        let (source, mut senders) = gated(&["first", "second"]);
        let page = controller(source, &PopupSettings::default());

        let first = page.begin_lookup("first", Position::new(0.0, 0.0)).unwrap();
        let second = page.begin_lookup("second", Position::new(50.0, 50.0)).unwrap();

        // Newer lookup resolves first, the older one resolves last
        senders.remove("second").unwrap().send("second html".to_string()).unwrap();
        senders.remove("first").unwrap().send("first html".to_string()).unwrap();

        page.complete_lookup(second).await;
        page.complete_lookup(first).await;

        let popup = page.popup();
        assert_eq!(popup.content, "first html");
        assert_eq!(popup.position, Position::new(5.0, 5.0));
    }

    #[tokio::test]
    async fn test_stale_response_dropped_when_enabled() {
        let (source, mut senders) = gated(&["first", "second"]);
        let settings = PopupSettings {
            discard_stale_responses: true,
            ..PopupSettings::default()
        };
        let page = controller(source, &settings);

        let first = page.begin_lookup("first", Position::new(0.0, 0.0)).unwrap();
        let second = page.begin_lookup("second", Position::new(50.0, 50.0)).unwrap();

        senders.remove("second").unwrap().send("second html".to_string()).unwrap();
        senders.remove("first").unwrap().send("first html".to_string()).unwrap();

        page.complete_lookup(second).await;
        page.complete_lookup(first).await;

        let popup = page.popup();
        assert_eq!(popup.content, "second html");
        assert_eq!(popup.position, Position::new(55.0, 55.0));
    }

    #[tokio::test]
    async fn test_response_after_dismissal_still_renders() {
        let (source, mut senders) = gated(&["cat", "dog"]);
        let page = controller(source, &PopupSettings::default());

        let first = page.begin_lookup("cat", Position::new(0.0, 0.0)).unwrap();
        senders.remove("cat").unwrap().send("cat html".to_string()).unwrap();
        page.complete_lookup(first).await;
        assert!(page.popup().is_shown());

        // Second lookup starts, then the user clicks away before it settles
        let second = page.begin_lookup("dog", Position::new(40.0, 40.0)).unwrap();
        assert!(page.handle_click(false));
        assert!(!page.popup().is_shown());

        senders.remove("dog").unwrap().send("dog html".to_string()).unwrap();
        page.complete_lookup(second).await;

        let popup = page.popup();
        assert!(popup.is_shown());
        assert_eq!(popup.content, "dog html");
        assert_eq!(popup.position, Position::new(45.0, 45.0));
    }
}
