use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, Node};

use super::{close_popup, dom_error};
use crate::core::popup::PopupSurface;
use crate::core::render::CLOSE_CONTROL_CLASS;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::Position;

/// The popup `<div>` appended to `<body>`
pub struct DomPopup {
    element: HtmlElement,
    /// Listener on the close control of the current fragment. Replaced on every `show`,
    /// since setting the content discards the previous control.
    close_listener: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl DomPopup {
    pub fn create(document: &Document, id: &str) -> AppResult<Self> {
        let element = document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AppError::Dom("created element is not an HtmlElement".to_string()))?;

        element.set_id(id);
        let style = element.style();
        style.set_property("display", "none").map_err(dom_error)?;
        // left/top only take effect on a positioned element
        style.set_property("position", "absolute").map_err(dom_error)?;

        let body = document
            .body()
            .ok_or_else(|| AppError::Dom("document has no body".to_string()))?;
        body.append_child(&element).map_err(dom_error)?;

        Ok(Self {
            element,
            close_listener: None,
        })
    }

    /// Take the element out of the document
    pub fn remove(&self) {
        self.element.remove();
    }

    /// Whether `node` is the popup or one of its descendants
    pub fn contains(&self, node: &Node) -> bool {
        self.element.contains(Some(node))
    }

    fn wire_close_control(&mut self) -> AppResult<()> {
        let selector = format!(".{}", CLOSE_CONTROL_CLASS);
        let Some(control) = self.element.query_selector(&selector).map_err(dom_error)? else {
            self.close_listener = None;
            return Ok(());
        };

        let listener = Closure::wrap(Box::new(|_event: MouseEvent| {
            close_popup();
        }) as Box<dyn FnMut(MouseEvent)>);
        control
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(dom_error)?;

        self.close_listener = Some(listener);
        Ok(())
    }

    fn set_display(&self, value: &str) -> AppResult<()> {
        self.element
            .style()
            .set_property("display", value)
            .map_err(dom_error)
    }
}

impl PopupSurface for DomPopup {
    fn show(&mut self, content: &str, position: Position) -> AppResult<()> {
        let style = self.element.style();
        style
            .set_property("left", &position.css_left())
            .map_err(dom_error)?;
        style
            .set_property("top", &position.css_top())
            .map_err(dom_error)?;

        self.element.set_inner_html(content);
        self.wire_close_control()?;

        self.set_display("block")
    }

    fn hide(&mut self) -> AppResult<()> {
        self.set_display("none")
    }

    fn is_shown(&self) -> bool {
        self.element
            .style()
            .get_property_value("display")
            .map(|value| value == "block")
            .unwrap_or(false)
    }
}
