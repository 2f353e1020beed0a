//! Browser bindings: the popup element, the document listeners and console logging.

mod console;
mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, MouseEvent, Node, Window};

pub use dom::DomPopup;

use crate::core::definition_client::DefinitionClient;
use crate::core::page::PageController;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::PopupSettings;
use crate::shared::types::Position;

type DomController = PageController<DomPopup, DefinitionClient>;

thread_local! {
    /// The page's controller, set once by `install`
    static CONTROLLER: RefCell<Option<Rc<DomController>>> = const { RefCell::new(None) };
}

pub(crate) fn dom_error(err: JsValue) -> AppError {
    AppError::Dom(format!("{:?}", err))
}

/// Create the popup and attach the `dblclick` and `click` listeners to the document.
///
/// Only one popup per page: a second call fails.
pub fn install(settings: PopupSettings) -> AppResult<()> {
    settings.validate()?;
    if CONTROLLER.with(|slot| slot.borrow().is_some()) {
        return Err(AppError::Dom(
            "definition popup is already installed".to_string(),
        ));
    }

    console::init_logging(&settings.log_level);

    let window = web_sys::window().ok_or_else(|| AppError::Dom("no global window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| AppError::Dom("window has no document".to_string()))?;

    let popup = DomPopup::create(&document, &settings.popup_id)?;
    let client = DefinitionClient::new(&settings);
    let controller = Rc::new(PageController::new(popup, client, &settings));

    let on_double_click = {
        let controller = controller.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let selection = current_selection(&window);
            let cursor = Position::new(f64::from(event.page_x()), f64::from(event.page_y()));

            match controller.begin_lookup(&selection, cursor) {
                Ok(pending) => {
                    let controller = controller.clone();
                    spawn_local(async move {
                        controller.complete_lookup(pending).await;
                    });
                }
                Err(e) => debug!("Lookup not started: {}", e),
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    };

    let on_click = {
        let controller = controller.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let inside = event
                .target()
                .and_then(|target| target.dyn_into::<Node>().ok())
                .map(|node| controller.popup().contains(&node))
                .unwrap_or(false);
            controller.handle_click(inside);
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    if let Err(e) = attach_listeners(&document, &on_double_click, &on_click) {
        // Leave the page as it was so a later install starts clean
        controller.popup().remove();
        return Err(e);
    }
    on_double_click.forget();
    on_click.forget();

    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
    info!("Definition popup installed as #{}", settings.popup_id);
    Ok(())
}

/// Attach both document listeners, or neither
fn attach_listeners(
    document: &Document,
    on_double_click: &Closure<dyn FnMut(MouseEvent)>,
    on_click: &Closure<dyn FnMut(MouseEvent)>,
) -> AppResult<()> {
    document
        .add_event_listener_with_callback("dblclick", on_double_click.as_ref().unchecked_ref())
        .map_err(dom_error)?;

    if let Err(e) =
        document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        let _ = document.remove_event_listener_with_callback(
            "dblclick",
            on_double_click.as_ref().unchecked_ref(),
        );
        return Err(dom_error(e));
    }

    Ok(())
}

/// Hide the popup, wherever the request came from
pub fn close_popup() {
    let controller = CONTROLLER.with(|slot| slot.borrow().clone());
    if let Some(controller) = controller {
        controller.close();
    }
}

fn current_selection(window: &Window) -> String {
    window
        .get_selection()
        .ok()
        .flatten()
        .map(|selection| String::from(selection.to_string()))
        .unwrap_or_default()
}
