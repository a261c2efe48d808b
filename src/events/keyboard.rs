use super::keys::{action_for_key, seed_from_unit, KeyAction};
use crate::dom;
use crate::frame::FrameContext;
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::Mode;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, ctx: &Rc<RefCell<FrameContext>>) {
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::ToggleMode => {
            let mut c = ctx.borrow_mut();
            let next = c.mode().toggled();
            c.set_mode(next);
            ev.prevent_default();
        }
        KeyAction::Form => ctx.borrow_mut().set_mode(Mode::Formed),
        KeyAction::Scatter => ctx.borrow_mut().set_mode(Mode::Chaos),
        KeyAction::Regenerate => {
            let seed = seed_from_unit(js_sys::Math::random());
            if let Err(e) = ctx.borrow_mut().regenerate(seed) {
                log::error!("[keys] regenerate failed: {}", e);
            }
        }
        KeyAction::ToggleHint => {
            if let Some(document) = dom::window_document() {
                overlay::toggle_hint(&document);
            }
        }
    }
}

pub fn wire_global_keydown(ctx: Rc<RefCell<FrameContext>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &ctx);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
