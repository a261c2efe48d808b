use crate::constants::{HINT_OVERLAY_ID, MODE_LABEL_ID};
use tree_core::Mode;
use web_sys as web;

/// Show the current mode in the status label, if the page has one.
pub fn set_mode_label(document: &web::Document, mode: Mode) {
    if let Some(el) = document.get_element_by_id(MODE_LABEL_ID) {
        el.set_text_content(Some(mode.label()));
        let cl = el.class_list();
        _ = cl.toggle_with_force("formed", mode.is_formed());
    }
}

#[inline]
pub fn is_hint_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(HINT_OVERLAY_ID) {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

#[inline]
pub fn toggle_hint(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_OVERLAY_ID) {
        let cl = el.class_list();
        if is_hint_hidden(document) {
            _ = cl.remove_1("hidden");
            // fallback for environments without CSS class
            _ = el.set_attribute("style", "");
        } else {
            _ = cl.add_1("hidden");
            _ = el.set_attribute("style", "display:none");
        }
    }
}
