//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Detecting a blocking surface (open modal) that should pause play

/// Selector for surfaces that suspend the game while shown
pub const MODAL_SELECTOR: &str = ".modal";

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a fresh run
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

/// Whether any modal is currently displayed (shown modals use `display: flex`)
#[cfg(target_arch = "wasm32")]
pub fn blocking_surface_visible(document: &web_sys::Document) -> bool {
    use wasm_bindgen::JsCast;

    let Ok(modals) = document.query_selector_all(MODAL_SELECTOR) else {
        return false;
    };
    (0..modals.length())
        .filter_map(|i| modals.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .any(|el| {
            el.style()
                .get_property_value("display")
                .is_ok_and(|display| display == "flex")
        })
}
