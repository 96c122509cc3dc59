//! Browser glue: task spawning, page visibility and blocking notices.
//!
//! Native builds (tests, tooling) get inert fallbacks: the page is always
//! visible and notices only go to the log.

use std::future::Future;

pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(future);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        dioxus::prelude::spawn(future);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn page_visible() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .map(|doc| doc.visibility_state() == web_sys::VisibilityState::Visible)
        .unwrap_or(true)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn page_visible() -> bool {
    true
}

/// Blocking user notice (`window.alert`).
pub fn alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if window.alert_with_message(message).is_err() {
                tracing::warn!("alert blocked: {message}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::warn!("notice: {message}");
    }
}

/// `visibilitychange` subscription; the listener is removed on drop.
pub struct VisibilityListener {
    #[cfg(target_arch = "wasm32")]
    inner: Option<(
        web_sys::Document,
        wasm_bindgen::closure::Closure<dyn FnMut()>,
    )>,
}

impl VisibilityListener {
    #[cfg(target_arch = "wasm32")]
    pub fn install(mut on_change: impl FnMut(bool) + 'static) -> Self {
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            tracing::warn!("document unavailable; auto-refresh visibility tracking disabled");
            return Self { inner: None };
        };

        let closure = Closure::<dyn FnMut()>::new(move || on_change(page_visible()));
        if document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("unable to listen for visibilitychange");
            return Self { inner: None };
        }
        Self {
            inner: Some((document, closure)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn install(on_change: impl FnMut(bool) + 'static) -> Self {
        let _ = on_change;
        Self {}
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for VisibilityListener {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;

        if let Some((document, closure)) = self.inner.take() {
            let _ = document.remove_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}

/// `window.labCode` injected by the page template.
#[cfg(target_arch = "wasm32")]
pub fn page_lab_code() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str("labCode"))
        .ok()?
        .as_string()
        .filter(|code| !code.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}
