//! Resource loading over `window.fetch`

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, RequestInit, Response};

use crate::content::ContentLoader;
use crate::error::LoadError;

/// Loader backed by the browser's fetch API.
///
/// A request still waiting for its response headers when the timeout
/// elapses is aborted.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchLoader;

impl ContentLoader for FetchLoader {
    async fn fetch(&self, url: &str, timeout_ms: u32) -> Result<String, LoadError> {
        fetch_text(url, timeout_ms).await
    }
}

fn request_error(url: &str, reason: impl Into<String>) -> LoadError {
    LoadError::Request {
        url: url.to_string(),
        reason: reason.into(),
    }
}

async fn fetch_text(url: &str, timeout_ms: u32) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or_else(|| request_error(url, "no window"))?;
    let controller =
        AbortController::new().map_err(|e| request_error(url, format!("{:?}", e)))?;
    let signal = controller.signal();

    let timed_out = Rc::new(Cell::new(false));
    let flag = timed_out.clone();
    let abort = Closure::once(move || {
        flag.set(true);
        controller.abort();
    });
    let timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            timeout_ms.min(i32::MAX as u32) as i32,
        )
        .map_err(|e| request_error(url, format!("{:?}", e)))?;

    let init = RequestInit::new();
    init.set_signal(Some(&signal));
    let result = JsFuture::from(window.fetch_with_str_and_init(url, &init)).await;
    window.clear_timeout_with_handle(timer);
    drop(abort);

    let response: Response = match result {
        Ok(value) => value
            .dyn_into()
            .map_err(|_| request_error(url, "fetch did not return a Response"))?,
        Err(_) if timed_out.get() => {
            return Err(LoadError::Timeout {
                url: url.to_string(),
                timeout_ms,
            })
        }
        Err(e) => return Err(request_error(url, format!("{:?}", e))),
    };

    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response
        .text()
        .map_err(|e| request_error(url, format!("{:?}", e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| request_error(url, format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| request_error(url, "response body is not text"))
}
