//! In-memory resource loader

use std::cell::RefCell;
use std::collections::HashMap;

use crate::content::ContentLoader;
use crate::error::LoadError;
use super::{CONTEXT_MENU_TEMPLATE, DIALOG_TEMPLATE, WINDOW_TEMPLATE};

/// Serves markup from a map and records every request.
///
/// Unknown locators answer with status 404.
#[derive(Debug, Default)]
pub struct MockLoader {
    resources: RefCell<HashMap<String, Result<String, LoadError>>>,
    requests: RefCell<Vec<String>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader preloaded with the default templates at their default locators
    pub fn with_templates() -> Self {
        let loader = Self::new();
        loader.insert("./window.html", WINDOW_TEMPLATE);
        loader.insert("./dialog.html", DIALOG_TEMPLATE);
        loader.insert("./context_menu.html", CONTEXT_MENU_TEMPLATE);
        loader
    }

    pub fn insert(&self, url: &str, body: &str) {
        self.resources
            .borrow_mut()
            .insert(url.to_string(), Ok(body.to_string()));
    }

    /// Make every fetch of `url` fail with `error`
    pub fn fail(&self, url: &str, error: LoadError) {
        self.resources.borrow_mut().insert(url.to_string(), Err(error));
    }

    /// Locators fetched so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl ContentLoader for MockLoader {
    async fn fetch(&self, url: &str, _timeout_ms: u32) -> Result<String, LoadError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.resources.borrow().get(url) {
            Some(result) => result.clone(),
            None => Err(LoadError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
