//! Template and content loading
//!
//! Creating a window suspends until its template (and, for locator content,
//! the content itself) has been fetched. Nothing is mounted before both
//! resolve, so a failed load leaves no trace on the page.

use std::future::Future;

use crate::config::EngineConfig;
use crate::error::LoadError;

/// Where a window's content comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    /// No content block
    Empty,
    /// Inline markup
    Inline(String),
    /// Markup fetched from a locator
    Locator(String),
}

impl ContentSource {
    pub fn inline(markup: impl Into<String>) -> Self {
        ContentSource::Inline(markup.into())
    }

    pub fn locator(url: impl Into<String>) -> Self {
        ContentSource::Locator(url.into())
    }
}

/// Which template a window is built from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    #[default]
    Window,
    Dialog,
    ContextMenu,
}

/// Fetches markup by locator
pub trait ContentLoader {
    /// Fetch a resource as text, failing once `timeout_ms` has elapsed.
    fn fetch(&self, url: &str, timeout_ms: u32) -> impl Future<Output = Result<String, LoadError>>;
}

/// Everything needed to mount a window, resolved ahead of time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedWindow {
    pub title: String,
    pub kind: TemplateKind,
    pub template: String,
    pub content: Option<String>,
    pub modal: bool,
}

/// Resolve a window's template and content.
///
/// The content locator is fetched before the template, as the content is the
/// caller-specific part and the more likely to fail.
pub async fn load_window<L: ContentLoader + ?Sized>(
    loader: &L,
    config: &EngineConfig,
    title: &str,
    source: ContentSource,
    kind: TemplateKind,
    modal: bool,
) -> Result<LoadedWindow, LoadError> {
    let timeout = config.fetch_timeout_ms;

    let content = match source {
        ContentSource::Empty => None,
        ContentSource::Inline(markup) => Some(markup),
        ContentSource::Locator(url) => Some(loader.fetch(&url, timeout).await?),
    };

    let template_url = config.template_url(kind);
    let template = loader.fetch(&template_url, timeout).await?;
    log::debug!("[casement] loaded {:?} template from {}", kind, template_url);

    Ok(LoadedWindow {
        title: title.to_string(),
        kind,
        template,
        content,
        modal,
    })
}
