//! Custom content blocks on a menu bar

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::{LoadError, MenuError};
use crate::window::WindowId;
use super::validate_name;

/// Future resolving to a widget's markup
pub type WidgetContent = LocalBoxFuture<'static, Result<String, LoadError>>;

/// Called once the widget is on the page, with the owning window and widget name
pub type AttachedCallback = Rc<dyn Fn(WindowId, &str)>;

/// A non-dropdown block rendered alongside the menu items
#[derive(Clone)]
pub struct MenuWidget {
    name: String,
    produce: Rc<dyn Fn() -> WidgetContent>,
    on_attached: Option<AttachedCallback>,
}

impl MenuWidget {
    /// Create a widget whose content comes from `produce` each time the bar is rendered
    pub fn new<F, Fut>(name: &str, produce: F) -> Result<Self, MenuError>
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<String, LoadError>> + 'static,
    {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            produce: Rc::new(move || produce().boxed_local()),
            on_attached: None,
        })
    }

    pub fn with_attached<F>(mut self, callback: F) -> Self
    where
        F: Fn(WindowId, &str) + 'static,
    {
        self.on_attached = Some(Rc::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start producing the content
    pub fn produce(&self) -> WidgetContent {
        (self.produce)()
    }

    pub fn on_attached(&self) -> Option<AttachedCallback> {
        self.on_attached.clone()
    }
}

impl fmt::Debug for MenuWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuWidget")
            .field("name", &self.name)
            .field("on_attached", &self.on_attached.is_some())
            .finish_non_exhaustive()
    }
}
