//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::content::TemplateKind;

/// Default stacking increment; the odd value in between is left for overlays.
pub const DEFAULT_STACK_STEP: u32 = 2;

/// Default deadline for template and content fetches.
pub const DEFAULT_FETCH_TIMEOUT_MS: u32 = 10_000;

/// Configuration for a [`WindowEngine`](crate::WindowEngine)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Locator prefix the templates are resolved against (the library's own location)
    pub template_base: String,
    /// Template for plain windows
    pub window_template: String,
    /// Template for dialogs
    pub dialog_template: String,
    /// Template for context menus
    pub context_menu_template: String,
    /// Icon applied to new windows (None = left unresolved)
    pub default_icon: Option<String>,
    /// Stacking increment per show/raise
    pub stack_step: u32,
    /// Deadline for each fetch
    pub fetch_timeout_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_base: String::from("./"),
            window_template: String::from("window.html"),
            dialog_template: String::from("dialog.html"),
            context_menu_template: String::from("context_menu.html"),
            default_icon: None,
            stack_step: DEFAULT_STACK_STEP,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: EngineConfig = serde_json::from_str(json)?;
        if config.stack_step < 2 {
            log::warn!(
                "[casement] stack step {} leaves no overlay slot, using {}",
                config.stack_step,
                DEFAULT_STACK_STEP
            );
            config.stack_step = DEFAULT_STACK_STEP;
        }
        Ok(config)
    }

    /// Full locator of the template for a window kind
    pub fn template_url(&self, kind: TemplateKind) -> String {
        let file = match kind {
            TemplateKind::Window => &self.window_template,
            TemplateKind::Dialog => &self.dialog_template,
            TemplateKind::ContextMenu => &self.context_menu_template,
        };
        if self.template_base.is_empty() || self.template_base.ends_with('/') {
            format!("{}{}", self.template_base, file)
        } else {
            format!("{}/{}", self.template_base, file)
        }
    }
}
