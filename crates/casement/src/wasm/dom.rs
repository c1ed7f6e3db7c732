//! Page host over the real document

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
};

use crate::content::TemplateKind;
use crate::error::HostError;
use crate::host::{regions, Cursor, Host, NodeId, PageListener, WindowParts};
use crate::input::{ClickTarget, DialogForm, UiAction};
use crate::math::Vec2;
use crate::menu::{dropdown_id, MenuBarView, MenuEntryView};
use crate::widgets::{ButtonSlot, ContextEntryView, DialogView, FieldKind};
use crate::window::WindowId;

/// Attribute carrying a serialized [`UiAction`]
pub const ACTION_ATTR: &str = "data-casement-action";

/// Marker class for panels blocked by a modal
const DISABLED_CLASS: &str = "is-disabled";

/// Inputs of a mounted dialog, read back when a button is pressed
#[derive(Default)]
struct DialogInputs {
    fields: Vec<HtmlInputElement>,
    option: Option<HtmlInputElement>,
    select: Option<HtmlSelectElement>,
}

/// Host implementation over web-sys elements.
///
/// Listener installs are queued rather than bound here; the controller drains
/// them with [`take_listener_changes`](Self::take_listener_changes) and owns
/// the JS closures.
pub struct DomHost {
    document: Document,
    body: HtmlElement,
    nodes: HashMap<NodeId, Element>,
    /// Nodes created for each window root, dropped on detach
    owned: HashMap<NodeId, Vec<NodeId>>,
    roots: HashMap<NodeId, WindowId>,
    next_node: u64,
    listener_changes: Vec<(PageListener, bool)>,
    dropdowns: HashMap<(WindowId, String), Element>,
    dialogs: HashMap<WindowId, DialogInputs>,
}

fn style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        if let Err(e) = html.style().set_property(property, value) {
            log::warn!("[casement] failed to set {}: {:?}", property, e);
        }
    }
}

fn tag(element: &Element, action: &UiAction) {
    let _ = element.set_attribute(ACTION_ATTR, &action.to_attribute());
}

fn markup_error(err: JsValue) -> HostError {
    HostError::Markup(format!("{:?}", err))
}

impl DomHost {
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        Ok(Self {
            document,
            body,
            nodes: HashMap::new(),
            owned: HashMap::new(),
            roots: HashMap::new(),
            next_node: 1,
            listener_changes: Vec::new(),
            dropdowns: HashMap::new(),
            dialogs: HashMap::new(),
        })
    }

    fn register(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, element);
        id
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    fn create(&self, tag_name: &str) -> Result<Element, HostError> {
        self.document.create_element(tag_name).map_err(markup_error)
    }

    /// Listener installs (`true`) and removals (`false`) since the last call
    pub fn take_listener_changes(&mut self) -> Vec<(PageListener, bool)> {
        std::mem::take(&mut self.listener_changes)
    }

    /// Describe a DOM event as a click on a node.
    ///
    /// The target gets a transient node id; release it with
    /// [`release_target`](Self::release_target) once routing is done.
    pub fn resolve_event(&mut self, event: &Event) -> Option<ClickTarget> {
        let element = event.target()?.dyn_into::<Element>().ok()?;
        let action = element
            .closest(&format!("[{}]", ACTION_ATTR))
            .ok()
            .flatten()
            .and_then(|tagged| tagged.get_attribute(ACTION_ATTR))
            .and_then(|value| UiAction::from_attribute(&value));
        let form = match &action {
            Some(UiAction::DialogButton { window, .. }) => self.dialog_form(*window),
            _ => DialogForm::default(),
        };
        let node = self.register(element);
        Some(ClickTarget { node, action, form })
    }

    pub fn release_target(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    fn dialog_form(&self, window: WindowId) -> DialogForm {
        let Some(inputs) = self.dialogs.get(&window) else {
            return DialogForm::default();
        };
        DialogForm {
            values: inputs.fields.iter().map(HtmlInputElement::value).collect(),
            option_checked: inputs.option.as_ref().is_some_and(HtmlInputElement::checked),
            selected_index: inputs
                .select
                .as_ref()
                .map(HtmlSelectElement::selected_index)
                .and_then(|i| usize::try_from(i).ok()),
        }
    }

    fn find_region(&mut self, root: &Element, region: &'static str) -> Option<NodeId> {
        let element = root.get_elements_by_class_name(region).item(0)?;
        Some(self.register(element))
    }

    fn append_block(&self, parent: &Element, markup: &str) -> Result<Element, HostError> {
        let block = self.create("div")?;
        block.set_inner_html(markup);
        parent.append_child(&block).map_err(markup_error)?;
        Ok(block)
    }
}

impl Host for DomHost {
    fn mount_window(
        &mut self,
        window: WindowId,
        kind: TemplateKind,
        markup: &str,
    ) -> Result<WindowParts, HostError> {
        let root = self.create("div")?;
        root.set_inner_html(markup);
        let _ = root.set_attribute("data-casement-window", &window.to_string());

        let first = self.next_node;
        let root_id = self.register(root.clone());
        let mut found = Vec::with_capacity(regions::REQUIRED.len());
        for region in regions::REQUIRED {
            match self.find_region(&root, region) {
                Some(node) => found.push(node),
                None => {
                    for id in first..self.next_node {
                        self.nodes.remove(&NodeId(id));
                    }
                    return Err(HostError::MissingRegion(region));
                }
            }
        }
        let menu_slot = self.find_region(&root, regions::MENU_BAR);

        let parts = WindowParts {
            root: root_id,
            panel: found[0],
            icon: found[1],
            title_bar: found[2],
            title: found[3],
            close_button: found[4],
            menu_slot,
            content: found[5],
        };
        if let Some(panel) = self.element(parts.panel) {
            style(panel, "display", "none");
        }
        if let Some(bar) = self.element(parts.title_bar) {
            tag(bar, &UiAction::TitleBar { window });
        }
        if let Some(close) = self.element(parts.close_button) {
            tag(close, &UiAction::Close { window });
        }

        if let Err(err) = self.body.append_child(&root) {
            for id in first..self.next_node {
                self.nodes.remove(&NodeId(id));
            }
            return Err(markup_error(err));
        }
        self.owned
            .insert(root_id, (first..self.next_node).map(NodeId).collect());
        self.roots.insert(root_id, window);
        log::debug!("[casement] mounted {:?} template for window {}", kind, window);
        Ok(parts)
    }

    fn detach(&mut self, root: NodeId) {
        if let Some(element) = self.element(root) {
            element.remove();
        }
        for node in self.owned.remove(&root).unwrap_or_default() {
            self.nodes.remove(&node);
        }
        if let Some(window) = self.roots.remove(&root) {
            self.dropdowns.retain(|(w, _), _| *w != window);
            self.dialogs.remove(&window);
        }
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(ancestor), Some(node)) => ancestor.contains(Some(node.unchecked_ref())),
            _ => false,
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_image(&mut self, node: NodeId, src: &str) {
        if let Some(element) = self.element(node) {
            match element.dyn_ref::<HtmlImageElement>() {
                Some(img) => img.set_src(src),
                None => {
                    let _ = element.set_attribute("src", src);
                }
            }
        }
    }

    fn append_markup(&mut self, node: NodeId, markup: &str) -> Result<(), HostError> {
        let parent = self.element(node).ok_or(HostError::Detached(node))?;
        self.append_block(parent, markup)?;
        Ok(())
    }

    fn set_displayed(&mut self, node: NodeId, displayed: bool) {
        if let Some(element) = self.element(node) {
            style(element, "display", if displayed { "block" } else { "none" });
        }
    }

    fn set_z_index(&mut self, node: NodeId, z: u32) {
        if let Some(element) = self.element(node) {
            style(element, "z-index", &z.to_string());
        }
    }

    fn position(&self, node: NodeId) -> Vec2 {
        self.element(node)
            .and_then(|e| e.dyn_ref::<HtmlElement>())
            .map(|e| Vec2::new(e.offset_left() as f32, e.offset_top() as f32))
            .unwrap_or_default()
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(element) = self.element(node) {
            let (left, top) = position.to_css();
            style(element, "left", &left);
            style(element, "top", &top);
        }
    }

    fn set_cursor(&mut self, node: NodeId, cursor: Cursor) {
        if let Some(element) = self.element(node) {
            style(element, "cursor", cursor.css());
        }
    }

    fn set_interactive(&mut self, node: NodeId, interactive: bool) {
        if let Some(element) = self.element(node) {
            let _ = element
                .class_list()
                .toggle_with_force(DISABLED_CLASS, !interactive);
        }
    }

    fn set_resizable(&mut self, node: NodeId, resizable: bool) {
        if let Some(element) = self.element(node) {
            style(element, "resize", if resizable { "both" } else { "none" });
        }
    }

    fn install_listener(&mut self, listener: PageListener) {
        self.listener_changes.push((listener, true));
    }

    fn remove_listener(&mut self, listener: PageListener) {
        self.listener_changes.push((listener, false));
    }

    fn mount_menu_bar(
        &mut self,
        slot: NodeId,
        window: WindowId,
        view: &MenuBarView,
    ) -> Result<(), HostError> {
        let slot = self.element(slot).ok_or(HostError::Detached(slot))?.clone();
        slot.set_inner_html("");
        self.dropdowns.retain(|(w, _), _| *w != window);

        let container = self.create("div")?;
        container.set_class_name("menu-container");
        for entry in &view.entries {
            match entry {
                MenuEntryView::Dropdown { name, title, sub_items } => {
                    let item = self.create("div")?;
                    item.set_class_name(&format!("{} dropdown", name));

                    let button = self.create("button")?;
                    button.set_class_name("dropbtn fa fa-caret-down");
                    button.set_text_content(Some(title));
                    tag(&button, &UiAction::MenuTrigger { window, item: name.clone() });
                    item.append_child(&button).map_err(markup_error)?;

                    let panel = self.create("div")?;
                    panel.set_class_name(&format!("{} dropdown-content", dropdown_id(name)));
                    for sub in sub_items {
                        let link = self.create("a")?;
                        tag(
                            &link,
                            &UiAction::SubItem {
                                window,
                                item: name.clone(),
                                sub: sub.name.clone(),
                            },
                        );
                        let icon = self.create("img")?;
                        icon.set_class_name("menu-item-image");
                        if let Some(src) = &sub.icon {
                            let _ = icon.set_attribute("src", src);
                        }
                        link.append_child(&icon).map_err(markup_error)?;
                        let label = self.create("span")?;
                        label.set_class_name("unselectable");
                        label.set_text_content(Some(&sub.title));
                        link.append_child(&label).map_err(markup_error)?;
                        panel.append_child(&link).map_err(markup_error)?;
                    }
                    item.append_child(&panel).map_err(markup_error)?;
                    container.append_child(&item).map_err(markup_error)?;
                    self.dropdowns.insert((window, name.clone()), panel);
                }
                MenuEntryView::Widget { name, content } => {
                    let block = self.append_block(&container, content)?;
                    block.set_class_name(&format!("{} menu-widget", name));
                }
            }
        }
        slot.append_child(&container).map_err(markup_error)?;
        Ok(())
    }

    fn set_dropdown_open(&mut self, window: WindowId, item: &str, open: bool, z: u32) {
        let Some(panel) = self.dropdowns.get(&(window, item.to_string())) else {
            return;
        };
        let _ = panel.class_list().toggle_with_force("show", open);
        if open {
            style(panel, "z-index", &z.to_string());
        }
    }

    fn mount_context_entries(
        &mut self,
        content: NodeId,
        window: WindowId,
        entries: &[ContextEntryView],
    ) -> Result<(), HostError> {
        let content = self.element(content).ok_or(HostError::Detached(content))?.clone();
        for (index, entry) in entries.iter().enumerate() {
            let link = self.create("a")?;
            style(&link, "cursor", "pointer");
            tag(&link, &UiAction::ContextEntry { window, index });

            let icon = self.create("img")?;
            icon.set_class_name("menu-item-image context-menu-item-image");
            if let Some(src) = &entry.icon {
                let _ = icon.set_attribute("src", src);
            }
            link.append_child(&icon).map_err(markup_error)?;
            let label = self.document.create_text_node(&entry.name);
            link.append_child(&label).map_err(markup_error)?;
            content.append_child(&link).map_err(markup_error)?;
        }
        Ok(())
    }

    fn mount_dialog(
        &mut self,
        parts: &WindowParts,
        window: WindowId,
        view: &DialogView,
    ) -> Result<(), HostError> {
        let content = self
            .element(parts.content)
            .ok_or(HostError::Detached(parts.content))?
            .clone();
        let mut inputs = DialogInputs::default();

        if let Some(message) = &view.message {
            let text = self.create("p")?;
            text.set_class_name("dialog-text");
            text.set_text_content(Some(message));
            content.append_child(&text).map_err(markup_error)?;
        }

        for field in &view.fields {
            let row = self.create("div")?;
            row.set_class_name("dialog-input-container");
            if let Some(label) = &field.label {
                let caption = self.create("label")?;
                caption.set_class_name("dialog-input-label");
                caption.set_text_content(Some(label));
                row.append_child(&caption).map_err(markup_error)?;
            }
            let input: HtmlInputElement = self
                .create("input")?
                .dyn_into()
                .map_err(|_| HostError::Markup(String::from("input element")))?;
            input.set_class_name("dialog-input");
            input.set_value(&field.value);
            match field.kind {
                FieldKind::Password => input.set_type("password"),
                FieldKind::ReadOnly => input.set_read_only(true),
                FieldKind::Text | FieldKind::FileName => {}
            }
            row.append_child(&input).map_err(markup_error)?;
            content.append_child(&row).map_err(markup_error)?;
            inputs.fields.push(input);
        }

        if let Some(option) = &view.option {
            let row = self.create("label")?;
            row.set_class_name("dialog-option");
            let checkbox: HtmlInputElement = self
                .create("input")?
                .dyn_into()
                .map_err(|_| HostError::Markup(String::from("checkbox element")))?;
            checkbox.set_type("checkbox");
            row.append_child(&checkbox).map_err(markup_error)?;
            let text = self.document.create_text_node(option);
            row.append_child(&text).map_err(markup_error)?;
            content.append_child(&row).map_err(markup_error)?;
            inputs.option = Some(checkbox);
        }

        if !view.choices.is_empty() {
            let select: HtmlSelectElement = self
                .create("select")?
                .dyn_into()
                .map_err(|_| HostError::Markup(String::from("select element")))?;
            select.set_class_name("dialog-select");
            for choice in &view.choices {
                let option = self.create("option")?;
                let _ = option.set_attribute("value", choice);
                option.set_text_content(Some(choice));
                select.append_child(&option).map_err(markup_error)?;
            }
            if let Some(index) = view.selected {
                select.set_selected_index(index as i32);
            }
            content.append_child(&select).map_err(markup_error)?;
            inputs.select = Some(select);
        }

        let buttons = self.create("div")?;
        buttons.set_class_name("dialog-buttons");
        for (slot, label) in [
            (ButtonSlot::First, &view.first_button),
            (ButtonSlot::Second, &view.second_button),
        ] {
            if let Some(label) = label {
                let button = self.create("button")?;
                button.set_class_name("dialog-button");
                button.set_text_content(Some(label));
                tag(&button, &UiAction::DialogButton { window, slot });
                buttons.append_child(&button).map_err(markup_error)?;
            }
        }
        content.append_child(&buttons).map_err(markup_error)?;

        self.dialogs.insert(window, inputs);
        Ok(())
    }

    fn focus_field(&mut self, window: WindowId, field: usize, selection: Option<(usize, usize)>) {
        let Some(input) = self.dialogs.get(&window).and_then(|d| d.fields.get(field)) else {
            return;
        };
        let _ = input.focus();
        if let Some((start, end)) = selection {
            let _ = input.set_selection_range(start as u32, end as u32);
        }
    }
}
