//! Dialog decoration
//!
//! A dialog is a modal, draggable, fixed-size window with a message, optional
//! input fields, an optional checkbox, an optional choice list and up to two
//! buttons. Pressing a button runs its action with the form contents and then
//! hides the dialog.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::window::WindowId;

/// Which of the two dialog buttons was pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonSlot {
    First,
    Second,
}

/// Form contents at the time a button was pressed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogResponse {
    pub window: WindowId,
    /// Field values in declaration order
    pub values: Vec<String>,
    pub option_checked: bool,
    /// Selected choice, for choice dialogs
    pub selected_index: Option<usize>,
}

pub type DialogAction = Rc<dyn Fn(&DialogResponse)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    /// Text whose stem is pre-selected on show
    FileName,
    Password,
    ReadOnly,
}

impl FieldKind {
    fn focusable(self) -> bool {
        !matches!(self, FieldKind::ReadOnly)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogField {
    pub label: Option<String>,
    pub value: String,
    pub kind: FieldKind,
}

impl DialogField {
    pub fn new(label: Option<&str>, value: &str, kind: FieldKind) -> Self {
        Self {
            label: label.map(str::to_string),
            value: value.to_string(),
            kind,
        }
    }
}

#[derive(Clone)]
pub struct DialogButton {
    pub label: String,
    action: Option<DialogAction>,
}

impl DialogButton {
    /// A button that only closes the dialog
    pub fn close(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: None,
        }
    }

    pub fn new<F>(label: &str, action: F) -> Self
    where
        F: Fn(&DialogResponse) + 'static,
    {
        Self {
            label: label.to_string(),
            action: Some(Rc::new(action)),
        }
    }

    pub fn action(&self) -> Option<DialogAction> {
        self.action.clone()
    }
}

impl fmt::Debug for DialogButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogButton")
            .field("label", &self.label)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// Everything needed to build a dialog
#[derive(Clone, Debug)]
pub struct DialogSpec {
    pub title: String,
    pub message: Option<String>,
    pub fields: Vec<DialogField>,
    /// Label of the optional checkbox
    pub option: Option<String>,
    pub choices: Vec<String>,
    pub selected: Option<usize>,
    pub first: Option<DialogButton>,
    pub second: Option<DialogButton>,
}

impl DialogSpec {
    /// A message dialog with a single closing "Ok" button
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            message: None,
            fields: Vec::new(),
            option: None,
            choices: Vec::new(),
            selected: None,
            first: Some(DialogButton::close("Ok")),
            second: None,
        }
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn field(mut self, field: DialogField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn option(mut self, label: &str) -> Self {
        self.option = Some(label.to_string());
        self
    }

    pub fn choices(mut self, items: &[&str], selected: Option<usize>) -> Self {
        self.choices = items.iter().map(|s| s.to_string()).collect();
        self.selected = selected.filter(|&i| i < self.choices.len());
        self
    }

    pub fn first_button(mut self, button: DialogButton) -> Self {
        self.first = Some(button);
        self
    }

    pub fn second_button(mut self, button: DialogButton) -> Self {
        self.second = Some(button);
        self
    }

    /// Message dialog with one or two buttons
    pub fn prompt_dialog(
        title: &str,
        body: &str,
        first: DialogButton,
        second: Option<DialogButton>,
    ) -> Self {
        let spec = Self::new(title).message(body).first_button(first);
        match second {
            Some(button) => spec.second_button(button),
            None => spec,
        }
    }

    /// Single editable value; `on_edit` receives the value and the checkbox state
    pub fn prompt_edit<F>(
        title: &str,
        message: &str,
        value: &str,
        kind: FieldKind,
        option: Option<&str>,
        on_edit: F,
    ) -> Self
    where
        F: Fn(&str, bool) + 'static,
    {
        let mut spec = Self::new(title)
            .message(message)
            .field(DialogField::new(None, value, kind))
            .first_button(DialogButton::new("Ok", move |response| {
                let value = response.values.first().map(String::as_str).unwrap_or("");
                on_edit(value, response.option_checked);
            }));
        if let Some(label) = option {
            spec = spec.option(label);
        }
        spec
    }

    /// Several labeled values, each optionally masked
    pub fn prompt_credentials<F>(
        title: &str,
        message: &str,
        fields: &[(&str, &str, bool)],
        on_edit: F,
    ) -> Self
    where
        F: Fn(&[String]) + 'static,
    {
        let spec = fields
            .iter()
            .fold(Self::new(title).message(message), |spec, &(hint, value, masked)| {
                let kind = if masked { FieldKind::Password } else { FieldKind::Text };
                spec.field(DialogField::new(Some(hint), value, kind))
            });
        spec.first_button(DialogButton::new("Ok", move |response| on_edit(&response.values)))
    }

    /// Pick one of `items`
    pub fn prompt_single_value<F>(
        title: &str,
        items: &[&str],
        current: Option<usize>,
        on_select: F,
    ) -> Self
    where
        F: Fn(usize) + 'static,
    {
        Self::new(title)
            .choices(items, current)
            .first_button(DialogButton::new("Ok", move |response| {
                if let Some(index) = response.selected_index {
                    on_select(index);
                }
            }))
            .second_button(DialogButton::close("Cancel"))
    }
}

/// Field as rendered by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub label: Option<String>,
    pub value: String,
    pub kind: FieldKind,
}

/// Renderable dialog body
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogView {
    pub message: Option<String>,
    pub fields: Vec<FieldView>,
    pub option: Option<String>,
    pub choices: Vec<String>,
    pub selected: Option<usize>,
    pub first_button: Option<String>,
    pub second_button: Option<String>,
}

/// Range `[0, end)` covering a file name without its extension, in UTF-16
/// code units as input selections count them
pub fn stem_selection(value: &str) -> (usize, usize) {
    match value.rfind('.') {
        Some(dot) if dot + 1 < value.len() => (0, value[..dot].encode_utf16().count()),
        _ => (0, value.encode_utf16().count()),
    }
}

/// Dialog state kept by the engine while the dialog is open
pub struct Dialog {
    first: Option<DialogButton>,
    second: Option<DialogButton>,
    /// Field index and selection applied after show
    focus: Option<(usize, Option<(usize, usize)>)>,
}

impl Dialog {
    /// Split a dialog description into the engine-side state and the host-side view
    pub fn from_spec(spec: DialogSpec) -> (Self, DialogView) {
        let focus = spec
            .fields
            .iter()
            .position(|f| f.kind.focusable())
            .map(|index| {
                let field = &spec.fields[index];
                let selection = match field.kind {
                    FieldKind::FileName => Some(stem_selection(&field.value)),
                    _ => None,
                };
                (index, selection)
            });

        let view = DialogView {
            message: spec.message,
            fields: spec
                .fields
                .into_iter()
                .map(|f| FieldView {
                    label: f.label,
                    value: f.value,
                    kind: f.kind,
                })
                .collect(),
            option: spec.option,
            choices: spec.choices,
            selected: spec.selected,
            first_button: spec.first.as_ref().map(|b| b.label.clone()),
            second_button: spec.second.as_ref().map(|b| b.label.clone()),
        };

        let dialog = Self {
            first: spec.first,
            second: spec.second,
            focus,
        };
        (dialog, view)
    }

    pub fn button(&self, slot: ButtonSlot) -> Option<&DialogButton> {
        match slot {
            ButtonSlot::First => self.first.as_ref(),
            ButtonSlot::Second => self.second.as_ref(),
        }
    }

    pub fn focus(&self) -> Option<(usize, Option<(usize, usize)>)> {
        self.focus
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("focus", &self.focus)
            .finish()
    }
}
