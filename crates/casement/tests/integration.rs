//! Integration tests for WindowEngine
//!
//! These tests drive the engine the way the page listeners do:
//! - Window lifecycle and click-to-front stacking
//! - Modality and outside-click dismissal
//! - The page-wide dropdown
//! - Title-bar dragging
//! - Dialogs and context menus

use std::cell::RefCell;
use std::rc::Rc;

use casement::testing::{MockHost, MockLoader};
use casement::widgets::{ButtonSlot, FieldKind};
use casement::{
    ClickTarget, ContentSource, ContextMenuSpec, DialogForm, DialogSpec, InputResult, LoadError,
    MenuBar, MenuItem, MenuSubItem, PageListener, UiAction, Vec2, WindowEngine, WindowError,
    WindowId,
};
use futures::executor::block_on;

fn engine() -> WindowEngine<MockHost> {
    let mut engine = WindowEngine::new(MockHost::new());
    engine.initialize();
    engine
}

fn open(engine: &mut WindowEngine<MockHost>, title: &str, modal: bool) -> WindowId {
    let loader = MockLoader::with_templates();
    let id = block_on(engine.create_window(&loader, title, ContentSource::Empty, modal)).unwrap();
    engine.show(id).unwrap();
    id
}

fn click_inside(engine: &mut WindowEngine<MockHost>, id: WindowId) -> InputResult {
    let content = engine.window(id).unwrap().parts().content;
    let node = engine.host_mut().child_of(content);
    engine.handle_page_click(&ClickTarget::node(node))
}

fn click_outside(engine: &mut WindowEngine<MockHost>) -> InputResult {
    let node = engine.host_mut().outside_node();
    engine.handle_page_click(&ClickTarget::node(node))
}

fn click_action(engine: &mut WindowEngine<MockHost>, id: WindowId, action: UiAction) -> InputResult {
    let content = engine.window(id).unwrap().parts().content;
    let node = engine.host_mut().child_of(content);
    engine.handle_page_click(&ClickTarget::with_action(node, action))
}

fn panel_z(engine: &WindowEngine<MockHost>, id: WindowId) -> Option<u32> {
    let panel = engine.window(id).unwrap().parts().panel;
    engine.host().z_index(panel)
}

// =============================================================================
// Stacking
// =============================================================================

#[test]
fn test_click_brings_window_to_front() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let w2 = open(&mut engine, "Two", false);

    assert_eq!(panel_z(&engine, w1), Some(2));
    assert_eq!(panel_z(&engine, w2), Some(4));
    assert_eq!(engine.top_window(), Some(w2));

    assert_eq!(click_inside(&mut engine, w1), InputResult::Handled);
    assert_eq!(panel_z(&engine, w1), Some(6));
    assert_eq!(engine.window(w1).unwrap().z_order(), Some(6));
    assert_eq!(engine.top_window(), Some(w1));

    // clicking the top window does not consume a stacking value
    click_inside(&mut engine, w1);
    assert_eq!(panel_z(&engine, w1), Some(6));
}

#[test]
fn test_counter_survives_hide() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let w2 = open(&mut engine, "Two", false);
    assert!(engine.hide(w2));

    let w3 = open(&mut engine, "Three", false);
    assert_eq!(panel_z(&engine, w3), Some(6));
    assert_eq!(engine.visible_windows().len(), 2);
    assert!(engine.window(w1).unwrap().is_visible());
}

// =============================================================================
// Modality
// =============================================================================

#[test]
fn test_modal_on_top_prevents_raise() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let modal = open(&mut engine, "Modal", true);

    click_inside(&mut engine, w1);
    assert_eq!(panel_z(&engine, w1), Some(2));
    assert_eq!(engine.top_window(), Some(modal));
}

#[test]
fn test_modal_blocks_and_restores_earlier_windows() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let w2 = open(&mut engine, "Two", false);
    let modal = open(&mut engine, "Modal", true);

    for id in [w1, w2] {
        let panel = engine.window(id).unwrap().parts().panel;
        assert!(!engine.window(id).unwrap().is_interactive());
        assert!(!engine.host().is_interactive(panel));
    }
    assert!(engine.window(modal).unwrap().is_interactive());

    // windows shown after the modal are not blocked by it
    let w3 = open(&mut engine, "Three", false);
    assert!(engine.window(w3).unwrap().is_interactive());

    assert!(engine.hide(modal));
    for id in [w1, w2] {
        let panel = engine.window(id).unwrap().parts().panel;
        assert!(engine.window(id).unwrap().is_interactive());
        assert!(engine.host().is_interactive(panel));
    }
}

#[test]
fn test_nested_modals_restore_in_order() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let m1 = open(&mut engine, "First", true);
    let m2 = open(&mut engine, "Second", true);

    assert!(!engine.window(m1).unwrap().is_interactive());
    engine.hide(m2);
    assert!(engine.window(m1).unwrap().is_interactive());
    assert!(!engine.window(w1).unwrap().is_interactive());
    engine.hide(m1);
    assert!(engine.window(w1).unwrap().is_interactive());
}

#[test]
fn test_blocked_close_button_is_ignored() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    open(&mut engine, "Modal", true);

    click_action(&mut engine, w1, UiAction::Close { window: w1 });
    assert!(engine.window(w1).is_some());
}

// =============================================================================
// Hide
// =============================================================================

#[test]
fn test_hide_twice_is_noop() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    let closed = Rc::new(RefCell::new(Vec::new()));
    let log = closed.clone();
    engine
        .set_on_close(id, move |id| log.borrow_mut().push(id))
        .unwrap();
    let root = engine.window(id).unwrap().parts().root;

    assert!(engine.hide(id));
    assert!(!engine.hide(id));
    assert_eq!(*closed.borrow(), vec![id]);
    assert!(engine.host().is_detached(root));
    assert!(engine.top_window().is_none());
}

#[test]
fn test_outside_click_dismisses_only_opted_in_windows() {
    let mut engine = engine();
    let plain = open(&mut engine, "Plain", false);
    let popup = open(&mut engine, "Popup", false);
    engine.enable_dismissable_outside(popup, true).unwrap();

    assert_eq!(click_outside(&mut engine), InputResult::Handled);
    assert!(engine.window(popup).is_none());
    assert!(engine.window(plain).is_some());
}

#[test]
fn test_close_button_respects_dismissable() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    engine.enable_dismissable(id, false).unwrap();
    let close = engine.window(id).unwrap().parts().close_button;
    assert!(!engine.host().is_displayed(close));

    click_action(&mut engine, id, UiAction::Close { window: id });
    assert!(engine.window(id).is_some());

    engine.enable_dismissable(id, true).unwrap();
    click_action(&mut engine, id, UiAction::Close { window: id });
    assert!(engine.window(id).is_none());
}

// =============================================================================
// Listeners and loading
// =============================================================================

#[test]
fn test_page_listeners_installed_once() {
    let mut engine = engine();
    assert!(!engine.initialize());
    assert_eq!(engine.host().listener_installs(PageListener::WindowClick), 1);
    assert_eq!(engine.host().listener_installs(PageListener::PointerDown), 1);

    let w1 = open(&mut engine, "One", false);
    let w2 = open(&mut engine, "Two", false);
    for id in [w1, w2] {
        block_on(engine.set_menu_bar(id, file_edit_bar(Rc::default()))).unwrap();
    }
    assert_eq!(engine.host().listener_installs(PageListener::DropdownClick), 1);
}

#[test]
fn test_failed_content_load_creates_nothing() {
    let mut engine = engine();
    let loader = MockLoader::with_templates();
    loader.fail(
        "missing.html",
        LoadError::Status {
            url: "missing.html".to_string(),
            status: 404,
        },
    );

    let result = block_on(engine.create_window_from_source(&loader, "Broken", "missing.html"));
    assert!(matches!(result, Err(WindowError::Load(LoadError::Status { status: 404, .. }))));
    assert_eq!(engine.window_count(), 0);
    assert_eq!(engine.host().attached_roots(), 0);
    assert_eq!(loader.requests(), vec!["missing.html".to_string()]);
}

#[test]
fn test_create_before_initialize_fails() {
    let mut engine = WindowEngine::new(MockHost::new());
    let loader = MockLoader::with_templates();
    let result = block_on(engine.create_window(&loader, "Early", ContentSource::Empty, false));
    assert_eq!(result, Err(WindowError::NotInitialized));
    assert!(loader.requests().is_empty());
}

#[test]
fn test_shutdown_releases_everything() {
    let mut engine = engine();
    open(&mut engine, "One", false);
    open(&mut engine, "Two", true);

    engine.shutdown();
    assert_eq!(engine.window_count(), 0);
    assert!(!engine.is_initialized());
    assert!(!engine.host().is_listening(PageListener::WindowClick));
    assert_eq!(engine.host().attached_roots(), 0);

    engine.initialize();
    let id = open(&mut engine, "Again", false);
    assert_eq!(panel_z(&engine, id), Some(2));
}

// =============================================================================
// Dropdowns
// =============================================================================

fn file_edit_bar(log: Rc<RefCell<Vec<String>>>) -> MenuBar {
    let mut bar = MenuBar::new();
    let out = log.clone();
    bar.add_menu_item(
        MenuItem::new("File", "File")
            .unwrap()
            .with_sub_item(
                MenuSubItem::new("Save", "Save", Some("save.png"), move |act| {
                    out.borrow_mut().push(format!("{}:{}/{}", act.window, act.item, act.sub))
                })
                .unwrap(),
            )
            .unwrap(),
    )
    .unwrap();
    bar.add_menu_item(MenuItem::new("Edit", "Edit").unwrap()).unwrap();
    bar
}

fn trigger(window: WindowId, item: &str) -> UiAction {
    UiAction::MenuTrigger {
        window,
        item: item.to_string(),
    }
}

#[test]
fn test_one_dropdown_open_across_the_page() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let w2 = open(&mut engine, "Two", false);
    block_on(engine.set_menu_bar(w1, file_edit_bar(Rc::default()))).unwrap();
    block_on(engine.set_menu_bar(w2, file_edit_bar(Rc::default()))).unwrap();

    click_action(&mut engine, w2, trigger(w2, "File"));
    assert!(engine.host().dropdown_open(w2, "File"));
    assert_eq!(engine.host().dropdown_z(w2, "File"), Some(5));

    click_action(&mut engine, w2, trigger(w2, "Edit"));
    assert!(!engine.host().dropdown_open(w2, "File"));
    assert!(engine.host().dropdown_open(w2, "Edit"));

    // a trigger in another window closes the first one
    click_action(&mut engine, w1, trigger(w1, "File"));
    assert!(!engine.host().dropdown_open(w2, "Edit"));
    assert!(engine.host().dropdown_open(w1, "File"));
    // the click also raised w1, taking the dropdown along
    assert_eq!(panel_z(&engine, w1), Some(6));
    assert_eq!(engine.host().dropdown_z(w1, "File"), Some(7));

    click_outside(&mut engine);
    assert!(!engine.host().dropdown_open(w1, "File"));
    assert!(engine.open_dropdown().is_none());
}

#[test]
fn test_trigger_twice_closes_dropdown() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    block_on(engine.set_menu_bar(id, file_edit_bar(Rc::default()))).unwrap();

    click_action(&mut engine, id, trigger(id, "File"));
    click_action(&mut engine, id, trigger(id, "File"));
    assert!(!engine.host().dropdown_open(id, "File"));
    assert!(engine.open_dropdown().is_none());
}

#[test]
fn test_sub_item_runs_action_and_closes_dropdown() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    let log = Rc::new(RefCell::new(Vec::new()));
    block_on(engine.set_menu_bar(id, file_edit_bar(log.clone()))).unwrap();

    click_action(&mut engine, id, trigger(id, "File"));
    click_action(
        &mut engine,
        id,
        UiAction::SubItem {
            window: id,
            item: "File".to_string(),
            sub: "Save".to_string(),
        },
    );

    assert_eq!(*log.borrow(), vec![format!("{}:File/Save", id)]);
    assert!(!engine.host().dropdown_open(id, "File"));
}

#[test]
fn test_hiding_window_closes_its_dropdown() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    block_on(engine.set_menu_bar(id, file_edit_bar(Rc::default()))).unwrap();
    click_action(&mut engine, id, trigger(id, "Edit"));

    engine.hide(id);
    assert!(engine.open_dropdown().is_none());
}

// =============================================================================
// Dragging
// =============================================================================

fn press_title_bar(engine: &mut WindowEngine<MockHost>, id: WindowId, at: Vec2) -> InputResult {
    let bar = engine.window(id).unwrap().parts().title_bar;
    let node = engine.host_mut().child_of(bar);
    let target = ClickTarget::with_action(node, UiAction::TitleBar { window: id });
    engine.route_pointer_down(&target, at)
}

#[test]
fn test_drag_moves_panel_by_pointer_delta() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    let panel = engine.window(id).unwrap().parts().panel;
    engine.host_mut().set_panel_position(panel, Vec2::new(100.0, 50.0));

    assert_eq!(
        press_title_bar(&mut engine, id, Vec2::new(110.0, 60.0)),
        InputResult::DragStarted { window_id: id }
    );
    assert!(engine.host().is_listening(PageListener::PointerMove));
    assert!(engine.host().is_listening(PageListener::PointerUp));

    engine.pointer_move(Vec2::new(140.0, 35.0));
    let position = engine.host().node_position(panel);
    assert!((position.x - 130.0).abs() < 0.001);
    assert!((position.y - 25.0).abs() < 0.001);

    assert_eq!(engine.pointer_up(), InputResult::DragEnded { window_id: id });
    assert!(!engine.host().is_listening(PageListener::PointerMove));
    assert!(!engine.host().is_listening(PageListener::PointerUp));

    // moves after release are ignored
    engine.pointer_move(Vec2::new(0.0, 0.0));
    let position = engine.window(id).unwrap().position();
    assert!((position.x - 130.0).abs() < 0.001);
}

#[test]
fn test_drag_ignored_when_not_draggable_or_blocked() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    engine.enable_draggable(id, false).unwrap();
    assert_eq!(
        press_title_bar(&mut engine, id, Vec2::ZERO),
        InputResult::Unhandled
    );

    engine.enable_draggable(id, true).unwrap();
    open(&mut engine, "Modal", true);
    assert_eq!(
        press_title_bar(&mut engine, id, Vec2::ZERO),
        InputResult::Unhandled
    );
    assert!(engine.active_drag().is_none());
}

#[test]
fn test_disabling_drag_mid_drag_halts_it() {
    let mut engine = engine();
    let id = open(&mut engine, "One", false);
    press_title_bar(&mut engine, id, Vec2::ZERO);

    engine.enable_draggable(id, false).unwrap();
    assert_eq!(
        engine.pointer_move(Vec2::new(10.0, 10.0)),
        InputResult::DragEnded { window_id: id }
    );
    assert!(engine.active_drag().is_none());
}

// =============================================================================
// Dialogs and context menus
// =============================================================================

#[test]
fn test_edit_dialog_reports_value_then_closes() {
    let mut engine = engine();
    let w1 = open(&mut engine, "One", false);
    let edits = Rc::new(RefCell::new(Vec::new()));
    let out = edits.clone();
    let spec = DialogSpec::prompt_edit(
        "Rename",
        "New name",
        "notes.txt",
        FieldKind::FileName,
        Some("Overwrite"),
        move |value, checked| out.borrow_mut().push((value.to_string(), checked)),
    );

    let loader = MockLoader::with_templates();
    let dialog = block_on(engine.open_dialog(&loader, spec)).unwrap();
    assert!(engine.window(dialog).unwrap().is_modal());
    assert!(!engine.window(w1).unwrap().is_interactive());
    assert_eq!(engine.host().focused_field(), Some((dialog, 0, Some((0, 5)))));

    let content = engine.window(dialog).unwrap().parts().content;
    let node = engine.host_mut().child_of(content);
    let target = ClickTarget::with_action(
        node,
        UiAction::DialogButton {
            window: dialog,
            slot: ButtonSlot::First,
        },
    )
    .with_form(DialogForm {
        values: vec!["todo.txt".to_string()],
        option_checked: true,
        selected_index: None,
    });
    engine.handle_page_click(&target);

    assert_eq!(*edits.borrow(), vec![("todo.txt".to_string(), true)]);
    assert!(engine.window(dialog).is_none());
    assert!(engine.window(w1).unwrap().is_interactive());
}

#[test]
fn test_context_menu_hides_before_running_entry() {
    let mut engine = engine();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let out = seen.clone();
    let spec = ContextMenuSpec::new("Actions", 40.0, 60.0).entry("Delete", None, move |id| {
        out.borrow_mut().push(id)
    });

    let loader = MockLoader::with_templates();
    let menu = block_on(engine.open_context_menu(&loader, spec)).unwrap();
    let window = engine.window(menu).unwrap();
    assert!(!window.is_draggable());
    assert!(window.is_dismissable_outside());
    let panel = window.parts().panel;
    let position = engine.host().node_position(panel);
    assert!((position.x - 40.0).abs() < 0.001);
    assert!((position.y - 60.0).abs() < 0.001);

    click_action(&mut engine, menu, UiAction::ContextEntry { window: menu, index: 0 });
    assert_eq!(*seen.borrow(), vec![menu]);
    assert!(engine.window(menu).is_none());
}

#[test]
fn test_context_menu_dismissed_by_outside_click() {
    let mut engine = engine();
    let loader = MockLoader::with_templates();
    let spec = ContextMenuSpec::new("Actions", 0.0, 0.0).entry("Copy", None, |_| {});
    let menu = block_on(engine.open_context_menu(&loader, spec)).unwrap();

    click_outside(&mut engine);
    assert!(engine.window(menu).is_none());
}
