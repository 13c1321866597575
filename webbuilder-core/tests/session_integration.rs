//! Integration tests for the editing session.
//!
//! Drives [`EditorSession`] through complete user flows: building a page,
//! undoing and redoing, clipboard use, drags and project import.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use webbuilder_core::{
    CommandKind, EditorSession, ElementDescriptor, ElementId, ElementTag, GestureKind, Handle,
    Notice, Rect, SessionConfig, SessionEvent, StyleMap, StyleValue,
};

fn style(pairs: &[(&str, &str)]) -> StyleMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), StyleValue::from(*v)))
        .collect()
}

fn ids(session: &EditorSession) -> Vec<ElementId> {
    session.elements().iter().map(|e| e.id).collect()
}

fn record_events(session: &mut EditorSession) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

// ===========================================================================
// Basic round trip
// ===========================================================================

#[test]
fn test_create_style_undo_redo() {
    let mut session = EditorSession::new();
    let id = session.create("heading").expect("known component");
    assert_eq!(session.elements().len(), 1);

    assert!(session.update_style(id, style(&[("color", "red")])));
    let styled = session.elements().to_vec();

    assert!(session.undo());
    let heading = session.get(id).expect("still there");
    assert_ne!(heading.style.get("color"), Some(&StyleValue::from("red")));

    assert!(session.undo());
    assert!(session.elements().is_empty());
    assert!(!session.undo());

    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(session.elements(), styled.as_slice());
    assert!(!session.redo());
}

#[test]
fn test_update_content_and_element() {
    let mut session = EditorSession::new();
    let id = session.create("paragraph").expect("known component");
    assert!(session.update_content(id, "Hello"));
    assert_eq!(session.get(id).and_then(|e| e.content.as_deref()), Some("Hello"));

    let patch = webbuilder_core::ElementPatch {
        tag: Some(ElementTag::heading(3)),
        ..Default::default()
    };
    assert!(session.update_element(id, &patch));
    assert_eq!(session.get(id).expect("exists").tag, ElementTag::Heading(3));
    assert_eq!(session.history().undo_depth(), 4);
}

// ===========================================================================
// Redo invalidation and bounded history
// ===========================================================================

#[test]
fn test_new_command_clears_redo() {
    let mut session = EditorSession::new();
    session.create("button");
    session.create("button");
    session.undo();
    assert!(session.can_redo());

    session.create("link");
    assert!(!session.can_redo());
    assert!(!session.redo());
}

#[test]
fn test_history_is_bounded() {
    let mut session = EditorSession::new();
    for _ in 0..60 {
        session.create("paragraph");
    }
    assert_eq!(session.history().undo_depth(), 50);

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, 49);
    assert_eq!(session.elements().len(), 11);
}

#[test]
fn test_custom_history_limit() {
    let mut session = EditorSession::with_config(SessionConfig::default().with_history_limit(3));
    for _ in 0..5 {
        session.create("paragraph");
    }
    assert_eq!(session.history().undo_depth(), 3);
}

// ===========================================================================
// Selection consistency
// ===========================================================================

#[test]
fn test_selection_cleared_on_delete_and_undo() {
    let mut session = EditorSession::new();
    let a = session.create("heading").expect("known component");
    let b = session.create("button").expect("known component");

    session.select(Some(b));
    assert!(session.delete(a));
    assert_eq!(session.selected_id(), Some(b));
    assert!(session.delete(b));
    assert_eq!(session.selected_id(), None);

    session.select(Some(ElementId::new()));
    assert!(session.selected().is_none());

    session.undo();
    session.select(Some(b));
    session.undo();
    assert_eq!(session.selected_id(), None);
    session.select(Some(b));
    session.redo();
    assert_eq!(session.selected_id(), None);
}

#[test]
fn test_load_template_replaces_document_and_clears_selection() {
    let mut session = EditorSession::new();
    let id = session.create("heading").expect("known component");
    session.select(Some(id));

    assert!(session.load_named_template("portfolio"));
    assert_eq!(session.elements().len(), 4);
    assert_eq!(session.selected_id(), None);
    assert!(!session.elements().iter().any(|e| e.id == id));

    assert!(session.undo());
    assert_eq!(ids(&session), vec![id]);
}

#[test]
fn test_loading_same_template_twice_gives_fresh_ids() {
    let mut session = EditorSession::new();
    session.load_named_template("landing");
    let first: HashSet<_> = ids(&session).into_iter().collect();
    session.load_named_template("landing");
    let second: HashSet<_> = ids(&session).into_iter().collect();
    assert!(first.is_disjoint(&second));
}

// ===========================================================================
// Idempotent no-ops
// ===========================================================================

#[test]
fn test_failed_preconditions_change_nothing() {
    let mut session = EditorSession::new();
    let first = session.create("heading").expect("known component");
    let last = session.create("button").expect("known component");
    let before = session.elements().to_vec();
    let history = session.history().clone();
    let missing = ElementId::new();

    assert!(!session.delete(missing));
    assert!(!session.move_up(first));
    assert!(!session.move_down(last));
    assert!(!session.update_style(missing, style(&[("color", "red")])));
    assert!(!session.update_content(missing, "x"));
    assert!(session.duplicate(missing).is_none());
    assert!(!session.copy(missing));
    assert!(session.paste().is_none());
    assert!(session.create("carousel").is_none());
    assert!(!session.load_named_template("blog"));

    assert_eq!(session.elements(), before.as_slice());
    assert_eq!(session.history(), &history);
}

#[test]
fn test_notices_for_user_triggered_failures() {
    let mut session = EditorSession::new();
    let events = record_events(&mut session);

    session.paste();
    session.create("carousel");
    let missing = ElementId::new();
    session.copy(missing);

    let notices: Vec<Notice> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Notice { notice } => Some(notice.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        notices,
        vec![
            Notice::NothingToPaste,
            Notice::UnknownComponent("carousel".into()),
            Notice::ElementNotFound(missing),
        ]
    );
}

// ===========================================================================
// Clipboard and duplicate
// ===========================================================================

#[test]
fn test_duplicate_places_copy_after_source() {
    let mut session = EditorSession::new();
    let a = session.create("heading").expect("known component");
    let b = session.create("paragraph").expect("known component");
    let depth = session.history().undo_depth();

    let copy = session.duplicate(a).expect("source exists");
    assert_eq!(ids(&session), vec![a, copy, b]);
    assert_eq!(session.selected_id(), Some(copy));
    assert_eq!(session.history().undo_depth(), depth + 1);

    let source = session.get(a).expect("source");
    let duplicate = session.get(copy).expect("copy");
    assert_eq!(source.content, duplicate.content);
    assert_eq!(source.style, duplicate.style);
}

#[test]
fn test_paste_after_source_deleted() {
    let mut session = EditorSession::new();
    let a = session.create("heading").expect("known component");
    assert!(session.copy(a));
    assert!(session.delete(a));

    let pasted = session.paste().expect("clipboard filled");
    assert_ne!(pasted, a);
    assert_eq!(session.elements().len(), 1);
    assert_eq!(session.selected_id(), Some(pasted));

    let again = session.paste().expect("clipboard kept");
    assert_ne!(again, pasted);
    assert_eq!(session.elements().len(), 2);
}

#[test]
fn test_selection_shortcuts() {
    let mut session = EditorSession::new();
    let a = session.create("heading").expect("known component");
    let b = session.create("paragraph").expect("known component");

    session.select(Some(b));
    assert!(session.move_selected_up());
    assert_eq!(ids(&session), vec![b, a]);
    assert!(session.move_selected_down());
    assert_eq!(ids(&session), vec![a, b]);

    assert!(session.copy_selected());
    let copy = session.duplicate_selected().expect("selection exists");
    assert_eq!(session.selected_id(), Some(copy));
    assert!(session.delete_selected());
    assert_eq!(ids(&session), vec![a, b]);
}

// ===========================================================================
// Stacking order
// ===========================================================================

#[test]
fn test_bring_to_front_and_send_to_back() {
    let mut session = EditorSession::new();
    let low = session.create_from(ElementDescriptor::new("div").with_style("zIndex", "3"));
    let high = session.create_from(ElementDescriptor::new("div").with_style("zIndex", 7.0));
    let plain = session.create("paragraph").expect("known component");
    let depth = session.history().undo_depth();

    assert!(session.bring_to_front(plain));
    assert_eq!(session.get(plain).expect("exists").style["zIndex"], StyleValue::from(8.0));
    assert_eq!(session.history().undo_depth(), depth + 1);

    assert!(session.send_to_back(high));
    assert_eq!(session.get(high).expect("exists").style["zIndex"], StyleValue::from(2.0));

    // Lowest is now 2; one below it.
    assert!(session.send_to_back(low));
    assert_eq!(session.get(low).expect("exists").style["zIndex"], StyleValue::from(1.0));
    assert_eq!(session.history().undo_depth(), depth + 3);

    assert!(session.undo());
    assert_eq!(session.get(low).expect("exists").style["zIndex"], StyleValue::from("3"));
    assert_eq!(ids(&session), vec![low, high, plain]);
}

#[test]
fn test_send_to_back_never_goes_below_zero() {
    let mut session = EditorSession::new();
    let id = session.create("button").expect("known component");
    assert!(session.send_to_back(id));
    assert_eq!(session.get(id).expect("exists").style["zIndex"], StyleValue::from(0.0));
}

#[test]
fn test_stacking_shortcuts_need_selection() {
    let mut session = EditorSession::new();
    let id = session.create("heading").expect("known component");
    let events = record_events(&mut session);

    assert!(!session.bring_selected_to_front());
    assert!(matches!(
        events.borrow().last(),
        Some(SessionEvent::Notice { notice: Notice::NothingSelected })
    ));

    session.select(Some(id));
    assert!(session.bring_selected_to_front());
    assert!(events.borrow().iter().any(|event| matches!(
        event,
        SessionEvent::Changed { command: CommandKind::BringToFront, .. }
    )));
    assert!(session.send_selected_to_back());
    assert!(!session.bring_to_front(ElementId::new()));
}

// ===========================================================================
// Events
// ===========================================================================

#[test]
fn test_changed_fires_once_per_command() {
    let mut session = EditorSession::new();
    let events = record_events(&mut session);

    let id = session.create("button").expect("known component");
    session.update_style(id, style(&[("color", "red")]));
    session.undo();

    let changes: Vec<(CommandKind, u64)> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Changed { command, revision } => Some((*command, *revision)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (CommandKind::Create, 1),
            (CommandKind::UpdateStyle, 2),
            (CommandKind::Undo, 3),
        ]
    );
}

#[test]
fn test_unsubscribed_callback_is_silent() {
    let mut session = EditorSession::new();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let subscription = session.subscribe(move |_| *counter.borrow_mut() += 1);

    session.create("button");
    assert!(session.unsubscribe(subscription));
    session.create("button");
    assert_eq!(*count.borrow(), 1);
}

// ===========================================================================
// Drag gestures
// ===========================================================================

#[test]
fn test_drag_commits_single_checkpoint() {
    let mut session = EditorSession::new();
    let events = record_events(&mut session);
    let id = session.create("button").expect("known component");
    let depth = session.history().undo_depth();

    assert!(session.begin_drag(id, GestureKind::Move, (0.0, 0.0), Rect::new(0.0, 0.0, 100.0, 40.0)));
    assert_eq!(session.selected_id(), Some(id));
    for step in 1..=10 {
        session.drag_to(f64::from(step) * 10.0, f64::from(step) * 4.0);
        session.drag_frame();
    }
    assert_eq!(session.drag_preview(), Some(Rect::new(100.0, 40.0, 100.0, 40.0)));
    assert!(!session.get(id).expect("exists").is_absolute());

    assert!(session.end_drag());
    assert_eq!(session.history().undo_depth(), depth + 1);

    let moved = session.get(id).expect("exists");
    assert_eq!(moved.style["position"], StyleValue::from("absolute"));
    assert_eq!(moved.style["left"], StyleValue::from("100px"));
    assert_eq!(moved.style["top"], StyleValue::from("40px"));

    let changes = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, SessionEvent::Changed { .. }))
        .count();
    assert_eq!(changes, 2);

    assert!(session.undo());
    assert!(!session.get(id).expect("exists").is_absolute());
}

#[test]
fn test_resize_from_north_west_handle() {
    let mut session = EditorSession::new();
    let id = session.create("container").expect("known component");
    session.begin_drag(
        id,
        GestureKind::Resize(Handle::Nw),
        (100.0, 100.0),
        Rect::new(100.0, 100.0, 200.0, 100.0),
    );
    session.drag_to(60.0, 80.0);
    assert!(session.end_drag());

    let resized = session.get(id).expect("exists");
    assert_eq!(resized.style["left"], StyleValue::from("60px"));
    assert_eq!(resized.style["top"], StyleValue::from("80px"));
    assert_eq!(resized.style["width"], StyleValue::from("240px"));
    assert_eq!(resized.style["height"], StyleValue::from("120px"));
}

#[test]
fn test_cancelled_drag_leaves_history_alone() {
    let mut session = EditorSession::new();
    let id = session.create("button").expect("known component");
    let before = session.elements().to_vec();
    let history = session.history().clone();

    session.begin_drag(id, GestureKind::Move, (0.0, 0.0), Rect::new(0.0, 0.0, 80.0, 40.0));
    session.drag_to(200.0, 200.0);
    session.drag_frame();
    assert!(session.cancel_drag());

    assert_eq!(session.elements(), before.as_slice());
    assert_eq!(session.history(), &history);
    assert!(session.drag_preview().is_none());
}

#[test]
fn test_drag_on_deleted_target_commits_nothing() {
    let mut session = EditorSession::new();
    let id = session.create("button").expect("known component");
    assert!(!session.begin_drag(ElementId::new(), GestureKind::Move, (0.0, 0.0), Rect::default()));

    session.begin_drag(id, GestureKind::Move, (0.0, 0.0), Rect::default());
    session.delete(id);
    session.drag_to(100.0, 0.0);
    assert!(!session.end_drag());
}

// ===========================================================================
// Import and save
// ===========================================================================

#[test]
fn test_save_and_import_round_trip() {
    let mut session = EditorSession::new();
    session.load_named_template("resume");
    let saved = session.save().expect("save");
    let original = session.elements().to_vec();

    let mut restored = EditorSession::new();
    assert_eq!(restored.import(&saved).expect("import"), original.len());
    assert_eq!(restored.elements(), original.as_slice());
    assert!(restored.can_undo());
}

#[test]
fn test_failed_import_keeps_document() {
    let mut session = EditorSession::new();
    let events = record_events(&mut session);
    session.create("heading");
    let before = session.elements().to_vec();

    assert!(session.import(r#"{"version":"3.0","elements":[]}"#).is_err());
    assert!(session.import("garbage").is_err());
    assert_eq!(session.elements(), before.as_slice());

    let failures = events
        .borrow()
        .iter()
        .filter(|event| {
            matches!(
                event,
                SessionEvent::Notice {
                    notice: Notice::ImportFailed(_)
                }
            )
        })
        .count();
    assert_eq!(failures, 2);
}

#[test]
fn test_legacy_html_import() {
    let mut session = EditorSession::new();
    let json = r#"{"version":"1.0","timestamp":"2023-05-01T10:00:00.000Z","html":"<h1>Old</h1>"}"#;
    assert_eq!(session.import(json).expect("legacy import"), 1);
    let element = &session.elements()[0];
    assert_eq!(element.tag, ElementTag::Container);
    assert_eq!(element.markup.as_deref(), Some("<h1>Old</h1>"));
}

#[test]
fn test_explicit_template_descriptors() {
    let mut session = EditorSession::new();
    let loaded = session.load_template(vec![
        ElementDescriptor::new("h1").with_content("One"),
        ElementDescriptor::new("p").with_content("Two"),
    ]);
    assert_eq!(loaded, 2);
    let contents: Vec<_> = session
        .elements()
        .iter()
        .filter_map(|e| e.content.as_deref())
        .collect();
    assert_eq!(contents, vec!["One", "Two"]);
}
