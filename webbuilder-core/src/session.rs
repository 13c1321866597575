//! The editing session: document, selection, clipboard, history and the
//! in-flight drag gesture behind one owned value.
//!
//! Every document-changing command follows the same protocol: discard any
//! active gesture, check preconditions, mutate the store, then record one
//! post-mutation checkpoint and notify subscribers. A command whose
//! preconditions fail leaves the document and both history stacks alone.

use std::fmt;

use crate::animation::AnimationPreset;
use crate::config::SessionConfig;
use crate::drag::{DragGesture, GestureKind, Rect};
use crate::error::PersistResult;
use crate::event::{CommandKind, Notice, SessionEvent, SubscriptionId, Subscribers};
use crate::history::History;
use crate::persist;
use crate::store::{Direction, ElementStore, LayerSummary};
use crate::template::{Catalog, ComponentRegistry};
use crate::{CanvasElement, ElementDescriptor, ElementId, ElementPatch, StyleMap, StyleValue};

/// A single user's editing session.
pub struct EditorSession {
    store: ElementStore,
    history: History,
    clipboard: Option<CanvasElement>,
    drag: Option<DragGesture>,
    catalog: Box<dyn Catalog>,
    config: SessionConfig,
    subscribers: Subscribers,
    revision: u64,
}

impl EditorSession {
    /// Create an empty session with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create an empty session.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            store: ElementStore::new(),
            history: History::with_limit(Vec::new(), config.history_limit),
            clipboard: None,
            drag: None,
            catalog: Box::new(ComponentRegistry::for_theme(config.theme)),
            config,
            subscribers: Subscribers::new(),
            revision: 0,
        }
    }

    /// Open a session on an existing document.
    ///
    /// The document becomes the bottom history entry, so it cannot be
    /// undone. Elements repeating an earlier id are dropped.
    #[must_use]
    pub fn from_elements(elements: Vec<CanvasElement>, config: SessionConfig) -> Self {
        let mut session = Self::with_config(config);
        for element in elements {
            session.store.add_element(element);
        }
        session.history.reset(session.store.elements().to_vec());
        session
    }

    /// Replace the component and template catalogue.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Catalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Append a new element built by the component factory.
    ///
    /// Emits [`Notice::UnknownComponent`] if the factory does not know
    /// `kind`.
    pub fn create(&mut self, kind: &str) -> Option<ElementId> {
        self.discard_gesture();
        let Some(descriptor) = self.catalog.component(kind) else {
            self.notify(Notice::UnknownComponent(kind.to_string()));
            return None;
        };
        Some(self.create_from(descriptor))
    }

    /// Append a new element from an explicit descriptor.
    pub fn create_from(&mut self, descriptor: ElementDescriptor) -> ElementId {
        self.discard_gesture();
        let element = descriptor.into_element();
        let id = element.id;
        self.store.add_element(element);
        self.commit(CommandKind::Create);
        id
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn delete(&mut self, id: ElementId) -> bool {
        self.discard_gesture();
        let before = self.store.selected_id();
        if self.store.delete_element(id).is_none() {
            return false;
        }
        self.commit(CommandKind::Delete);
        self.report_selection(before);
        true
    }

    /// Put a deep copy of an element on the clipboard.
    ///
    /// Does not touch the document or history.
    pub fn copy(&mut self, id: ElementId) -> bool {
        self.discard_gesture();
        let Some(element) = self.store.get(id) else {
            self.notify(Notice::ElementNotFound(id));
            return false;
        };
        self.clipboard = Some(element.clone());
        self.notify(Notice::Copied);
        true
    }

    /// Append a copy of the clipboard under a new id and select it.
    ///
    /// The clipboard keeps its content, so pasting twice yields two copies.
    pub fn paste(&mut self) -> Option<ElementId> {
        self.discard_gesture();
        let Some(element) = self.clipboard.as_ref().map(CanvasElement::duplicate) else {
            self.notify(Notice::NothingToPaste);
            return None;
        };
        let id = element.id;
        self.store.add_element(element);
        self.commit(CommandKind::Paste);
        self.set_selection(Some(id));
        Some(id)
    }

    /// Place a copy of an element right after it and select the copy.
    ///
    /// Absolutely positioned copies are shifted by the configured offset so
    /// they do not hide the source. Only pixel or missing `left`/`top`
    /// values move; `50%`, `auto` and the like are copied as is. The
    /// clipboard is left alone.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        self.discard_gesture();
        let mut copy = self.store.get(id)?.duplicate();
        if copy.is_absolute() {
            let offset = self.config.duplicate_offset;
            for edge in ["left", "top"] {
                let shifted = match copy.style.get(edge) {
                    None => Some(offset),
                    Some(value) => value.as_px().map(|px| px + offset),
                };
                if let Some(px) = shifted {
                    copy.style.insert(edge.to_string(), StyleValue::px(px));
                }
            }
        }
        let copy_id = copy.id;
        self.store.insert_after(id, copy);
        self.commit(CommandKind::Duplicate);
        self.set_selection(Some(copy_id));
        Some(copy_id)
    }

    /// Swap an element with the one before it.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        self.reorder(id, Direction::Up)
    }

    /// Swap an element with the one after it.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        self.reorder(id, Direction::Down)
    }

    /// Stack an element above all others: `zIndex` becomes the highest
    /// z-index in the document plus one.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let top = self
            .store
            .elements()
            .iter()
            .map(z_index)
            .fold(f64::MIN, f64::max);
        self.set_z_index(id, top + 1.0, CommandKind::BringToFront)
    }

    /// Stack an element below all others: `zIndex` becomes the lowest
    /// z-index minus one, never below zero.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let bottom = self
            .store
            .elements()
            .iter()
            .map(z_index)
            .fold(f64::MAX, f64::min);
        self.set_z_index(id, (bottom - 1.0).max(0.0), CommandKind::SendToBack)
    }

    /// Merge style properties into an element.
    pub fn update_style(&mut self, id: ElementId, style: StyleMap) -> bool {
        self.update(id, &ElementPatch::style(style), CommandKind::UpdateStyle)
    }

    /// Replace an element's text content.
    pub fn update_content(&mut self, id: ElementId, content: impl Into<String>) -> bool {
        self.update(id, &ElementPatch::content(content), CommandKind::UpdateContent)
    }

    /// Apply a general partial update.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.update(id, patch, CommandKind::UpdateElement)
    }

    /// Set or clear an element's animation preset.
    pub fn set_animation(&mut self, id: ElementId, preset: Option<AnimationPreset>) -> bool {
        let patch = ElementPatch::animation(preset.map(|p| p.key().to_string()));
        self.update(id, &patch, CommandKind::SetAnimation)
    }

    /// Replace the document with fresh-id copies of `descriptors`.
    ///
    /// Returns the number of elements loaded.
    pub fn load_template<I>(&mut self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = ElementDescriptor>,
    {
        self.discard_gesture();
        let elements: Vec<CanvasElement> = descriptors
            .into_iter()
            .map(ElementDescriptor::into_element)
            .collect();
        let count = elements.len();
        self.replace_document(elements, CommandKind::LoadTemplate);
        count
    }

    /// Load a template by name from the catalogue.
    ///
    /// Emits [`Notice::UnknownTemplate`] if no such template exists.
    pub fn load_named_template(&mut self, name: &str) -> bool {
        self.discard_gesture();
        let Some(descriptors) = self.catalog.template(name) else {
            self.notify(Notice::UnknownTemplate(name.to_string()));
            return false;
        };
        self.load_template(descriptors);
        true
    }

    /// Replace the document with a saved project blob.
    ///
    /// # Errors
    ///
    /// Returns the [`PersistError`](crate::PersistError) that rejected the
    /// blob; the document is unchanged and a [`Notice::ImportFailed`] is
    /// emitted.
    pub fn import(&mut self, json: &str) -> PersistResult<usize> {
        self.discard_gesture();
        match persist::load(json) {
            Ok(elements) => {
                let count = elements.len();
                self.replace_document(elements, CommandKind::Import);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Rejected project import: {e}");
                self.notify(Notice::ImportFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Serialize the document as a project blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn save(&self) -> PersistResult<String> {
        persist::save(self.store.elements())
    }

    /// Step back one command. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.discard_gesture();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.restore(snapshot, CommandKind::Undo);
        true
    }

    /// Re-apply the last undone command. Returns `false` if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.discard_gesture();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.restore(snapshot, CommandKind::Redo);
        true
    }

    /// Change the selection. Not recorded in history.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.discard_gesture();
        self.set_selection(id);
    }

    // -----------------------------------------------------------------------
    // Selected-element shortcuts
    // -----------------------------------------------------------------------

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.delete(id))
    }

    /// Copy the selected element.
    pub fn copy_selected(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.copy(id))
    }

    /// Duplicate the selected element.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        self.selected_target().and_then(|id| self.duplicate(id))
    }

    /// Move the selected element up.
    pub fn move_selected_up(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.move_up(id))
    }

    /// Move the selected element down.
    pub fn move_selected_down(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.move_down(id))
    }

    /// Bring the selected element to the front.
    pub fn bring_selected_to_front(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.bring_to_front(id))
    }

    /// Send the selected element to the back.
    pub fn send_selected_to_back(&mut self) -> bool {
        self.selected_target().is_some_and(|id| self.send_to_back(id))
    }

    // -----------------------------------------------------------------------
    // Drag gestures
    // -----------------------------------------------------------------------

    /// Start moving or resizing an element from geometry `start`.
    ///
    /// Selects the target. Any gesture already in progress is discarded.
    pub fn begin_drag(
        &mut self,
        id: ElementId,
        kind: GestureKind,
        pointer: (f64, f64),
        start: Rect,
    ) -> bool {
        self.discard_gesture();
        if !self.store.contains(id) {
            return false;
        }
        self.set_selection(Some(id));
        self.drag = Some(DragGesture::new(id, kind, pointer, start, self.config.grid_size));
        true
    }

    /// Record a pointer move. Only the latest position per frame counts.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(gesture) = self.drag.as_mut() {
            gesture.pointer_move(x, y);
        }
    }

    /// Resolve the pending pointer position into preview geometry.
    pub fn drag_frame(&mut self) -> Option<Rect> {
        self.drag.as_mut().map(DragGesture::apply_frame)
    }

    /// Preview geometry of the active gesture.
    #[must_use]
    pub fn drag_preview(&self) -> Option<Rect> {
        self.drag.as_ref().map(DragGesture::current)
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Commit the gesture as a single style update.
    ///
    /// Returns `false` if nothing was committed: no gesture, the geometry
    /// did not change, or the target has disappeared.
    pub fn end_drag(&mut self) -> bool {
        let Some(gesture) = self.drag.take() else {
            return false;
        };
        let (target, kind, start) = (gesture.target(), gesture.kind(), gesture.start());
        let rect = gesture.finish();
        if rect == start {
            return false;
        }
        let patch = ElementPatch::style(kind.style_patch(rect));
        if !self.store.update_element(target, &patch) {
            return false;
        }
        self.commit(CommandKind::UpdateStyle);
        true
    }

    /// Abandon the gesture without touching the document.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Register an event callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Remove an event callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Elements in render order.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        self.store.elements()
    }

    /// Look an element up by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.store.get(id)
    }

    /// The raw selection key.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.store.selected_id()
    }

    /// The selected element, if it still exists.
    #[must_use]
    pub fn selected(&self) -> Option<&CanvasElement> {
        self.store.selected()
    }

    /// The clipboard content.
    #[must_use]
    pub fn clipboard(&self) -> Option<&CanvasElement> {
        self.clipboard.as_ref()
    }

    /// Whether undo would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The undo and redo stacks.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of document changes so far, including undo and redo.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Session settings.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The component and template catalogue.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Layers panel rows.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerSummary> {
        self.store.layers()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn reorder(&mut self, id: ElementId, direction: Direction) -> bool {
        self.discard_gesture();
        if !self.store.reorder(id, direction) {
            return false;
        }
        self.commit(match direction {
            Direction::Up => CommandKind::MoveUp,
            Direction::Down => CommandKind::MoveDown,
        });
        true
    }

    fn update(&mut self, id: ElementId, patch: &ElementPatch, command: CommandKind) -> bool {
        self.discard_gesture();
        if !self.store.update_element(id, patch) {
            return false;
        }
        self.commit(command);
        true
    }

    fn set_z_index(&mut self, id: ElementId, z: f64, command: CommandKind) -> bool {
        let mut style = StyleMap::new();
        style.insert("zIndex".to_string(), StyleValue::from(z));
        self.update(id, &ElementPatch::style(style), command)
    }

    fn replace_document(&mut self, elements: Vec<CanvasElement>, command: CommandKind) {
        let before = self.store.selected_id();
        self.store.set_elements(elements);
        self.commit(command);
        self.report_selection(before);
    }

    fn restore(&mut self, snapshot: Vec<CanvasElement>, command: CommandKind) {
        let before = self.store.selected_id();
        self.store.set_elements(snapshot);
        self.bump(command);
        self.report_selection(before);
    }

    fn commit(&mut self, command: CommandKind) {
        self.history.checkpoint(self.store.elements());
        self.bump(command);
    }

    fn bump(&mut self, command: CommandKind) {
        self.revision += 1;
        tracing::debug!(
            "Applied {command:?}: {} elements, revision {}",
            self.store.len(),
            self.revision
        );
        self.subscribers.emit(&SessionEvent::Changed {
            command,
            revision: self.revision,
        });
    }

    fn set_selection(&mut self, id: Option<ElementId>) {
        let before = self.store.selected_id();
        self.store.select_element(id);
        self.report_selection(before);
    }

    fn report_selection(&mut self, before: Option<ElementId>) {
        let selected = self.store.selected_id();
        if selected != before {
            self.subscribers
                .emit(&SessionEvent::SelectionChanged { selected });
        }
    }

    fn selected_target(&mut self) -> Option<ElementId> {
        let id = self.store.selected().map(|element| element.id);
        if id.is_none() {
            self.notify(Notice::NothingSelected);
        }
        id
    }

    fn notify(&mut self, notice: Notice) {
        tracing::debug!("Notice: {notice}");
        self.subscribers.emit(&SessionEvent::Notice { notice });
    }

    fn discard_gesture(&mut self) {
        if let Some(gesture) = self.drag.take() {
            tracing::debug!("Discarding drag on {}", gesture.target());
        }
    }
}

/// Integer part of an element's `zIndex`; `0` if unset or not a number.
fn z_index(element: &CanvasElement) -> f64 {
    match element.style.get("zIndex") {
        Some(StyleValue::Number(n)) if n.is_finite() => n.trunc(),
        Some(StyleValue::Text(text)) => text.trim().parse::<i32>().map_or(0.0, f64::from),
        _ => 0.0,
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("store", &self.store)
            .field("history", &self.history)
            .field("clipboard", &self.clipboard)
            .field("drag", &self.drag)
            .field("config", &self.config)
            .field("subscribers", &self.subscribers)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
