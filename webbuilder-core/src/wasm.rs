//! WebAssembly bindings for webbuilder-core.
//!
//! Element ids cross the boundary as strings and structured values as JSON.

use wasm_bindgen::prelude::*;

use crate::drag::{GestureKind, Handle, Rect};
use crate::event::SubscriptionId;
use crate::{AnimationPreset, EditorSession, ElementId, SessionConfig, StyleMap, Theme};

/// Initialize the builder WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn parse_id(id: &str) -> Option<ElementId> {
    ElementId::parse(id).ok()
}

/// Log an exception thrown by a JS callback. Returns `true` if it threw.
fn report_callback_error<T, E: std::fmt::Debug>(result: Result<T, E>) -> bool {
    match result {
        Ok(_) => false,
        Err(e) => {
            tracing::warn!("Change callback threw: {e:?}");
            true
        }
    }
}

/// Editing session for WASM.
#[wasm_bindgen]
pub struct WasmSession {
    session: EditorSession,
    on_change: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session with the dark palette.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self::with_theme(Theme::Dark)
    }

    /// Create a session with the light palette.
    #[wasm_bindgen(js_name = newLight)]
    #[must_use]
    pub fn new_light() -> Self {
        Self::with_theme(Theme::Light)
    }

    /// Register the callback invoked with every session event as JSON.
    ///
    /// Replaces any previously registered callback.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        if let Some(previous) = self.on_change.take() {
            self.session.unsubscribe(previous);
        }
        let id = self.session.subscribe(move |event| {
            if let Ok(json) = serde_json::to_string(event) {
                report_callback_error(callback.call1(&JsValue::NULL, &JsValue::from_str(&json)));
            }
        });
        self.on_change = Some(id);
    }

    /// The document as a JSON array.
    #[wasm_bindgen(js_name = getElementsJson)]
    #[must_use]
    pub fn get_elements_json(&self) -> String {
        serde_json::to_string(self.session.elements()).unwrap_or_default()
    }

    /// Layers panel rows as JSON.
    #[wasm_bindgen(js_name = getLayersJson)]
    #[must_use]
    pub fn get_layers_json(&self) -> String {
        serde_json::to_string(&self.session.layers()).unwrap_or_default()
    }

    /// Id of the selected element, if it exists.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.session.selected().map(|element| element.id.to_string())
    }

    /// Change the selection; an id that is not a valid uuid clears it.
    pub fn select(&mut self, id: Option<String>) {
        self.session.select(id.as_deref().and_then(parse_id));
    }

    /// Create a component. Returns the new element's id.
    pub fn create(&mut self, kind: &str) -> Option<String> {
        self.session.create(kind).map(|id| id.to_string())
    }

    /// Delete an element.
    pub fn delete(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.delete(id))
    }

    /// Copy an element to the clipboard.
    pub fn copy(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.copy(id))
    }

    /// Paste the clipboard. Returns the new element's id.
    pub fn paste(&mut self) -> Option<String> {
        self.session.paste().map(|id| id.to_string())
    }

    /// Duplicate an element. Returns the copy's id.
    pub fn duplicate(&mut self, id: &str) -> Option<String> {
        parse_id(id)
            .and_then(|id| self.session.duplicate(id))
            .map(|id| id.to_string())
    }

    /// Move an element towards the start.
    #[wasm_bindgen(js_name = moveUp)]
    pub fn move_up(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.move_up(id))
    }

    /// Move an element towards the end.
    #[wasm_bindgen(js_name = moveDown)]
    pub fn move_down(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.move_down(id))
    }

    /// Raise an element above all others.
    #[wasm_bindgen(js_name = bringToFront)]
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.bring_to_front(id))
    }

    /// Lower an element below all others.
    #[wasm_bindgen(js_name = sendToBack)]
    pub fn send_to_back(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.send_to_back(id))
    }

    /// Merge a JSON object of style properties into an element.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is not a style object.
    #[wasm_bindgen(js_name = updateStyle)]
    pub fn update_style(&mut self, id: &str, style_json: &str) -> Result<bool, String> {
        let style: StyleMap = serde_json::from_str(style_json).map_err(|e| e.to_string())?;
        Ok(parse_id(id).is_some_and(|id| self.session.update_style(id, style)))
    }

    /// Replace an element's text.
    #[wasm_bindgen(js_name = updateContent)]
    pub fn update_content(&mut self, id: &str, content: &str) -> bool {
        parse_id(id).is_some_and(|id| self.session.update_content(id, content))
    }

    /// Set an animation preset by key, or clear it with `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown preset key.
    #[wasm_bindgen(js_name = setAnimation)]
    pub fn set_animation(&mut self, id: &str, preset: Option<String>) -> Result<bool, String> {
        let preset = match preset.as_deref() {
            Some(key) => {
                Some(AnimationPreset::from_key(key).ok_or_else(|| format!("unknown animation: {key}"))?)
            }
            None => None,
        };
        Ok(parse_id(id).is_some_and(|id| self.session.set_animation(id, preset)))
    }

    /// Replace the document with a named template.
    #[wasm_bindgen(js_name = loadTemplate)]
    pub fn load_template(&mut self, name: &str) -> bool {
        self.session.load_named_template(name)
    }

    /// Replace the document with a saved project.
    ///
    /// # Errors
    ///
    /// Returns an error string if the blob is rejected.
    #[wasm_bindgen(js_name = importProject)]
    pub fn import_project(&mut self, json: &str) -> Result<usize, String> {
        self.session.import(json).map_err(|e| e.to_string())
    }

    /// Serialize the document as a project blob.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = saveProject)]
    pub fn save_project(&self) -> Result<String, String> {
        self.session.save().map_err(|e| e.to_string())
    }

    /// Step back.
    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    /// Step forward.
    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    /// Whether undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    /// Whether redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Start moving an element whose current box is given.
    #[wasm_bindgen(js_name = beginMove)]
    #[allow(clippy::too_many_arguments)]
    pub fn begin_move(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> bool {
        let start = Rect::new(left, top, width, height);
        parse_id(id).is_some_and(|id| self.session.begin_drag(id, GestureKind::Move, (x, y), start))
    }

    /// Start resizing an element from a handle (`n`, `se`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown handle.
    #[wasm_bindgen(js_name = beginResize)]
    #[allow(clippy::too_many_arguments)]
    pub fn begin_resize(
        &mut self,
        id: &str,
        handle: &str,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<bool, String> {
        let handle: Handle = handle.parse()?;
        let start = Rect::new(left, top, width, height);
        Ok(parse_id(id).is_some_and(|id| {
            self.session
                .begin_drag(id, GestureKind::Resize(handle), (x, y), start)
        }))
    }

    /// Record a pointer move.
    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&mut self, x: f64, y: f64) {
        self.session.drag_to(x, y);
    }

    /// Resolve the latest pointer move; returns the preview box as JSON.
    #[wasm_bindgen(js_name = dragFrame)]
    pub fn drag_frame(&mut self) -> Option<String> {
        self.session
            .drag_frame()
            .and_then(|rect| serde_json::to_string(&rect).ok())
    }

    /// Commit the gesture.
    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&mut self) -> bool {
        self.session.end_drag()
    }

    /// Abandon the gesture.
    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) -> bool {
        self.session.cancel_drag()
    }
}

impl WasmSession {
    fn with_theme(theme: Theme) -> Self {
        Self {
            session: EditorSession::with_config(SessionConfig::default().with_theme(theme)),
            on_change: None,
        }
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}
