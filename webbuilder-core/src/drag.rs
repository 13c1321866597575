//! Drag and resize gestures.
//!
//! A gesture is transient: pointer moves only record the latest position,
//! a frame tick folds that position into preview geometry, and nothing
//! touches the document until the session commits the final rectangle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ElementId, StyleMap, StyleValue};

/// Default snapping grid in pixels.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Element geometry in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the canvas' left edge.
    pub left: f64,
    /// Distance from the canvas' top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Read geometry from inline style, if width and height are known.
    #[must_use]
    pub fn from_style(style: &StyleMap) -> Option<Self> {
        let px = |key: &str| style.get(key).and_then(StyleValue::as_px);
        Some(Self {
            left: px("left").unwrap_or(0.0),
            top: px("top").unwrap_or(0.0),
            width: px("width")?,
            height: px("height")?,
        })
    }
}

/// A resize handle on the selection outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl Handle {
    /// Every handle, in the order they are laid out.
    pub const ALL: [Self; 8] = [
        Self::Nw,
        Self::Ne,
        Self::Sw,
        Self::Se,
        Self::N,
        Self::S,
        Self::E,
        Self::W,
    ];

    fn north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    fn east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Self::N),
            "s" => Ok(Self::S),
            "e" => Ok(Self::E),
            "w" => Ok(Self::W),
            "ne" => Ok(Self::Ne),
            "nw" => Ok(Self::Nw),
            "se" => Ok(Self::Se),
            "sw" => Ok(Self::Sw),
            other => Err(format!("unknown resize handle: {other}")),
        }
    }
}

/// What a gesture does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "lowercase")]
pub enum GestureKind {
    /// Move the element, keeping its size.
    Move,
    /// Resize from a handle.
    Resize(Handle),
}

impl GestureKind {
    /// Style properties that commit `rect` for this kind of gesture.
    ///
    /// Moves keep the element's size; resizes write all four edges.
    #[must_use]
    pub fn style_patch(self, rect: Rect) -> StyleMap {
        let mut style = StyleMap::new();
        style.insert("position".into(), "absolute".into());
        style.insert("left".into(), StyleValue::px(rect.left));
        style.insert("top".into(), StyleValue::px(rect.top));
        if matches!(self, Self::Resize(_)) {
            style.insert("width".into(), StyleValue::px(rect.width));
            style.insert("height".into(), StyleValue::px(rect.height));
        }
        style
    }
}

/// Round `value` to the nearest grid line. No grid leaves it unchanged.
#[must_use]
pub fn snap(value: f64, grid: Option<f64>) -> f64 {
    match grid {
        Some(size) if size > 0.0 => (value / size).round() * size,
        _ => value,
    }
}

/// Geometry after moving `start` by the pointer delta.
#[must_use]
pub fn moved(start: Rect, dx: f64, dy: f64, grid: Option<f64>) -> Rect {
    Rect {
        left: snap(start.left + dx, grid),
        top: snap(start.top + dy, grid),
        ..start
    }
}

/// Geometry after dragging `handle` by the pointer delta.
///
/// North and west handles move the top/left edge so the opposite edge
/// stays put. Sizes never drop below one grid cell (or one pixel).
#[must_use]
pub fn resized(start: Rect, handle: Handle, dx: f64, dy: f64, grid: Option<f64>) -> Rect {
    let min = grid.filter(|g| *g > 0.0).unwrap_or(1.0);
    let mut rect = start;
    if handle.east() {
        rect.width = snap(start.width + dx, grid).max(min);
    }
    if handle.west() {
        rect.width = snap(start.width - dx, grid).max(min);
        rect.left = snap(start.left + (start.width - rect.width), grid);
    }
    if handle.south() {
        rect.height = snap(start.height + dy, grid).max(min);
    }
    if handle.north() {
        rect.height = snap(start.height - dy, grid).max(min);
        rect.top = snap(start.top + (start.height - rect.height), grid);
    }
    rect
}

/// An in-progress drag or resize.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    target: ElementId,
    kind: GestureKind,
    origin: (f64, f64),
    start: Rect,
    current: Rect,
    pending: Option<(f64, f64)>,
    grid: Option<f64>,
}

impl DragGesture {
    /// Begin a gesture at pointer position `origin` over geometry `start`.
    #[must_use]
    pub fn new(
        target: ElementId,
        kind: GestureKind,
        origin: (f64, f64),
        start: Rect,
        grid: Option<f64>,
    ) -> Self {
        Self {
            target,
            kind,
            origin,
            start,
            current: start,
            pending: None,
            grid,
        }
    }

    /// Record a pointer position. Only the latest one per frame is used.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pending = Some((x, y));
    }

    /// Whether a pointer move is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fold the pending pointer position into the preview geometry.
    pub fn apply_frame(&mut self) -> Rect {
        if let Some((x, y)) = self.pending.take() {
            let (dx, dy) = (x - self.origin.0, y - self.origin.1);
            self.current = match self.kind {
                GestureKind::Move => moved(self.start, dx, dy, self.grid),
                GestureKind::Resize(handle) => resized(self.start, handle, dx, dy, self.grid),
            };
        }
        self.current
    }

    /// Flush any pending move and return the final geometry.
    #[must_use]
    pub fn finish(mut self) -> Rect {
        self.apply_frame()
    }

    /// Element being dragged.
    #[must_use]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Move or resize.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// Geometry when the gesture began.
    #[must_use]
    pub fn start(&self) -> Rect {
        self.start
    }

    /// Preview geometry as of the last frame.
    #[must_use]
    pub fn current(&self) -> Rect {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: Option<f64> = Some(DEFAULT_GRID_SIZE);

    #[test]
    fn test_snap() {
        assert!((snap(29.0, GRID) - 20.0).abs() < f64::EPSILON);
        assert!((snap(31.0, GRID) - 40.0).abs() < f64::EPSILON);
        assert!((snap(31.0, None) - 31.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_west_resize_keeps_right_edge() {
        let start = Rect::new(100.0, 0.0, 200.0, 100.0);
        let rect = resized(start, Handle::W, -40.0, 0.0, GRID);
        assert_eq!(rect, Rect::new(60.0, 0.0, 240.0, 100.0));
    }

    #[test]
    fn test_north_east_resize() {
        let start = Rect::new(0.0, 100.0, 100.0, 100.0);
        let rect = resized(start, Handle::Ne, 20.0, 40.0, GRID);
        assert_eq!(rect, Rect::new(0.0, 140.0, 120.0, 60.0));
    }

    #[test]
    fn test_resize_never_collapses() {
        let start = Rect::new(0.0, 0.0, 40.0, 40.0);
        let rect = resized(start, Handle::Se, -500.0, -500.0, GRID);
        assert!((rect.width - 20.0).abs() < f64::EPSILON);
        assert!((rect.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gesture_coalesces_moves() {
        let mut gesture = DragGesture::new(
            ElementId::new(),
            GestureKind::Move,
            (10.0, 10.0),
            Rect::new(0.0, 0.0, 50.0, 50.0),
            None,
        );
        gesture.pointer_move(15.0, 12.0);
        gesture.pointer_move(30.0, 40.0);
        assert!(gesture.has_pending());

        let preview = gesture.apply_frame();
        assert_eq!(preview, Rect::new(20.0, 30.0, 50.0, 50.0));
        assert!(!gesture.has_pending());
        assert_eq!(gesture.apply_frame(), preview);
    }

    #[test]
    fn test_move_patch_keeps_size() {
        let patch = GestureKind::Move.style_patch(Rect::new(20.0, 40.0, 10.0, 10.0));
        assert_eq!(patch["left"], StyleValue::from("20px"));
        assert_eq!(patch["position"], StyleValue::from("absolute"));
        assert!(!patch.contains_key("width"));
    }

    #[test]
    fn test_rect_from_style() {
        let mut style = StyleMap::new();
        style.insert("width".into(), "120px".into());
        style.insert("height".into(), StyleValue::Number(80.0));
        style.insert("left".into(), "20px".into());
        let rect = Rect::from_style(&style).expect("size known");
        assert_eq!(rect, Rect::new(20.0, 0.0, 120.0, 80.0));

        style.remove("height");
        assert!(Rect::from_style(&style).is_none());
    }

    #[test]
    fn test_handle_parse() {
        assert_eq!("sw".parse::<Handle>(), Ok(Handle::Sw));
        assert!("x".parse::<Handle>().is_err());
    }
}
