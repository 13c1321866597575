//! # Webbuilder Core
//!
//! Document model and editing session for a visual web page builder.
//! Compiles to WASM for use from the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               EditorSession                 │
//! ├─────────────────────────────────────────────┤
//! │  ElementStore    │  History                 │
//! │  - Elements      │  - Undo snapshots        │
//! │  - Selection     │  - Redo snapshots        │
//! ├─────────────────────────────────────────────┤
//! │  DragGesture     │  Catalog                 │
//! │  - Move/resize   │  - Components            │
//! │  - Grid snapping │  - Templates             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every document change goes through [`EditorSession`], which records one
//! history checkpoint per command and notifies subscribers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod config;
pub mod drag;
pub mod element;
pub mod error;
pub mod event;
pub mod history;
pub mod persist;
pub mod preset;
pub mod project;
pub mod session;
pub mod store;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use animation::AnimationPreset;
pub use config::SessionConfig;
pub use drag::{DragGesture, GestureKind, Handle, Rect};
pub use element::{
    merge_style, CanvasElement, ElementDescriptor, ElementId, ElementPatch, ElementTag, StyleMap,
    StyleValue,
};
pub use error::{PersistError, PersistResult};
pub use event::{CommandKind, Notice, SessionEvent, SubscriptionId};
pub use history::{History, Snapshot};
pub use persist::ProjectDocument;
pub use preset::StylePreset;
pub use project::{Project, ProjectStore, ProjectUpdate, StoreError};
pub use session::EditorSession;
pub use store::{Direction, ElementStore, LayerSummary};
pub use template::{
    Catalog, ComponentFactory, ComponentRegistry, Palette, TemplateProvider, Theme,
};

/// Webbuilder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
