//! Session events and the subscriber list the UI layer re-renders from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// The command that produced a [`SessionEvent::Changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// A new element was created from a component.
    Create,
    /// An element was removed.
    Delete,
    /// The clipboard was pasted.
    Paste,
    /// An element was duplicated in place.
    Duplicate,
    /// An element moved one step towards the start.
    MoveUp,
    /// An element moved one step towards the end.
    MoveDown,
    /// An element was raised above every other element.
    BringToFront,
    /// An element was lowered below every other element.
    SendToBack,
    /// Style properties were merged (including committed drags).
    UpdateStyle,
    /// Text content was replaced.
    UpdateContent,
    /// A general partial update was applied.
    UpdateElement,
    /// The animation preset changed.
    SetAnimation,
    /// The document was replaced by a template.
    LoadTemplate,
    /// The document was replaced by an imported project.
    Import,
    /// History stepped back.
    Undo,
    /// History stepped forward.
    Redo,
}

/// A transient, user-visible message. Never interrupts the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Notice {
    /// A selection-based command ran with nothing selected.
    NothingSelected,
    /// Paste ran with an empty clipboard.
    NothingToPaste,
    /// The target element no longer exists.
    ElementNotFound(ElementId),
    /// The component factory does not know this type.
    UnknownComponent(String),
    /// The template provider does not know this template.
    UnknownTemplate(String),
    /// A project blob could not be imported.
    ImportFailed(String),
    /// An element was copied to the clipboard.
    Copied,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingSelected => f.write_str("Select something first"),
            Self::NothingToPaste => f.write_str("Nothing to paste"),
            Self::ElementNotFound(id) => write!(f, "Element {id} no longer exists"),
            Self::UnknownComponent(kind) => write!(f, "Unknown component: {kind}"),
            Self::UnknownTemplate(name) => write!(f, "Unknown template: {name}"),
            Self::ImportFailed(reason) => write!(f, "Import failed: {reason}"),
            Self::Copied => f.write_str("Copied! Paste to place a copy"),
        }
    }
}

/// Something observers of a session may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The document changed; fires once per committed command.
    Changed {
        /// Command that caused the change.
        command: CommandKind,
        /// Monotonic document revision after the change.
        revision: u64,
    },
    /// The selection moved.
    SelectionChanged {
        /// Newly selected element, if any.
        selected: Option<ElementId>,
    },
    /// A notice for the user.
    Notice {
        /// The notice.
        notice: Notice,
    },
}

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked for every session event.
pub type Subscriber = Box<dyn FnMut(&SessionEvent)>;

/// Registered event callbacks, notified in subscription order.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

impl Subscribers {
    /// Create an empty subscriber list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver an event to every subscriber.
    pub fn emit(&mut self, event: &SessionEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::new();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            subscribers.subscribe(move |_| seen.borrow_mut().push(tag));
        }

        subscribers.emit(&SessionEvent::Notice {
            notice: Notice::NothingToPaste,
        });
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::new();
        let counter = Rc::clone(&count);
        let id = subscribers.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.emit(&SessionEvent::SelectionChanged { selected: None });
        assert_eq!(*count.borrow(), 0);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = SessionEvent::Changed {
            command: CommandKind::MoveUp,
            revision: 3,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "changed");
        assert_eq!(json["command"], "move_up");
    }
}
