//! Canvas elements - the nodes a user places on the design surface.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
///
/// Assigned once at creation and never reused; copies made by paste,
/// duplicate or template load always receive a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value).map(Self)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The semantic kind of an element.
///
/// Serialized as the HTML tag name (`h2`, `button`, `img`, ...). Unknown
/// names round-trip through [`ElementTag::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementTag {
    /// A heading, level 1 to 6.
    Heading(u8),
    /// A paragraph of text.
    Paragraph,
    /// A clickable button.
    Button,
    /// An image.
    Image,
    /// A generic block container.
    Container,
    /// A navigation bar.
    Navigation,
    /// A page section.
    Section,
    /// A hyperlink.
    Link,
    /// A form.
    Form,
    /// Any other tag name.
    Custom(String),
}

impl ElementTag {
    /// A heading with the level clamped to `1..=6`.
    #[must_use]
    pub fn heading(level: u8) -> Self {
        Self::Heading(level.clamp(1, 6))
    }

    /// The HTML tag name for this element.
    #[must_use]
    pub fn html_name(&self) -> Cow<'_, str> {
        match self {
            Self::Heading(level) => Cow::Owned(format!("h{}", (*level).clamp(1, 6))),
            Self::Paragraph => Cow::Borrowed("p"),
            Self::Button => Cow::Borrowed("button"),
            Self::Image => Cow::Borrowed("img"),
            Self::Container => Cow::Borrowed("div"),
            Self::Navigation => Cow::Borrowed("nav"),
            Self::Section => Cow::Borrowed("section"),
            Self::Link => Cow::Borrowed("a"),
            Self::Form => Cow::Borrowed("form"),
            Self::Custom(name) => Cow::Borrowed(name.as_str()),
        }
    }

    /// Whether the tag is a void element (no children, no closing tag).
    #[must_use]
    pub fn is_void(&self) -> bool {
        match self {
            Self::Image => true,
            Self::Custom(name) => matches!(
                name.as_str(),
                "input" | "br" | "hr" | "meta" | "source" | "embed" | "wbr"
            ),
            _ => false,
        }
    }

    /// Human readable name shown in the layers panel.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading(_) => "Heading",
            Self::Paragraph => "Text",
            Self::Button => "Button",
            Self::Image => "Image",
            Self::Container => "Box",
            Self::Navigation => "Navbar",
            Self::Section => "Section",
            Self::Link => "Link",
            Self::Form => "Form",
            Self::Custom(_) => "Element",
        }
    }

    /// Single-glyph icon for the layers panel.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Heading(_) => "H",
            Self::Paragraph => "T",
            Self::Button => "▶",
            Self::Image => "▣",
            Self::Container | Self::Section => "□",
            Self::Navigation => "≡",
            Self::Form => "☰",
            Self::Link | Self::Custom(_) => "•",
        }
    }
}

impl From<&str> for ElementTag {
    fn from(value: &str) -> Self {
        let name = value.trim().to_ascii_lowercase();
        match name.as_str() {
            "p" => Self::Paragraph,
            "button" => Self::Button,
            "img" => Self::Image,
            "div" => Self::Container,
            "nav" => Self::Navigation,
            "section" => Self::Section,
            "a" => Self::Link,
            "form" => Self::Form,
            _ => match name.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
                Some(level @ 1..=6) => Self::Heading(level),
                _ => Self::Custom(name),
            },
        }
    }
}

impl From<String> for ElementTag {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ElementTag> for String {
    fn from(tag: ElementTag) -> Self {
        tag.html_name().into_owned()
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html_name())
    }
}

/// A single style property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A unitless number such as `opacity: 0.9`.
    Number(f64),
    /// Any textual CSS value such as `24px` or `#111`.
    Text(String),
}

impl StyleValue {
    /// The value as text, if it is textual.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Interpret the value as a pixel length (`24px`, `24` or a number).
    #[must_use]
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => {
                let text = text.trim();
                text.strip_suffix("px").unwrap_or(text).trim().parse().ok()
            }
        }
    }

    /// A pixel length such as `40px`.
    #[must_use]
    pub fn px(value: f64) -> Self {
        Self::Text(format!("{value}px"))
    }

    /// An empty text value; removes the property when merged.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Style properties keyed by property name.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Merge `patch` into `style` key by key.
///
/// An empty text value removes the property, mirroring how clearing an
/// inline style behaves in the browser.
pub fn merge_style(style: &mut StyleMap, patch: &StyleMap) {
    for (key, value) in patch {
        if value.is_unset() {
            style.remove(key);
        } else {
            style.insert(key.clone(), value.clone());
        }
    }
}

/// An element without identity, as produced by component factories and
/// template providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Element kind.
    pub tag: ElementTag,
    /// Plain text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Pre-rendered inner fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    /// Inline style properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: StyleMap,
    /// Presentation classes.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    /// Auxiliary attributes (image source, link target, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Animation preset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl ElementDescriptor {
    /// Create an empty descriptor of the given kind.
    #[must_use]
    pub fn new(tag: impl Into<ElementTag>) -> Self {
        Self {
            tag: tag.into(),
            content: None,
            markup: None,
            style: StyleMap::new(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            animation: None,
        }
    }

    /// Set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the inner markup.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    /// Set a single style property.
    #[must_use]
    pub fn with_style(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.style.insert(key.to_string(), value.into());
        self
    }

    /// Add a presentation class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Materialize the descriptor with a freshly generated id.
    #[must_use]
    pub fn into_element(self) -> CanvasElement {
        CanvasElement {
            id: ElementId::new(),
            tag: self.tag,
            content: self.content,
            markup: self.markup,
            style: self.style,
            classes: self.classes,
            attributes: self.attributes,
            animation: self.animation,
        }
    }
}

impl From<&CanvasElement> for ElementDescriptor {
    fn from(element: &CanvasElement) -> Self {
        Self {
            tag: element.tag.clone(),
            content: element.content.clone(),
            markup: element.markup.clone(),
            style: element.style.clone(),
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            animation: element.animation.clone(),
        }
    }
}

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Element kind.
    pub tag: ElementTag,
    /// Plain text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Pre-rendered inner fragment; wins over `content` when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    /// Inline style properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: StyleMap,
    /// Presentation classes.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    /// Auxiliary attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Animation preset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl CanvasElement {
    /// Create a new, empty element with the given kind.
    #[must_use]
    pub fn new(tag: impl Into<ElementTag>) -> Self {
        ElementDescriptor::new(tag).into_element()
    }

    /// Set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the inner markup.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    /// Set a single style property.
    #[must_use]
    pub fn with_style(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.style.insert(key.to_string(), value.into());
        self
    }

    /// Add a presentation class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Set the animation preset.
    #[must_use]
    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    /// Deep copy of this element under a new id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            ..self.clone()
        }
    }

    /// Whether the element is taken out of the flow by an explicit
    /// absolute position.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.style
            .get("position")
            .and_then(StyleValue::as_str)
            .is_some_and(|p| p == "absolute")
    }

    /// Apply a partial update: `style` merges key by key, every other
    /// present field replaces the current value.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(tag) = &patch.tag {
            self.tag = tag.clone();
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(markup) = &patch.markup {
            self.markup.clone_from(markup);
        }
        if let Some(style) = &patch.style {
            merge_style(&mut self.style, style);
        }
        if let Some(classes) = &patch.classes {
            self.classes.clone_from(classes);
        }
        if let Some(attributes) = &patch.attributes {
            self.attributes.clone_from(attributes);
        }
        if let Some(animation) = &patch.animation {
            self.animation.clone_from(animation);
        }
    }
}

/// Partial changes for [`CanvasElement::apply`].
///
/// `None` leaves a field untouched. For optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// Replacement kind.
    pub tag: Option<ElementTag>,
    /// Replacement text content.
    pub content: Option<Option<String>>,
    /// Replacement markup.
    pub markup: Option<Option<String>>,
    /// Style properties merged into the existing style.
    pub style: Option<StyleMap>,
    /// Replacement class set.
    pub classes: Option<BTreeSet<String>>,
    /// Replacement attribute map.
    pub attributes: Option<BTreeMap<String, String>>,
    /// Replacement animation preset.
    pub animation: Option<Option<String>>,
}

impl ElementPatch {
    /// A patch that only merges style properties.
    #[must_use]
    pub fn style(style: StyleMap) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// A patch that only replaces the text content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(Some(content.into())),
            ..Self::default()
        }
    }

    /// A patch that sets or clears the animation preset.
    #[must_use]
    pub fn animation(animation: Option<String>) -> Self {
        Self {
            animation: Some(animation),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
