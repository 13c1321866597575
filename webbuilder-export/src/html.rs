//! Document export to a standalone HTML page.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use webbuilder_core::{AnimationPreset, CanvasElement, ElementTag, StylePreset};

use crate::error::{ExportError, ExportResult};

/// Classes the editor adds for its own display.
const EDITOR_CLASSES: [&str; 4] = ["selected", "drag-over", "animate-in", "canvas-element-active"];

/// Attributes the editor adds for its own bookkeeping.
const EDITOR_ATTRIBUTES: [&str; 2] = ["data-id", "data-draggable-init"];

/// Class every exported element carries.
const ELEMENT_CLASS: &str = "canvas-element";

const BASE_CSS: &str = r"
        :root {
            --color-primary: #000000;
            --color-accent: #6366f1;
            --color-background: #ffffff;
            --color-text: #111111;
            --font-body: 'Inter', sans-serif;
            --font-heading: 'Inter', sans-serif;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: var(--font-body);
            background: var(--color-background);
            color: var(--color-text);
            line-height: 1.6;
        }

        h1, h2, h3, h4, h5, h6 {
            font-family: var(--font-heading);
        }

        .canvas-element {
            position: relative;
            transition: all 0.3s ease;
        }

        nav {
            display: flex;
            justify-content: space-between;
            align-items: center;
        }

        img {
            max-width: 100%;
            height: auto;
            display: block;
        }
";

const REVEAL_SCRIPT: &str = r"
        document.querySelectorAll('.canvas-element').forEach(el => {
            if (el.dataset.animation) {
                el.style.opacity = '0';
                el.style.transform = 'translateY(20px)';
                const observer = new IntersectionObserver((entries) => {
                    entries.forEach(entry => {
                        if (entry.isIntersecting) {
                            el.style.transition = 'opacity 0.6s ease, transform 0.6s ease';
                            el.style.opacity = '1';
                            el.style.transform = 'translateY(0)';
                            observer.unobserve(el);
                        }
                    });
                });
                observer.observe(el);
            }
        });
";

/// Configuration for HTML export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Page title.
    pub title: String,
    /// Value of the `lang` attribute.
    pub lang: String,
    /// Stylesheet link for the page font; `None` omits all font links.
    pub font_href: Option<String>,
    /// Include the scroll reveal script when any element is animated.
    pub animation_script: bool,
    /// Id of the `<main>` element wrapping the document.
    pub root_id: String,
    /// Style preset whose variables override the base palette.
    pub preset: Option<StylePreset>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "My WebBuilder Export".to_string(),
            lang: "en".to_string(),
            font_href: Some(
                "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap"
                    .to_string(),
            ),
            animation_script: true,
            root_id: "webbuilder-production-root".to_string(),
            preset: None,
        }
    }
}

/// Exports a document to HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    config: ExportConfig,
}

impl HtmlExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render a complete HTML document.
    ///
    /// # Errors
    ///
    /// Returns an error if an element has an invalid tag or attribute name.
    pub fn export(&self, elements: &[CanvasElement]) -> ExportResult<String> {
        let body = self.render_body(elements)?;
        let animated = elements.iter().any(|e| e.animation.is_some());
        let config = &self.config;

        let mut out = String::with_capacity(body.len() + BASE_CSS.len() + 1024);
        out.push_str("<!DOCTYPE html>\n");
        writeln!(out, "<html lang=\"{}\">", escape_attr(&config.lang))?;
        out.push_str("<head>\n");
        out.push_str("    <meta charset=\"UTF-8\">\n");
        out.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        writeln!(out, "    <title>{}</title>", escape_text(&config.title))?;
        if let Some(href) = &config.font_href {
            out.push_str("    <link rel=\"preconnect\" href=\"https://fonts.googleapis.com\">\n");
            writeln!(out, "    <link href=\"{}\" rel=\"stylesheet\">", escape_attr(href))?;
            if let Some(preset) = config.preset {
                let href = google_fonts_href(&preset.font_families());
                writeln!(out, "    <link href=\"{}\" rel=\"stylesheet\">", escape_attr(&href))?;
            }
        }
        write!(out, "    <style>{BASE_CSS}")?;
        if let Some(preset) = config.preset {
            out.push_str("\n        :root {\n");
            for (name, value) in preset.variables() {
                writeln!(out, "            {name}: {value};")?;
            }
            out.push_str("        }\n");
        }
        out.push_str("    </style>\n");
        out.push_str("</head>\n<body>\n");
        writeln!(out, "    <main id=\"{}\">", escape_attr(&config.root_id))?;
        out.push_str(&body);
        out.push_str("    </main>\n");
        if animated && config.animation_script {
            writeln!(out, "    <script>{REVEAL_SCRIPT}    </script>")?;
        }
        out.push_str("</body>\n</html>\n");

        tracing::debug!(
            "Exported {} elements ({} bytes, animated: {animated})",
            elements.len(),
            out.len()
        );
        Ok(out)
    }

    /// Render only the elements, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error if an element has an invalid tag or attribute name.
    pub fn render_body(&self, elements: &[CanvasElement]) -> ExportResult<String> {
        let mut out = String::new();
        for element in elements {
            out.push_str("        ");
            render_element(&mut out, element)?;
            out.push('\n');
        }
        Ok(out)
    }
}

/// Export with the default configuration.
///
/// # Errors
///
/// See [`HtmlExporter::export`].
pub fn export_html(elements: &[CanvasElement]) -> ExportResult<String> {
    HtmlExporter::with_defaults().export(elements)
}

/// Write a single element as HTML.
///
/// # Errors
///
/// Returns an error if the tag or an attribute name is invalid.
pub fn render_element(out: &mut String, element: &CanvasElement) -> ExportResult<()> {
    let tag = element.tag.html_name();
    if matches!(element.tag, ElementTag::Custom(_)) && !is_valid_name(&tag, false) {
        return Err(ExportError::InvalidTag {
            element: element.id,
            name: tag.into_owned(),
        });
    }

    write!(out, "<{tag}")?;

    let preset = element.animation.as_deref().and_then(AnimationPreset::from_key);
    let classes: Vec<&str> = std::iter::once(ELEMENT_CLASS)
        .chain(
            element
                .classes
                .iter()
                .map(String::as_str)
                .filter(|c| !EDITOR_CLASSES.contains(c) && *c != ELEMENT_CLASS),
        )
        .chain(preset.map(AnimationPreset::class))
        .collect();
    write!(out, " class=\"{}\"", escape_attr(&classes.join(" ")))?;

    if !element.style.is_empty() {
        let style = element
            .style
            .iter()
            .filter(|(_, value)| !value.is_unset())
            .map(|(key, value)| format!("{}: {value}", kebab_case(key)))
            .collect::<Vec<_>>()
            .join("; ");
        write!(out, " style=\"{}\"", escape_attr(&style))?;
    }

    for (name, value) in &element.attributes {
        let lower = name.to_ascii_lowercase();
        if EDITOR_ATTRIBUTES.contains(&lower.as_str()) || lower == "class" || lower == "style" {
            continue;
        }
        if !is_valid_name(name, true) {
            return Err(ExportError::InvalidAttribute {
                element: element.id,
                name: name.clone(),
            });
        }
        write!(out, " {name}=\"{}\"", escape_attr(value))?;
    }

    if let Some(animation) = &element.animation {
        write!(out, " data-animation=\"{}\"", escape_attr(animation))?;
    }

    out.push('>');
    if element.tag.is_void() {
        return Ok(());
    }

    match (&element.markup, &element.content) {
        (Some(markup), _) => out.push_str(markup),
        (None, Some(content)) => out.push_str(&escape_text(content)),
        (None, None) => {}
    }
    write!(out, "</{tag}>")?;
    Ok(())
}

/// Stylesheet URL loading `families` from Google Fonts.
fn google_fonts_href(families: &[&str]) -> String {
    let query: Vec<String> = families
        .iter()
        .map(|family| format!("family={}:wght@400;500;600;700", family.replace(' ', "+")))
        .collect();
    format!("https://fonts.googleapis.com/css2?{}&display=swap", query.join("&"))
}

/// Convert a camelCase style key to its CSS property name.
#[must_use]
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape text content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Tag names: a letter followed by letters, digits or `-`.
/// Attribute names additionally allow `_`, `:` and `.`.
fn is_valid_name(name: &str, attribute: bool) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| {
            c.is_ascii_alphanumeric() || c == '-' || (attribute && matches!(c, '_' | ':' | '.'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("gridTemplateColumns"), "grid-template-columns");
        assert_eq!(kebab_case("color"), "color");
        assert_eq!(kebab_case("font-size"), "font-size");
    }

    #[test]
    fn test_google_fonts_href() {
        assert_eq!(
            google_fonts_href(&["Space Grotesk", "Inter"]),
            "https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600;700\
             &family=Inter:wght@400;500;600;700&display=swap"
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("my-widget", false));
        assert!(is_valid_name("h7", false));
        assert!(!is_valid_name("", false));
        assert!(!is_valid_name("1abc", false));
        assert!(!is_valid_name("div onclick", false));
        assert!(!is_valid_name("x_y", false));
        assert!(is_valid_name("xlink:href", true));
    }

    #[test]
    fn test_void_element_has_no_closing_tag() {
        let image = CanvasElement::new(ElementTag::Image).with_attribute("src", "a.png");
        let mut out = String::new();
        render_element(&mut out, &image).expect("render");
        assert_eq!(out, r#"<img class="canvas-element" src="a.png">"#);
    }

    #[test]
    fn test_markup_wins_over_content() {
        let element = CanvasElement::new("div")
            .with_content("ignored")
            .with_markup("<b>kept</b>");
        let mut out = String::new();
        render_element(&mut out, &element).expect("render");
        assert!(out.ends_with("<b>kept</b></div>"));
        assert!(!out.contains("ignored"));
    }
}
