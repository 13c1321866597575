//! Component factory and page templates.
//!
//! The session only depends on the [`ComponentFactory`] and
//! [`TemplateProvider`] traits; [`ComponentRegistry`] is the built-in
//! catalogue, coloured by a [`Palette`].

use serde::{Deserialize, Serialize};

use crate::{ElementDescriptor, ElementTag};

/// Editor colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark editor chrome.
    #[default]
    Dark,
    /// Light editor chrome.
    Light,
}

/// Colours used when instantiating components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Accent colour.
    pub primary: &'static str,
    /// Second accent, used for gradients.
    pub secondary: &'static str,
    /// Primary text.
    pub text: &'static str,
    /// Secondary text.
    pub text_secondary: &'static str,
    /// Input backgrounds.
    pub background: &'static str,
    /// Borders.
    pub border: &'static str,
    /// Card and container surfaces.
    pub surface: &'static str,
}

impl Palette {
    /// Palette for a theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                primary: "#6366f1",
                secondary: "#4f46e5",
                text: "#1e293b",
                text_secondary: "#64748b",
                background: "#ffffff",
                border: "#e2e8f0",
                surface: "#f8fafc",
            },
            Theme::Dark => Self {
                primary: "#6366f1",
                secondary: "#4f46e5",
                text: "#f1f5f9",
                text_secondary: "#94a3b8",
                background: "#334155",
                border: "#475569",
                surface: "#1e293b",
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}

/// Turns a component type name into an element descriptor.
pub trait ComponentFactory {
    /// Descriptor for `kind`, or `None` if the type is unknown.
    fn component(&self, kind: &str) -> Option<ElementDescriptor>;

    /// Component types this factory understands.
    fn component_kinds(&self) -> Vec<&'static str>;

    /// Whole-section blocks, also resolved by [`ComponentFactory::component`].
    fn section_kinds(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Supplies whole-page templates.
pub trait TemplateProvider {
    /// Ordered descriptors for template `name`, or `None` if unknown.
    fn template(&self, name: &str) -> Option<Vec<ElementDescriptor>>;

    /// Names of the available templates.
    fn template_names(&self) -> Vec<&'static str>;
}

/// Both collaborators a session consults.
pub trait Catalog: ComponentFactory + TemplateProvider {}

impl<T: ComponentFactory + TemplateProvider> Catalog for T {}

const COMPONENTS: [&str; 10] = [
    "heading",
    "paragraph",
    "button",
    "image",
    "container",
    "form",
    "card",
    "navbar",
    "section",
    "link",
];

const SECTIONS: [&str; 4] = ["hero", "features", "testimonials", "footer"];

const TEMPLATES: [&str; 3] = ["landing", "portfolio", "resume"];

/// The built-in component and template catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentRegistry {
    palette: Palette,
}

impl ComponentRegistry {
    /// Registry using the given palette.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Registry for a theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        Self::new(Palette::for_theme(theme))
    }

    /// The palette in use.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    fn landing(&self) -> Vec<ElementDescriptor> {
        vec![
            ElementDescriptor::new(ElementTag::Section)
                .with_class("animate-in")
                .with_style("padding", "80px 24px")
                .with_style("background", "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)")
                .with_style("textAlign", "center")
                .with_style("color", "white")
                .with_style("borderRadius", "16px")
                .with_markup(concat!(
                    r#"<h1 style="font-size: 56px; margin-bottom: 24px;">Launch Your Product</h1>"#,
                    r#"<p style="font-size: 24px; margin-bottom: 32px; opacity: 0.95;">The all-in-one platform for modern businesses</p>"#,
                    r#"<button style="padding: 16px 40px; background: white; color: #0891b2; border: none; border-radius: 8px; font-size: 18px; font-weight: 600;">Get Started Free</button>"#,
                )),
        ]
    }

    fn section(&self, kind: &str) -> Option<ElementDescriptor> {
        let p = self.palette;
        let block = ElementDescriptor::new(ElementTag::Container).with_class("animate-in");
        let descriptor = match kind {
            "hero" => block
                .with_style("padding", "80px 48px")
                .with_style("textAlign", "center")
                .with_style(
                    "background",
                    format!("linear-gradient(135deg, {} 0%, {} 100%)", p.primary, p.secondary),
                )
                .with_style("color", "white")
                .with_style("borderRadius", "20px")
                .with_markup(format!(
                    concat!(
                        r#"<h1 style="font-size: 48px; font-weight: 800; margin-bottom: 20px;">Transform Your Digital Presence</h1>"#,
                        r#"<p style="font-size: 20px; opacity: 0.9; max-width: 600px; margin: 0 auto 32px;">Build stunning websites in minutes with our intuitive drag-and-drop builder.</p>"#,
                        r#"<div style="display: flex; gap: 16px; justify-content: center;">"#,
                        r#"<button style="padding: 14px 32px; background: white; color: {primary}; border: none; border-radius: 12px; font-weight: 600; cursor: pointer;">Get Started</button>"#,
                        r#"<button style="padding: 14px 32px; background: transparent; color: white; border: 2px solid white; border-radius: 12px; font-weight: 600; cursor: pointer;">Learn More</button>"#,
                        "</div>",
                    ),
                    primary = p.primary,
                )),
            "features" => {
                let feature = |icon: &str, title: &str, blurb: &str| {
                    format!(
                        r#"<div style="padding: 32px; background: {surface}; border-radius: 16px; text-align: center; border: 1px solid {border};"><div style="font-size: 40px; margin-bottom: 16px;">{icon}</div><h3 style="color: {text}; margin-bottom: 12px;">{title}</h3><p style="color: {secondary};">{blurb}</p></div>"#,
                        surface = p.surface,
                        border = p.border,
                        text = p.text,
                        secondary = p.text_secondary,
                    )
                };
                block
                    .with_style("padding", "64px 24px")
                    .with_style("display", "grid")
                    .with_style("gridTemplateColumns", "repeat(3, 1fr)")
                    .with_style("gap", "24px")
                    .with_markup(
                        [
                            feature("🚀", "Fast Performance", "Optimized for maximum speed and SEO efficiency."),
                            feature("🎨", "Intuitive Design", "Beautifully crafted blocks ready for your content."),
                            feature("📱", "Fully Responsive", "Looks perfect on every device, from mobile to desktop."),
                        ]
                        .concat(),
                    )
            }
            "testimonials" => {
                let quote = |text: &str, name: &str, role: &str| {
                    format!(
                        r#"<div style="padding: 24px; background: {background}; border-radius: 12px; border: 1px solid {border};"><p style="font-style: italic; color: {secondary}; margin-bottom: 20px;">"{text}"</p><div style="display: flex; align-items: center; gap: 12px;"><div style="width: 48px; height: 48px; background: #cbd5e1; border-radius: 50%;"></div><div><div style="font-weight: 600; color: {fg};">{name}</div><div style="font-size: 14px; color: {secondary};">{role}</div></div></div></div>"#,
                        background = p.background,
                        border = p.border,
                        secondary = p.text_secondary,
                        fg = p.text,
                    )
                };
                block
                    .with_style("padding", "64px 24px")
                    .with_style("background", p.surface)
                    .with_style("borderRadius", "20px")
                    .with_markup(format!(
                        r#"<h2 style="text-align: center; margin-bottom: 48px; color: {};">What our clients say</h2><div style="display: grid; grid-template-columns: repeat(2, 1fr); gap: 32px;">{}{}</div>"#,
                        p.text,
                        quote(
                            "The best website builder I've ever used. Simple, powerful, and fun to use!",
                            "Sarah Johnson",
                            "Product Designer",
                        ),
                        quote(
                            "Customer support is top-notch and the quality of components is incredible.",
                            "Michael Chen",
                            "Startup Founder",
                        ),
                    ))
            }
            "footer" => block
                .with_style("padding", "48px 24px")
                .with_style("background", p.text)
                .with_style("color", "white")
                .with_style("borderRadius", "16px 16px 0 0")
                .with_markup(concat!(
                    r#"<div style="display: flex; justify-content: space-between; margin-bottom: 40px;">"#,
                    r#"<div><div style="font-size: 24px; font-weight: 700; margin-bottom: 12px;">WebBuilder</div>"#,
                    r#"<p style="opacity: 0.6; max-width: 300px;">Helping creators build the future of the web, one block at a time.</p></div>"#,
                    r#"<div style="display: flex; gap: 48px;">"#,
                    r#"<div><div style="font-weight: 600; margin-bottom: 16px;">Product</div><div style="opacity: 0.6; line-height: 2;">Features<br>Templates<br>Pricing</div></div>"#,
                    r#"<div><div style="font-weight: 600; margin-bottom: 16px;">Connect</div><div style="opacity: 0.6; line-height: 2;">Twitter<br>LinkedIn<br>Dribbble</div></div>"#,
                    "</div></div>",
                    r#"<div style="padding-top: 32px; border-top: 1px solid rgba(255,255,255,0.1); opacity: 0.4; font-size: 14px; text-align: center;">© 2024 WebBuilder AI. All rights reserved.</div>"#,
                )),
            _ => return None,
        };
        Some(descriptor)
    }

    fn portfolio(&self) -> Vec<ElementDescriptor> {
        let p = self.palette;
        let service = |icon: &str, title: &str, blurb: &str| {
            format!(
                r#"<div style="padding: 24px; background: {surface}; border-radius: 12px; text-align: center;"><div style="font-size: 48px; margin-bottom: 16px;">{icon}</div><h3 style="color: {text}; margin-bottom: 8px;">{title}</h3><p style="color: {secondary};">{blurb}</p></div>"#,
                surface = p.surface,
                text = p.text,
                secondary = p.text_secondary,
            )
        };
        vec![
            ElementDescriptor::new(ElementTag::Section)
                .with_class("animate-in")
                .with_style("textAlign", "center")
                .with_style("padding", "64px 24px")
                .with_style("background", "linear-gradient(135deg, #667eea 0%, #764ba2 100%)")
                .with_style("color", "white")
                .with_style("borderRadius", "16px")
                .with_markup(concat!(
                    r#"<h1 style="font-size: 56px; margin-bottom: 16px;">John Doe</h1>"#,
                    r#"<p style="font-size: 24px; opacity: 0.9;">Full Stack Developer &amp; Designer</p>"#,
                )),
            ElementDescriptor::new(ElementTag::heading(2))
                .with_content("About Me")
                .with_style("fontSize", "32px")
                .with_style("marginBottom", "24px")
                .with_style("color", p.text),
            ElementDescriptor::new(ElementTag::Paragraph)
                .with_content(
                    "I'm a passionate developer with 5+ years of experience creating beautiful \
                     and functional web applications.",
                )
                .with_style("fontSize", "18px")
                .with_style("lineHeight", "1.8")
                .with_style("color", p.text_secondary),
            ElementDescriptor::new(ElementTag::Container)
                .with_style("display", "grid")
                .with_style("gridTemplateColumns", "repeat(3, 1fr)")
                .with_style("gap", "24px")
                .with_style("padding", "24px")
                .with_markup(
                    [
                        service("💻", "Web Development", "Building responsive websites"),
                        service("🎨", "UI/UX Design", "Creating beautiful interfaces"),
                        service("📱", "Mobile Apps", "Developing mobile solutions"),
                    ]
                    .concat(),
                ),
        ]
    }

    fn resume(&self) -> Vec<ElementDescriptor> {
        let p = self.palette;
        vec![
            ElementDescriptor::new(ElementTag::heading(1))
                .with_class("resume-name")
                .with_content("Jane Smith")
                .with_style("color", p.text),
            ElementDescriptor::new(ElementTag::Paragraph)
                .with_class("resume-contact")
                .with_content("jane.smith@email.com | (555) 123-4567 | LinkedIn: /in/janesmith")
                .with_style("color", p.text_secondary),
            ElementDescriptor::new(ElementTag::Section)
                .with_class("resume-section")
                .with_markup(format!(
                    r#"<h2 class="resume-section-title" style="color: {};">Professional Summary</h2><p style="color: {};">Results-driven professional with 8+ years of experience in software development and project management.</p>"#,
                    p.text, p.text_secondary
                )),
            ElementDescriptor::new(ElementTag::Section)
                .with_class("resume-section")
                .with_markup(format!(
                    r#"<h2 class="resume-section-title" style="color: {text};">Experience</h2><div class="resume-item"><div class="resume-item-title" style="color: {text};">Senior Software Engineer | Tech Company Inc.</div><div class="resume-item-subtitle" style="color: {secondary};">January 2020 - Present</div><ul style="margin-top: 8px; color: {secondary};"><li>Led development of scalable web applications serving 1M+ users</li><li>Mentored junior developers and conducted code reviews</li></ul></div>"#,
                    text = p.text,
                    secondary = p.text_secondary,
                )),
        ]
    }
}

impl ComponentFactory for ComponentRegistry {
    fn component(&self, kind: &str) -> Option<ElementDescriptor> {
        let p = self.palette;
        let descriptor = match kind {
            "heading" => ElementDescriptor::new(ElementTag::heading(2))
                .with_content("New Heading")
                .with_style("color", p.text)
                .with_style("margin", "0"),
            "paragraph" => ElementDescriptor::new(ElementTag::Paragraph)
                .with_content(
                    "This is a new paragraph. Click to edit the text and customize its appearance.",
                )
                .with_style("color", p.text_secondary)
                .with_style("margin", "0"),
            "button" => ElementDescriptor::new(ElementTag::Button)
                .with_content("Click Me")
                .with_style("padding", "12px 24px")
                .with_style("background", "#6366f1")
                .with_style("color", "white")
                .with_style("border", "none")
                .with_style("borderRadius", "8px")
                .with_style("fontSize", "14px")
                .with_style("fontWeight", "500")
                .with_style("cursor", "pointer"),
            "image" => ElementDescriptor::new(ElementTag::Image)
                .with_style("width", "100%")
                .with_style("borderRadius", "8px")
                .with_attribute(
                    "src",
                    "https://via.placeholder.com/400x200?text=Image+Placeholder",
                )
                .with_attribute("alt", "Placeholder"),
            "container" => ElementDescriptor::new(ElementTag::Container)
                .with_content("Container - Drop elements here")
                .with_style("padding", "48px 24px")
                .with_style("background", p.surface)
                .with_style("border", format!("2px dashed {}", p.border))
                .with_style("borderRadius", "12px")
                .with_style("minHeight", "100px")
                .with_style("display", "flex")
                .with_style("alignItems", "center")
                .with_style("justifyContent", "center"),
            "form" => ElementDescriptor::new(ElementTag::Form)
                .with_style("padding", "20px")
                .with_markup(format!(
                    r#"<div style="margin-bottom: 16px;"><label style="display: block; margin-bottom: 8px; font-weight: 500; color: {text};">Email Address</label><input type="email" placeholder="hello@example.com" style="width: 100%; padding: 10px; border-radius: 6px; border: 1px solid {border}; background: {background}; color: {text};"></div><button type="button" style="width: 100%; padding: 10px; background: #6366f1; color: white; border: none; border-radius: 6px;">Subscribe</button>"#,
                    text = p.text,
                    border = p.border,
                    background = p.background,
                )),
            "card" => ElementDescriptor::new(ElementTag::Container)
                .with_style("padding", "24px")
                .with_style("background", p.surface)
                .with_style("border", format!("1px solid {}", p.border))
                .with_style("borderRadius", "16px")
                .with_style("boxShadow", "var(--shadow-md)")
                .with_markup(format!(
                    r#"<h3 style="margin: 0 0 12px 0; color: {};">Card Title</h3><p style="margin: 0; color: {}; font-size: 14px; line-height: 1.6;">This is a premium card component. You can add images, text, or buttons inside it.</p>"#,
                    p.text, p.text_secondary
                )),
            "navbar" => ElementDescriptor::new(ElementTag::Navigation)
                .with_style("display", "flex")
                .with_style("justifyContent", "space-between")
                .with_style("alignItems", "center")
                .with_style("padding", "16px 32px")
                .with_style("background", p.surface)
                .with_style("borderBottom", format!("1px solid {}", p.border))
                .with_style("borderRadius", "8px")
                .with_markup(format!(
                    r#"<div style="font-weight: 700; color: {}; font-size: 20px;">LOGO</div><div style="display: flex; gap: 24px; color: {}; font-size: 14px; font-weight: 500;"><span>Home</span><span>Features</span><span>Pricing</span><span>Contact</span></div>"#,
                    p.text, p.text_secondary
                )),
            "section" => ElementDescriptor::new(ElementTag::Section)
                .with_style("padding", "64px 24px")
                .with_style("background", p.surface)
                .with_style("borderRadius", "12px")
                .with_markup(format!(
                    r#"<h2 style="color: {}; margin-bottom: 16px;">Section Title</h2><p style="color: {};">Tell visitors what this part of the page is about.</p>"#,
                    p.text, p.text_secondary
                )),
            "link" => ElementDescriptor::new(ElementTag::Link)
                .with_content("Learn more")
                .with_attribute("href", "#")
                .with_style("color", "#6366f1")
                .with_style("textDecoration", "underline"),
            _ => return self.section(kind),
        };
        Some(descriptor)
    }

    fn component_kinds(&self) -> Vec<&'static str> {
        COMPONENTS.to_vec()
    }

    fn section_kinds(&self) -> Vec<&'static str> {
        SECTIONS.to_vec()
    }
}

impl TemplateProvider for ComponentRegistry {
    fn template(&self, name: &str) -> Option<Vec<ElementDescriptor>> {
        match name {
            "landing" => Some(self.landing()),
            "portfolio" => Some(self.portfolio()),
            "resume" => Some(self.resume()),
            _ => None,
        }
    }

    fn template_names(&self) -> Vec<&'static str> {
        TEMPLATES.to_vec()
    }
}
