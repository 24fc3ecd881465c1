//! # Document Model
//!
//! The input representation for the renderer. A presentation is an ordered
//! list of slides; a slide is an ordered list of elements. Elements form a
//! closed tagged union over content (headers, body text, code, images) and
//! layout wrappers (center, bottom, grid, title, background) that own their
//! children by composition — the tree is finite and acyclic by construction.
//!
//! The model is designed to be easily produced three ways: direct Rust
//! construction through the helper constructors, JSON slide-definition
//! files, or any tool that can emit the serde representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB color. Serializes as a hex string (`"#RRGGBB"`), which is the form
/// used in theme configuration and slide files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RGB` or `#RRGGBB` hex string. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim_start_matches('#');
        let expand = |s: &str| u8::from_str_radix(&s.repeat(2), 16);
        let parse = |s: &str| u8::from_str_radix(s, 16);
        let (r, g, b) = match hex.len() {
            3 => (
                expand(&hex[0..1]),
                expand(&hex[1..2]),
                expand(&hex[2..3]),
            ),
            6 => (parse(&hex[0..2]), parse(&hex[2..4]), parse(&hex[4..6])),
            _ => return Err(format!("invalid hex color '{hex}': expected #RGB or #RRGGBB")),
        };
        match (r, g, b) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self {
                r: r as f64 / 255.0,
                g: g as f64 / 255.0,
                b: b as f64 / 255.0,
            }),
            _ => Err(format!("invalid hex color '#{hex}'")),
        }
    }

    pub fn to_hex(self) -> String {
        let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", ch(self.r), ch(self.g), ch(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Header level 1–3. Serializes as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeaderLevel {
    One,
    Two,
    Three,
}

impl HeaderLevel {
    /// Font-size multiplier relative to the theme header size.
    pub fn scale(self) -> f64 {
        match self {
            HeaderLevel::One => 1.0,
            HeaderLevel::Two => 0.75,
            HeaderLevel::Three => 0.6,
        }
    }

    /// Extra leading between wrapped header lines, in points.
    pub fn line_gap(self) -> f64 {
        match self {
            HeaderLevel::One => 5.0,
            HeaderLevel::Two => 4.0,
            HeaderLevel::Three => 3.0,
        }
    }
}

impl TryFrom<u8> for HeaderLevel {
    type Error = String;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(HeaderLevel::One),
            2 => Ok(HeaderLevel::Two),
            3 => Ok(HeaderLevel::Three),
            other => Err(format!("invalid header level {other}: expected 1, 2, or 3")),
        }
    }
}

impl From<HeaderLevel> for u8 {
    fn from(l: HeaderLevel) -> u8 {
        match l {
            HeaderLevel::One => 1,
            HeaderLevel::Two => 2,
            HeaderLevel::Three => 3,
        }
    }
}

/// A contiguous run of body text with a uniform style override.
///
/// Spans are the explicit structured form of inline styling: the caller
/// declares boundaries, the wrapper preserves them across line breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: true,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }
}

/// A slide element: either a leaf content unit or a layout wrapper that
/// positions its children. One page renders one ordered list of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    /// A header line in the theme header color, sized by level.
    Header {
        level: HeaderLevel,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
    },

    /// Body text composed of styled spans that wrap as one paragraph.
    Body { spans: Vec<Span> },

    /// A single bold run. Shorthand for a one-span bold body.
    Bold {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
    },

    /// A source-code block on a padded background rectangle. With a
    /// recognized `language`, tokens are colored by the highlighter.
    Code {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background: Option<Color>,
    },

    /// A raster image scaled to fit, with an optional caption beneath.
    Image {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    /// Center the child both horizontally and vertically on the page.
    /// Out of flow: does not advance the stacking cursor.
    Center { child: Box<Element> },

    /// Anchor the child's lower edge to the bottom content margin.
    Bottom { child: Box<Element> },

    /// Stack children into `columns` equal-width columns, filled
    /// contiguously (first ⌈n/c⌉ children in column 1, and so on).
    Grid { children: Vec<Element>, columns: usize },

    /// Centered like [`Element::Center`], but body text inside renders at
    /// the theme header size. Intended as the sole element of its slide.
    Title { child: Box<Element> },

    /// Full-page background image, always painted beneath everything else
    /// on the slide regardless of its position in the element list.
    Background { path: String },
}

impl Element {
    pub fn h1(text: impl Into<String>) -> Self {
        Element::Header {
            level: HeaderLevel::One,
            text: text.into(),
            color: None,
        }
    }

    pub fn h2(text: impl Into<String>) -> Self {
        Element::Header {
            level: HeaderLevel::Two,
            text: text.into(),
            color: None,
        }
    }

    pub fn h3(text: impl Into<String>) -> Self {
        Element::Header {
            level: HeaderLevel::Three,
            text: text.into(),
            color: None,
        }
    }

    /// Plain body text as a single span.
    pub fn body(text: impl Into<String>) -> Self {
        Element::Body {
            spans: vec![Span::plain(text)],
        }
    }

    /// Body text from explicit spans.
    pub fn spans(spans: Vec<Span>) -> Self {
        Element::Body { spans }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Element::Bold {
            text: text.into(),
            color: None,
        }
    }

    pub fn code(source: impl Into<String>, language: Option<&str>) -> Self {
        Element::Code {
            source: source.into(),
            language: language.map(str::to_string),
            background: None,
        }
    }

    pub fn image(path: impl Into<String>, caption: Option<&str>) -> Self {
        Element::Image {
            path: path.into(),
            caption: caption.map(str::to_string),
        }
    }

    pub fn center(child: Element) -> Self {
        Element::Center {
            child: Box::new(child),
        }
    }

    pub fn bottom(child: Element) -> Self {
        Element::Bottom {
            child: Box::new(child),
        }
    }

    pub fn grid(children: Vec<Element>, columns: usize) -> Self {
        Element::Grid { children, columns }
    }

    pub fn title(child: Element) -> Self {
        Element::Title {
            child: Box::new(child),
        }
    }

    pub fn background(path: impl Into<String>) -> Self {
        Element::Background { path: path.into() }
    }
}

/// An ordered list of elements rendered onto one page.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub elements: Vec<Element>,
    /// Where this slide came from (file name), used in error messages.
    pub label: Option<String>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self {
            elements,
            label: None,
        }
    }

    /// Explicit ordered append — the combination operation for building a
    /// slide out of individual elements.
    pub fn push(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Human-readable identity for error messages: the source label if the
    /// slide has one, otherwise its 1-based index.
    pub fn describe(&self, index: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("#{}", index + 1),
        }
    }
}

/// An ordered sequence of slides forming the output document.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }
}

/// The resolved color/font settings applied uniformly across a
/// presentation. Loaded once from configuration and passed read-only into
/// rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background_color: Color,
    pub font_color: Color,
    pub font: String,
    pub font_size: f64,
    pub header_color: Color,
    pub header_font_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            font_color: Color::BLACK,
            font: "Helvetica".to_string(),
            font_size: 24.0,
            header_color: Color::rgb(1.0, 0.341, 0.2), // #FF5733
            header_font_size: 48.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Color::from_hex("#FF5733").unwrap();
        assert_eq!(c.to_hex(), "#FF5733");
        let short = Color::from_hex("#fff").unwrap();
        assert_eq!(short.to_hex(), "#FFFFFF");
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGHHII").is_err());
    }

    #[test]
    fn header_level_from_number() {
        assert_eq!(HeaderLevel::try_from(2).unwrap(), HeaderLevel::Two);
        assert!(HeaderLevel::try_from(4).is_err());
    }

    #[test]
    fn element_json_tagged_form() {
        let el = Element::h1("Intro");
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"type\":\"Header\""), "got {json}");
        assert!(json.contains("\"level\":1"), "got {json}");

        let back: Element = serde_json::from_str(&json).unwrap();
        match back {
            Element::Header { level, text, .. } => {
                assert_eq!(level, HeaderLevel::One);
                assert_eq!(text, "Intro");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn slide_push_keeps_order() {
        let slide = Slide::new()
            .push(Element::body("hi"))
            .push(Element::bold("there"));
        assert_eq!(slide.elements.len(), 2);
        assert!(matches!(slide.elements[0], Element::Body { .. }));
        assert!(matches!(slide.elements[1], Element::Bold { .. }));
    }

    #[test]
    fn theme_defaults_match_documented_values() {
        let t = Theme::default();
        assert_eq!(t.font, "Helvetica");
        assert_eq!(t.font_size, 24.0);
        assert_eq!(t.header_font_size, 48.0);
        assert_eq!(t.background_color, Color::WHITE);
    }
}
