//! # Configuration
//!
//! A presentation is described by one YAML file: an optional `theme`
//! block, the ordered `slide_order` list of slide-definition files, and an
//! optional `output` path. Slide definitions are JSON files holding either
//! a single element or an array of elements; paths in `slide_order` are
//! resolved relative to the configuration file's directory.
//!
//! Every field except `slide_order` has a sensible default, so a minimal
//! config is just the list of slides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::model::{Element, Presentation, Slide, Theme};

/// The parsed configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    /// Slide-definition files, in presentation order.
    pub slide_order: Vec<String>,
    /// Output path, relative to the working directory.
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            slide_order: Vec::new(),
            output: "presentation.pdf".to_string(),
        }
    }
}

/// Load and validate the configuration file.
///
/// A missing file, malformed YAML, or an empty `slide_order` is a
/// [`DeckError::Config`] — there is nothing sensible to generate from any
/// of those.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .map_err(|e| DeckError::Config(format!("cannot read '{}': {e}", path.display())))?;
    let config: Config = serde_yaml::from_str(&raw)
        .map_err(|e| DeckError::Config(format!("invalid YAML in '{}': {e}", path.display())))?;
    if config.slide_order.is_empty() {
        return Err(DeckError::Config(format!(
            "'{}' lists no slides in slide_order",
            path.display()
        )));
    }
    Ok(config)
}

/// A slide file is either one element or an array of elements.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlideFile {
    Many(Vec<Element>),
    One(Element),
}

/// Load one slide-definition file. The file name becomes the slide's label
/// for error messages.
pub fn load_slide(path: &Path) -> Result<Slide> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|e| DeckError::slide_load(&display, e))?;
    let parsed: SlideFile =
        serde_json::from_str(&raw).map_err(|e| DeckError::slide_load(&display, e))?;
    let elements = match parsed {
        SlideFile::Many(elements) => elements,
        SlideFile::One(element) => vec![element],
    };
    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or(display);
    Ok(Slide::from_elements(elements).with_label(label))
}

/// Load every slide named in `slide_order`, resolved against `base`.
/// A missing slide file aborts the whole run.
pub fn load_presentation(config: &Config, base: &Path) -> Result<Presentation> {
    let mut slides = Vec::with_capacity(config.slide_order.len());
    for name in &config.slide_order {
        slides.push(load_slide(&base.join(name))?);
    }
    Ok(Presentation::new(slides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "config.yaml", "slide_order:\n  - intro.json\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.slide_order, vec!["intro.json"]);
        assert_eq!(config.output, "presentation.pdf");
        assert_eq!(config.theme.font, "Helvetica");
    }

    #[test]
    fn theme_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = concat!(
            "theme:\n",
            "  background_color: \"#222222\"\n",
            "  font_size: 18\n",
            "slide_order: [a.json]\n",
            "output: deck.pdf\n",
        );
        let path = write_file(dir.path(), "config.yaml", yaml);
        let config = load_config(&path).unwrap();
        assert_eq!(config.theme.background_color.to_hex(), "#222222");
        assert_eq!(config.theme.font_size, 18.0);
        // Unspecified theme fields keep their defaults.
        assert_eq!(config.theme.header_font_size, 48.0);
        assert_eq!(config.output, "deck.pdf");
    }

    #[test]
    fn empty_slide_order_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "config.yaml", "slide_order: []\n");
        assert!(matches!(
            load_config(&path).unwrap_err(),
            DeckError::Config(_)
        ));
    }

    #[test]
    fn missing_config_is_a_config_error() {
        assert!(matches!(
            load_config(Path::new("/nope/config.yaml")).unwrap_err(),
            DeckError::Config(_)
        ));
    }

    #[test]
    fn slide_file_accepts_single_element() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "one.json",
            r#"{"type": "Header", "level": 1, "text": "Hi"}"#,
        );
        let slide = load_slide(&path).unwrap();
        assert_eq!(slide.elements.len(), 1);
        assert_eq!(slide.label.as_deref(), Some("one.json"));
    }

    #[test]
    fn slide_file_accepts_element_array() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"type": "Header", "level": 2, "text": "Agenda"},
            {"type": "Body", "spans": [{"text": "first point"}]}
        ]"#;
        let path = write_file(dir.path(), "many.json", json);
        let slide = load_slide(&path).unwrap();
        assert_eq!(slide.elements.len(), 2);
        assert!(matches!(slide.elements[1], Element::Body { .. }));
    }

    #[test]
    fn missing_slide_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            slide_order: vec!["ghost.json".to_string()],
            ..Config::default()
        };
        let err = load_presentation(&config, dir.path()).unwrap_err();
        assert!(matches!(err, DeckError::SlideLoad { .. }));
    }

    #[test]
    fn malformed_slide_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.json", "{not json");
        match load_slide(&path).unwrap_err() {
            DeckError::SlideLoad { path, .. } => assert!(path.ends_with("bad.json")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
