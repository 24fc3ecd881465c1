//! # deckgen
//!
//! A declarative slide-deck generator: presentations are data — slides as
//! ordered element lists, styling in a YAML theme — and the output is a
//! fixed-size 16:9 PDF, one page per slide.
//!
//! ## Pipeline
//!
//! 1. **Configuration** ([`config`]) — parse the YAML config (theme,
//!    slide order, output path) and the JSON slide-definition files into
//!    the document model.
//! 2. **Model** ([`model`]) — slides built from content elements (headers,
//!    body spans, code, images) and layout wrappers (center, bottom, grid,
//!    title, background).
//! 3. **Layout** ([`layout`]) — pure measurement: greedy text wrapping
//!    against built-in font metrics ([`text`]), a top-down stacking cursor,
//!    and page-anchored placement for the wrappers.
//! 4. **Rendering** ([`render`]) — draw each slide onto its own PDF page
//!    and save the document once, at the end. Code blocks are colored via
//!    [`highlight`] on the way through.
//!
//! ## Example
//!
//! ```no_run
//! use deckgen::{Element, Presentation, Slide, Theme};
//!
//! let slide = Slide::new()
//!     .push(Element::h1("Hello"))
//!     .push(Element::body("A slide, as plain data."));
//! let deck = Presentation::new(vec![slide]);
//! deckgen::render(&deck, &Theme::default(), std::path::Path::new("hello.pdf"))?;
//! # Ok::<(), deckgen::DeckError>(())
//! ```

pub mod config;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod render;
pub mod text;

use std::path::{Path, PathBuf};

pub use config::{load_config, load_presentation, load_slide, Config};
pub use error::{DeckError, Result};
pub use model::{Color, Element, HeaderLevel, Presentation, Slide, Span, Theme};
pub use render::render;

/// End-to-end generation from a configuration file: load the config, load
/// every slide it names (relative to the config's directory), render, and
/// return the output path. `output_override` takes precedence over the
/// config's `output` field.
pub fn generate(config_path: &Path, output_override: Option<&Path>) -> Result<PathBuf> {
    let config = config::load_config(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    let presentation = config::load_presentation(&config, base)?;
    let output = match output_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.output),
    };
    render::render(&presentation, &config.theme, &output)?;
    Ok(output)
}
