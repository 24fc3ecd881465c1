//! Structured error types for the rendering pipeline.
//!
//! Five variants cover the real failure sources: configuration,
//! slide-definition loading, asset access, rendering, and writing the
//! output file. Configuration and slide-load failures are raised before
//! any PDF bytes exist; render failures name the slide that caused them.

use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Missing or malformed configuration, or an empty `slide_order`.
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced slide-definition file is missing or malformed.
    #[error("failed to load slide '{path}': {reason}")]
    SlideLoad { path: String, reason: String },

    /// An image file is missing, unreadable, or corrupt.
    #[error("asset error for '{path}': {reason}")]
    Asset { path: String, reason: String },

    /// Element measurement or drawing failed on a specific slide.
    #[error("render error on slide {slide}: {reason}")]
    Render { slide: String, reason: String },

    /// The output document could not be written.
    #[error("failed to write output '{path}': {reason}")]
    Output { path: String, reason: String },
}

impl DeckError {
    pub fn slide_load(path: impl Into<String>, reason: impl ToString) -> Self {
        DeckError::SlideLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn asset(path: impl Into<String>, reason: impl ToString) -> Self {
        DeckError::Asset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(slide: impl Into<String>, reason: impl ToString) -> Self {
        DeckError::Render {
            slide: slide.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output(path: impl Into<String>, reason: impl ToString) -> Self {
        DeckError::Output {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Attach slide context to an error raised while rendering one element.
    /// Asset errors keep their own path context; everything else becomes a
    /// render error naming the slide.
    pub fn on_slide(self, slide: &str) -> Self {
        match self {
            DeckError::Asset { path, reason } => DeckError::Asset {
                path,
                reason: format!("{reason} (slide {slide})"),
            },
            DeckError::Render { reason, .. } => DeckError::Render {
                slide: slide.to_string(),
                reason,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
