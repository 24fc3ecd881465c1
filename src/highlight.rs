//! # Syntax Highlighting
//!
//! Token classification for code blocks, delegated to syntect. Each source
//! line becomes a sequence of colored token runs. With no language (or one
//! syntect doesn't know), the whole block renders as a single uniform run
//! per line in the fallback color — highlighting is best-effort, never a
//! reason to fail a slide.

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::{DeckError, Result};
use crate::model::Color;

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// One colored run within a highlighted line.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRun {
    pub text: String,
    pub color: Color,
}

/// Wraps the loaded syntax/theme sets. Loading the default syntax set is
/// not free, so one instance is built per document and shared across
/// slides.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Classify `source` into per-line colored runs.
    ///
    /// `language` is a syntect token ("python", "rs", "javascript", ...).
    /// `None` or an unrecognized token yields one `fallback`-colored run
    /// per line.
    pub fn highlight(
        &self,
        source: &str,
        language: Option<&str>,
        fallback: Color,
    ) -> Result<Vec<Vec<TokenRun>>> {
        let syntax = language.and_then(|lang| self.syntaxes.find_syntax_by_token(lang));

        let syntax = match syntax {
            Some(s) => s,
            None => {
                return Ok(source
                    .lines()
                    .map(|line| {
                        vec![TokenRun {
                            text: line.to_string(),
                            color: fallback,
                        }]
                    })
                    .collect());
            }
        };

        let theme = &self.themes.themes[HIGHLIGHT_THEME];
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(source) {
            let ranges = highlighter
                .highlight_line(line, &self.syntaxes)
                .map_err(|e| DeckError::render("?", format!("highlighting failed: {e}")))?;

            let runs = ranges
                .into_iter()
                .map(|(style, text)| TokenRun {
                    text: text.trim_end_matches('\n').to_string(),
                    color: Color::rgb(
                        style.foreground.r as f64 / 255.0,
                        style.foreground.g as f64 / 255.0,
                        style.foreground.b as f64 / 255.0,
                    ),
                })
                .filter(|run| !run.text.is_empty())
                .collect();
            lines.push(runs);
        }

        Ok(lines)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
