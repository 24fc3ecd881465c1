//! # Text Measurement & Wrapping
//!
//! Greedy word-wrap against measured character widths. Every text-bearing
//! element goes through here: headers and bold runs as a single styled
//! span, body text as a span sequence whose boundaries must survive line
//! breaks, and code blocks line-by-line with indentation preserved.
//!
//! Wrapping is a pure function of its inputs — no drawing state, no
//! mutation — so the same element measures identically everywhere it is
//! asked about.

pub mod metrics;

use crate::model::{Color, Span};
use metrics::{FontFamily, COURIER};

/// A styled piece of one wrapped line. A span split across two lines
/// becomes one fragment per line; adjacent same-style pieces on a line are
/// merged back together.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub color: Option<Color>,
    pub bold: bool,
}

/// One wrapped line with its measured width in points.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f64,
}

impl Line {
    /// The line's text with styling flattened out.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Width of the widest line, or 0 for no lines.
pub fn max_line_width(lines: &[Line]) -> f64 {
    lines.iter().map(|l| l.width).fold(0.0, f64::max)
}

/// Wrap a single uniformly-styled string. Used by headers and bold runs.
pub fn wrap_text(
    text: &str,
    family: FontFamily,
    bold: bool,
    font_size: f64,
    max_width: f64,
) -> Vec<Line> {
    let span = Span {
        text: text.to_string(),
        color: None,
        bold,
    };
    wrap_spans(std::slice::from_ref(&span), family, font_size, max_width)
}

/// A word candidate: one or more fragments with no internal spaces.
/// Fragments pile up when a span boundary falls mid-word.
#[derive(Debug, Default)]
struct Word {
    fragments: Vec<Fragment>,
    width: f64,
}

/// Greedy word-wrap over a span sequence.
///
/// Words accumulate onto the current line while line + space + word stays
/// within `max_width`; otherwise a new line starts. A single word wider
/// than `max_width` is placed alone on its own line, never truncated. The
/// space between two words inherits the style of the fragment before it.
pub fn wrap_spans(
    spans: &[Span],
    family: FontFamily,
    font_size: f64,
    max_width: f64,
) -> Vec<Line> {
    let words = split_words(spans, family, font_size);

    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line::default();
    let mut line_open = false;

    for word in words {
        if !line_open {
            for frag in word.fragments {
                push_fragment(&mut current, frag);
            }
            current.width += word.width;
            line_open = true;
            continue;
        }

        let space_style = current
            .fragments
            .last()
            .map(|f| (f.color, f.bold))
            .unwrap_or((None, false));
        let space_width = family.metrics(space_style.1).char_width(' ') * font_size;

        if current.width + space_width + word.width <= max_width {
            push_fragment(
                &mut current,
                Fragment {
                    text: " ".to_string(),
                    color: space_style.0,
                    bold: space_style.1,
                },
            );
            current.width += space_width;
            for frag in word.fragments {
                push_fragment(&mut current, frag);
            }
            current.width += word.width;
        } else {
            lines.push(std::mem::take(&mut current));
            for frag in word.fragments {
                push_fragment(&mut current, frag);
            }
            current.width = word.width;
        }
    }

    if line_open {
        lines.push(current);
    }
    lines
}

/// Split spans into word candidates. A space always separates words; a
/// span boundary with no space on either side glues the adjacent pieces
/// into one word, preserving the style break inside it.
fn split_words(spans: &[Span], family: FontFamily, font_size: f64) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut glue_next = false;

    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        let m = family.metrics(span.bold);
        for (i, piece) in span.text.split(' ').enumerate() {
            let glue = i == 0 && glue_next && !words.is_empty();
            if !glue {
                words.push(Word::default());
            }
            if piece.is_empty() {
                continue;
            }
            if let Some(word) = words.last_mut() {
                word.fragments.push(Fragment {
                    text: piece.to_string(),
                    color: span.color,
                    bold: span.bold,
                });
                word.width += m.measure(piece, font_size);
            }
        }
        glue_next = !span.text.ends_with(' ');
    }

    words
}

fn push_fragment(line: &mut Line, frag: Fragment) {
    if let Some(last) = line.fragments.last_mut() {
        if last.color == frag.color && last.bold == frag.bold {
            last.text.push_str(&frag.text);
            return;
        }
    }
    line.fragments.push(frag);
}

// ─── Code blocks ────────────────────────────────────────────────

/// Break points preferred when a code line must wrap.
const CODE_BREAK_CHARS: &[char] = &[' ', '\t', ',', ';', '(', ')', '[', ']', '{', '}'];
/// How far to look back for a preferred break point.
const CODE_BREAK_LOOKBACK: usize = 20;

/// Lay out a code block: trims blank edge lines, keeps every source line
/// intact when it fits, and wraps over-long lines at sensible boundaries
/// with the original indentation plus four spaces of continuation.
pub fn layout_code(source: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines: Vec<&str> = source.lines().collect();
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .flat_map(|line| wrap_code_line(line, font_size, max_width))
        .collect()
}

/// Wrap one code line, preserving its leading whitespace on every
/// continuation line. Never drops characters.
pub fn wrap_code_line(line: &str, font_size: f64, max_width: f64) -> Vec<String> {
    if COURIER.measure(line, font_size) <= max_width || line.trim().is_empty() {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
    let mut wrapped = Vec::new();
    let mut remaining: Vec<char> = line.chars().skip(indent.chars().count()).collect();

    loop {
        let prefix = if wrapped.is_empty() {
            indent.clone()
        } else {
            format!("{indent}    ")
        };
        let prefix_width = COURIER.measure(&prefix, font_size);

        // How many chars fit after the prefix.
        let mut fit = 0;
        let mut width = prefix_width;
        for c in &remaining {
            let w = COURIER.char_width(*c) * font_size;
            if width + w > max_width {
                break;
            }
            width += w;
            fit += 1;
        }

        if fit >= remaining.len() {
            wrapped.push(format!("{prefix}{}", remaining.iter().collect::<String>()));
            break;
        }

        // Prefer breaking at the last separator within the lookback window;
        // if none, break hard at the fit limit (but always make progress).
        let mut break_at = fit.max(1);
        let window_start = fit.saturating_sub(CODE_BREAK_LOOKBACK);
        for j in (window_start..fit).rev() {
            if CODE_BREAK_CHARS.contains(&remaining[j]) {
                break_at = j + 1;
                break;
            }
        }

        let head: String = remaining[..break_at].iter().collect();
        wrapped.push(format!("{prefix}{}", head.trim_end()));

        remaining = remaining[break_at..].to_vec();
        while remaining.first() == Some(&' ') {
            remaining.remove(0);
        }
        if remaining.is_empty() {
            break;
        }
    }

    wrapped
}
