//! Static width tables for the built-in PDF Type1 fonts.
//!
//! Widths are the standard AFM values in thousandths of an em, covering
//! ASCII 0x20..=0x7E (95 printable characters, index = codepoint - 32).
//! Non-ASCII characters fall back to an average width. The built-in fonts
//! are never embedded, so these tables are the single source of truth for
//! measurement — no font files are read at runtime.

/// Character-width table for one font face.
pub struct FontMetrics {
    /// AFM widths in 1/1000 em for ASCII 0x20..=0x7E.
    widths: [u16; 95],
    /// Fallback width for codepoints outside the table.
    average: u16,
}

impl FontMetrics {
    /// Width of a single character in em units.
    pub fn char_width(&self, c: char) -> f64 {
        let code = c as usize;
        let thousandths = if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average
        };
        thousandths as f64 / 1000.0
    }

    /// Measured width of a string at the given font size, in points.
    pub fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c)).sum::<f64>() * font_size
    }
}

/// A supported font family. The theme names one of these; Courier is always
/// used for code blocks regardless of the theme font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Helvetica,
    Courier,
}

impl FontFamily {
    /// Resolve a theme font name. Unrecognized names are a render-time
    /// error (the built-in font set is closed).
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "Helvetica" => Ok(FontFamily::Helvetica),
            "Courier" => Ok(FontFamily::Courier),
            other => Err(format!(
                "unsupported font '{other}': supported built-in families are Helvetica and Courier"
            )),
        }
    }

    pub fn metrics(self, bold: bool) -> &'static FontMetrics {
        match (self, bold) {
            (FontFamily::Helvetica, false) => &HELVETICA,
            (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
            (FontFamily::Courier, _) => &COURIER,
        }
    }
}

/// Helvetica regular, standard AFM widths.
pub static HELVETICA: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        278,  278,  355,  556,  556,  889,  667,  191,  333,  333,  389,  584,  278,  333,  278,  278,
        // 0-9
        556,  556,  556,  556,  556,  556,  556,  556,  556,  556,
        // :     ;     <     =     >     ?     @
        278,  278,  584,  584,  584,  556, 1015,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        667,  667,  722,  722,  667,  611,  778,  722,  278,  500,  667,  556,  833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        722,  778,  667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,
        // [     \     ]     ^     _     `
        278,  278,  278,  469,  556,  333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        556,  556,  500,  556,  556,  278,  556,  556,  222,  222,  500,  222,  833,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        556,  556,  556,  556,  333,  500,  278,  556,  500,  722,  500,  500,  500,
        // {     |     }     ~
        334,  260,  334,  584,
    ],
    average: 556,
};

/// Helvetica bold, standard AFM widths.
pub static HELVETICA_BOLD: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        278,  333,  474,  556,  556,  889,  722,  238,  333,  333,  389,  584,  278,  333,  278,  278,
        // 0-9
        556,  556,  556,  556,  556,  556,  556,  556,  556,  556,
        // :     ;     <     =     >     ?     @
        333,  333,  584,  584,  584,  611,  975,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        722,  722,  722,  722,  667,  611,  778,  722,  278,  556,  722,  611,  833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        722,  778,  667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,
        // [     \     ]     ^     _     `
        333,  278,  333,  584,  556,  333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        556,  611,  556,  611,  556,  333,  611,  611,  278,  278,  556,  278,  889,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        611,  611,  611,  611,  389,  556,  333,  611,  556,  778,  556,  556,  500,
        // {     |     }     ~
        389,  280,  389,  584,
    ],
    average: 556,
};

/// Courier: fixed-pitch, every glyph is 600/1000 em.
pub static COURIER: FontMetrics = FontMetrics {
    widths: [600; 95],
    average: 600,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_fixed_pitch() {
        assert_eq!(COURIER.measure("iiii", 10.0), COURIER.measure("MMMM", 10.0));
        assert_eq!(COURIER.measure("abcd", 10.0), 4.0 * 6.0);
    }

    #[test]
    fn helvetica_is_proportional() {
        assert!(HELVETICA.measure("iiii", 12.0) < HELVETICA.measure("MMMM", 12.0));
    }

    #[test]
    fn bold_is_at_least_as_wide() {
        let s = "Presentation layout";
        assert!(HELVETICA_BOLD.measure(s, 24.0) >= HELVETICA.measure(s, 24.0));
    }

    #[test]
    fn non_ascii_uses_average_width() {
        assert_eq!(HELVETICA.char_width('é'), 0.556);
    }

    #[test]
    fn family_parse() {
        assert_eq!(FontFamily::parse("Helvetica").unwrap(), FontFamily::Helvetica);
        assert!(FontFamily::parse("Comic Sans").is_err());
    }
}
