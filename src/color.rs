use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Ansi256(u8),
    Hex { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    #[default]
    TrueColor,
    Color256,
    Color16,
}

#[derive(Debug, Error)]
#[error("invalid color value for field \"{field}\": \"{value}\"")]
pub struct ColorParseError {
    pub field: String,
    pub value: String,
}

impl Color {
    /// Parse a config color: `"#RRGGBB"`, `"#RGB"`, or an ANSI-256 index
    /// `"0"`..`"255"`.
    pub fn parse(s: &str, field: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            field: field.to_owned(),
            value: s.to_owned(),
        };
        match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex).ok_or_else(err),
            None => s.parse::<u8>().map(Color::Ansi256).map_err(|_| err()),
        }
    }

    /// Parse a GitHub label color (hex without `#`). Returns `None` for
    /// empty or malformed values.
    pub fn from_label_hex(hex: &str) -> Option<Self> {
        parse_hex(hex)
    }

    /// Convert to a `crossterm::style::Color` at the given terminal depth.
    pub fn to_crossterm_color(self, depth: ColorDepth) -> crossterm::style::Color {
        use crossterm::style::Color as Ct;
        match (self, depth) {
            (Color::Hex { r, g, b }, ColorDepth::TrueColor) => Ct::Rgb { r, g, b },
            (Color::Hex { r, g, b }, ColorDepth::Color256) => Ct::AnsiValue(nearest_cube(r, g, b)),
            (Color::Hex { r, g, b }, ColorDepth::Color16) => named(nearest_16(r, g, b)),
            (Color::Ansi256(n), ColorDepth::Color16) if n >= 16 => {
                let (r, g, b) = ansi256_to_rgb(n);
                named(nearest_16(r, g, b))
            }
            (Color::Ansi256(n), _) => named(n),
        }
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting_text(self) -> crossterm::style::Color {
        let (r, g, b) = match self {
            Color::Hex { r, g, b } => (r, g, b),
            Color::Ansi256(n) => ansi256_to_rgb(n),
        };
        let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        if luma > 140.0 {
            crossterm::style::Color::Black
        } else {
            crossterm::style::Color::White
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => Some(Color::Hex {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        3 => Some(Color::Hex {
            r: channel(&hex[0..1])? * 17,
            g: channel(&hex[1..2])? * 17,
            b: channel(&hex[2..3])? * 17,
        }),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi256(n) => write!(f, "{n}"),
            Color::Hex { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s, "theme")
    }
}

impl ColorDepth {
    /// Detect terminal color depth from `COLORTERM` and `TERM`.
    pub fn detect() -> Self {
        if let Ok(ct) = std::env::var("COLORTERM")
            && (ct == "truecolor" || ct == "24bit")
        {
            return ColorDepth::TrueColor;
        }
        if let Ok(term) = std::env::var("TERM")
            && term.contains("256color")
        {
            return ColorDepth::Color256;
        }
        ColorDepth::Color16
    }
}

// ---------------------------------------------------------------------------
// Palette approximation
// ---------------------------------------------------------------------------

/// RGB values of the 16 base colors, as xterm renders them.
const BASE16: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Indices 0-15 map to crossterm's named colors so the terminal's own
/// palette applies.
fn named(n: u8) -> crossterm::style::Color {
    use crossterm::style::Color as Ct;
    match n {
        0 => Ct::Black,
        1 => Ct::DarkRed,
        2 => Ct::DarkGreen,
        3 => Ct::DarkYellow,
        4 => Ct::DarkBlue,
        5 => Ct::DarkMagenta,
        6 => Ct::DarkCyan,
        7 => Ct::Grey,
        8 => Ct::DarkGrey,
        9 => Ct::Red,
        10 => Ct::Green,
        11 => Ct::Yellow,
        12 => Ct::Blue,
        13 => Ct::Magenta,
        14 => Ct::Cyan,
        15 => Ct::White,
        _ => Ct::AnsiValue(n),
    }
}

fn ansi256_to_rgb(n: u8) -> (u8, u8, u8) {
    match n {
        0..=15 => BASE16[usize::from(n)],
        16..=231 => {
            let i = n - 16;
            (
                CUBE_STEPS[usize::from(i / 36)],
                CUBE_STEPS[usize::from((i / 6) % 6)],
                CUBE_STEPS[usize::from(i % 6)],
            )
        }
        _ => {
            let level = 8 + (n - 232) * 10;
            (level, level, level)
        }
    }
}

fn distance((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> u32 {
    let d = |a: u8, b: u8| u32::from(a.abs_diff(b)).pow(2);
    d(r1, r2) + d(g1, g2) + d(b1, b2)
}

fn nearest_cube(r: u8, g: u8, b: u8) -> u8 {
    let step = |v: u8| {
        (0u8..6)
            .min_by_key(|&i| CUBE_STEPS[usize::from(i)].abs_diff(v))
            .unwrap_or(0)
    };
    16 + 36 * step(r) + 6 * step(g) + step(b)
}

fn nearest_16(r: u8, g: u8, b: u8) -> u8 {
    (0u8..16)
        .min_by_key(|&i| distance(BASE16[usize::from(i)], (r, g, b)))
        .unwrap_or(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color as Ct;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            Color::parse("#3fb950", "open").unwrap(),
            Color::Hex {
                r: 0x3f,
                g: 0xb9,
                b: 0x50
            }
        );
        assert_eq!(
            Color::parse("#fff", "open").unwrap(),
            Color::Hex {
                r: 255,
                g: 255,
                b: 255
            }
        );
    }

    #[test]
    fn parses_ansi_index() {
        assert_eq!(Color::parse("245", "faint").unwrap(), Color::Ansi256(245));
        assert_eq!(Color::parse("007", "faint").unwrap(), Color::Ansi256(7));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["256", "#12", "#gggggg", "green", ""] {
            let err = Color::parse(bad, "accent").unwrap_err();
            assert_eq!(err.field, "accent");
        }
    }

    #[test]
    fn label_hex_has_no_prefix() {
        assert!(Color::from_label_hex("d73a4a").is_some());
        assert!(Color::from_label_hex("").is_none());
        assert!(Color::from_label_hex("#d73a4a").is_none());
    }

    #[test]
    fn display_round_trips() {
        let c = Color::parse("#0a0b0c", "x").unwrap();
        assert_eq!(c.to_string(), "#0a0b0c");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }

    #[test]
    fn depth_conversions() {
        let green = Color::Hex { r: 0, g: 255, b: 0 };
        assert_eq!(
            green.to_crossterm_color(ColorDepth::TrueColor),
            Ct::Rgb { r: 0, g: 255, b: 0 }
        );
        assert_eq!(
            green.to_crossterm_color(ColorDepth::Color256),
            Ct::AnsiValue(46)
        );
        assert_eq!(green.to_crossterm_color(ColorDepth::Color16), Ct::Green);
        assert_eq!(
            Color::Ansi256(1).to_crossterm_color(ColorDepth::Color256),
            Ct::DarkRed
        );
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(
            Color::from_label_hex("ffffff").unwrap().contrasting_text(),
            Ct::Black
        );
        assert_eq!(
            Color::from_label_hex("000000").unwrap().contrasting_text(),
            Ct::White
        );
    }
}
