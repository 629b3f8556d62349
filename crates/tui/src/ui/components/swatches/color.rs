//! Turning palette strings into terminal colors.

use std::str::FromStr;

use ratatui::style::Color;

/// Parse a color string from the extraction service.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (alpha ignored),
/// `rgb(r, g, b)` / `rgba(r, g, b, a)` and whatever ratatui itself parses
/// (named and indexed colors). Returns `None` for anything else.
pub fn parse_swatch_color(raw: &str) -> Option<Color> {
    let value = raw.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }

    Color::from_str(value).ok()
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 | 4 => Some(Color::Rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 | 8 => Some(Color::Rgb(byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let mut channels = args
        .split([',', ' ', '/'])
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f32>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8));
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some(Color::Rgb(r, g, b))
}

/// WCAG 2.0 relative luminance of an sRGB color.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f32 {
    fn linearize(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// Black or white, whichever reads better on `background`.
pub fn readable_foreground(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) if relative_luminance(r, g, b) > 0.4 => Color::Black,
        Color::Rgb(..) => Color::White,
        Color::White
        | Color::Gray
        | Color::Yellow
        | Color::Cyan
        | Color::Green
        | Color::LightRed
        | Color::LightGreen
        | Color::LightYellow
        | Color::LightBlue
        | Color::LightMagenta
        | Color::LightCyan => Color::Black,
        _ => Color::White,
    }
}
