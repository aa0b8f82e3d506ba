use crate::foundation::error::{QuoteError, QuoteResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight-alpha color: 8-bit channels plus a fractional alpha, as CSS `rgba()` expresses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Alpha quantized to 8 bits.
    pub fn alpha_u8(self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Straight-alpha RGBA8 bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha_u8()]
    }

    pub fn is_transparent(self) -> bool {
        self.alpha_u8() == 0
    }

    pub(crate) fn to_paint(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.alpha_u8())
    }
}

/// Formats as CSS, e.g. `rgba(255, 0, 0, 0.5)`.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "one")]
                a: f64,
            },
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Css(s) => parse_color(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Rgba {
                r,
                g,
                b,
                a: a.clamp(0.0, 1.0),
            }),
        }
    }
}

/// Convert a hex color plus an opacity percentage into an overlay color.
///
/// `opacity_percent` is clamped to `0..=100`; `#ff0000` at 50 gives `rgba(255, 0, 0, 0.5)`.
pub fn hex_to_rgba(hex: &str, opacity_percent: f64) -> QuoteResult<Rgba> {
    if !opacity_percent.is_finite() {
        return Err(QuoteError::validation("opacity must be a finite number"));
    }
    let [r, g, b] = parse_hex_rgb(hex)?;
    Ok(Rgba {
        r,
        g,
        b,
        a: opacity_percent.clamp(0.0, 100.0) / 100.0,
    })
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(s: &str) -> QuoteResult<Rgba> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_css_fn(body);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() == 8 && hex.is_ascii() {
        let [r, g, b] = parse_hex_rgb(&hex[..6])?;
        let a = hex_byte(&hex[6..8])?;
        return Ok(Rgba {
            r,
            g,
            b,
            a: f64::from(a) / 255.0,
        });
    }
    let [r, g, b] = parse_hex_rgb(hex)?;
    Ok(Rgba::opaque(r, g, b))
}

fn hex_byte(pair: &str) -> QuoteResult<u8> {
    u8::from_str_radix(pair, 16)
        .map_err(|_| QuoteError::validation(format!("invalid hex byte \"{pair}\"")))
}

fn parse_hex_rgb(s: &str) -> QuoteResult<[u8; 3]> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(QuoteError::validation(format!("invalid hex color \"{s}\"")));
    }
    match s.len() {
        3 => {
            let mut out = [0u8; 3];
            for (o, i) in out.iter_mut().zip(0..3) {
                let v = hex_byte(&s[i..i + 1])?;
                *o = v * 17;
            }
            Ok(out)
        }
        6 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ]),
        _ => Err(QuoteError::validation(
            "hex color must be #RGB or #RRGGBB (case-insensitive)",
        )),
    }
}

fn parse_css_fn(body: &str) -> QuoteResult<Rgba> {
    let body = body
        .strip_suffix(')')
        .ok_or_else(|| QuoteError::validation("css color function is missing ')'"))?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(QuoteError::validation(
            "css color function needs 3 or 4 components",
        ));
    }

    let channel = |p: &str| -> QuoteResult<u8> {
        p.parse::<u8>()
            .map_err(|_| QuoteError::validation(format!("invalid color channel \"{p}\"")))
    };
    let a = match parts.get(3) {
        Some(p) => p
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| QuoteError::validation(format!("invalid alpha \"{p}\"")))?
            .clamp(0.0, 1.0),
        None => 1.0,
    };
    Ok(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
