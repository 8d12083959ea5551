//! sRGB colours for the page background.
//!
//! Colours are stored as gamma-encoded sRGB components in `0.0..=1.0`, the same
//! space CSS uses, so interpolation matches what a browser would show for a
//! colour tween. Conversion to [`wgpu::Color`] linearises the components because
//! the surface format is sRGB.

use std::fmt;

use anyhow::{Context, bail};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or the short `#rgb` form (case-insensitive).
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .with_context(|| format!("colour `{hex}` must start with `#`"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("colour `{hex}` contains non-hex characters");
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).with_context(|| format!("invalid hex digits in `{hex}`"))
        };
        match digits.len() {
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |c: &str| channel(&c.repeat(2));
                Ok(Self::from_rgb8(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                ))
            }
            _ => bail!("colour `{hex}` must have 3 or 6 hex digits"),
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Component-wise interpolation in sRGB space.
    pub fn lerp(self, other: Colour, t: f32) -> Colour {
        Colour {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// CSS `rgb(r, g, b)` string.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("rgb({r}, {g}, {b})")
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: srgb_to_linear(self.r) as f64,
            g: srgb_to_linear(self.g) as f64,
            b: srgb_to_linear(self.b) as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
