//! Color value types and the sRGB <-> OKLab conversion chain.
//!
//! Provides `Srgb` (gamma-encoded, [0, 1]), `LinearRgb`, `OkLab`, and the
//! byte-scaled `Rgb8` used at the mixer and palette boundary. All conversions
//! are pure functions over `f64` values.
//!
//! Intermediate results are not clamped; only the byte conversions clamp.

use crate::error::ColorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with gamma-encoded components, nominally in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"` for human-readable formats.
/// The hex round-trip has 8-bit quantization (1/255 precision loss).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual opponent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Byte-scaled sRGB color, each component in [0, 255].
///
/// Serializes as a three-element JSON array `[r, g, b]`, the palette file cell format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `ColorError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb8, ColorError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| ColorError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Rgb8 { r, g, b })
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalizes to [0, 1] sRGB.
    pub fn to_srgb(self) -> Srgb {
        Srgb {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
        }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb8 { r, g, b }
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.channels()
    }
}

/// Rounds a normalized component into a byte, clamping to [0, 255].
///
/// NaN maps to 0.
pub fn unit_to_byte(x: f64) -> u8 {
    if x.is_nan() {
        return 0;
    }
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Srgb {
    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, ColorError> {
        Rgb8::from_hex(hex).map(Rgb8::to_srgb)
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are clamped and quantized to 8-bit with rounding.
    pub fn to_hex(self) -> String {
        self.to_rgb8().to_hex()
    }

    /// Clamps each component into [0, 1] and rounds to bytes.
    pub fn to_rgb8(self) -> Rgb8 {
        Rgb8 {
            r: unit_to_byte(self.r),
            g: unit_to_byte(self.g),
            b: unit_to_byte(self.b),
        }
    }

    /// Returns a copy with every component clamped into [0, 1]. NaN becomes 0.
    pub fn clamped(self) -> Srgb {
        let unit = |x: f64| if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        Srgb {
            r: unit(self.r),
            g: unit(self.g),
            b: unit(self.b),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl LinearRgb {
    pub fn max_channel(self) -> f64 {
        self.r.max(self.g).max(self.b)
    }

    pub fn min_channel(self) -> f64 {
        self.r.min(self.g).min(self.b)
    }

    /// True when every channel lies in the closed interval [0, 1].
    pub fn inside_unit_cube(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl OkLab {
    /// Splits (a, b) into chroma and a unit hue direction.
    ///
    /// Zero chroma yields the direction (0, 0).
    pub fn chroma_direction(self) -> (f64, f64, f64) {
        let c = (self.a * self.a + self.b * self.b).sqrt();
        if c == 0.0 {
            (0.0, 0.0, 0.0)
        } else {
            (c, self.a / c, self.b / c)
        }
    }

    /// Hue as a fraction of a turn in [0, 1].
    pub fn hue_turns(self) -> f64 {
        0.5 + 0.5 * (-self.b).atan2(-self.a) / std::f64::consts::PI
    }
}

/// sRGB encoding of a single linear component (the "transfer function").
pub fn srgb_transfer(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB decoding of a single encoded component.
pub fn srgb_transfer_inv(encoded: f64) -> f64 {
    if encoded > 0.04045 {
        ((encoded + 0.055) / 1.055).powf(2.4)
    } else {
        encoded / 12.92
    }
}

/// Encodes a linear component straight to a byte.
pub fn encode(linear: f64) -> u8 {
    unit_to_byte(srgb_transfer(linear))
}

/// Decodes a byte to a linear component.
pub fn decode(byte: u8) -> f64 {
    srgb_transfer_inv(byte as f64 / 255.0)
}

/// Converts sRGB to linear RGB.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_transfer_inv(c.r),
        g: srgb_transfer_inv(c.g),
        b: srgb_transfer_inv(c.b),
    }
}

/// Converts linear RGB to sRGB.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: srgb_transfer(c.r),
        g: srgb_transfer(c.g),
        b: srgb_transfer(c.b),
    }
}

/// Sign-preserving cube root: `sign(x) * |x|^(1/3)`.
pub fn signed_cbrt(x: f64) -> f64 {
    x.abs().powf(1.0 / 3.0).copysign(x)
}

/// Converts linear RGB to OKLab via the OKLab matrix transform.
pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let l_ = signed_cbrt(l);
    let m_ = signed_cbrt(m);
    let s_ = signed_cbrt(s);

    OkLab {
        l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    }
}

/// Converts OKLab to linear RGB via the inverse OKLab matrix transform.
pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// Convenience: encoded sRGB to OKLab.
pub fn rgb_to_oklab(c: Srgb) -> OkLab {
    linear_to_oklab(srgb_to_linear(c))
}

/// Convenience: OKLab to encoded sRGB. Not clamped.
pub fn oklab_to_rgb(c: OkLab) -> Srgb {
    linear_to_srgb(oklab_to_linear(c))
}
