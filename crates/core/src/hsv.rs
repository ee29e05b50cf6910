//! Device HSV: the plain hexcone model over sRGB bytes, in the integer
//! convention paint hosts use for their color pickers.
//!
//! Hue is whole degrees in [0, 359] or `None` for achromatic colors;
//! saturation and value are bytes. Internally values are carried at 16-bit
//! precision (hue in hundredths of a degree) so a byte round trip is exact.

use crate::color::Rgb8;

const U16_MAX: f64 = u16::MAX as f64;

/// Device HSV color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceHsv {
    /// Hue in degrees, `None` when the color has no hue.
    pub hue: Option<u16>,
    pub saturation: u8,
    pub value: u8,
}

/// 16-bit working representation; `hue` is in hundredths of a degree.
#[derive(Debug, Clone, Copy)]
struct Hsv16 {
    hue: Option<u16>,
    saturation: u16,
    value: u16,
}

fn widen(c: u8) -> u16 {
    c as u16 * 257
}

fn round_u16(x: f64) -> u16 {
    (x * U16_MAX).round().clamp(0.0, U16_MAX) as u16
}

fn rgb_to_hsv16(c: Rgb8) -> Hsv16 {
    let r = widen(c.r) as f64 / U16_MAX;
    let g = widen(c.g) as f64 / U16_MAX;
    let b = widen(c.b) as f64 / U16_MAX;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let value = round_u16(max);

    if delta <= 1e-12 {
        return Hsv16 {
            hue: None,
            saturation: 0,
            value,
        };
    }

    let saturation = round_u16(delta / max);
    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let mut degrees = sector * 60.0;
    if degrees < 0.0 {
        degrees += 360.0;
    }
    Hsv16 {
        hue: Some((degrees * 100.0).round() as u16),
        saturation,
        value,
    }
}

fn hsv16_to_rgb(hsv: Hsv16) -> Rgb8 {
    let narrow = |x: f64| (round_u16(x) >> 8) as u8;
    let hue = match hsv.hue {
        Some(hue) if hsv.saturation != 0 => hue,
        _ => {
            let gray = (hsv.value >> 8) as u8;
            return Rgb8::new(gray, gray, gray);
        }
    };

    let h = if hue >= 36000 {
        0.0
    } else {
        hue as f64 / 6000.0
    };
    let s = hsv.saturation as f64 / U16_MAX;
    let v = hsv.value as f64 / U16_MAX;
    let i = h as u32;
    let f = h - i as f64;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb8::new(narrow(r), narrow(g), narrow(b))
}

/// Converts a byte color to device HSV.
pub fn rgb8_to_hsv(c: Rgb8) -> DeviceHsv {
    let hsv = rgb_to_hsv16(c);
    DeviceHsv {
        hue: hsv.hue.map(|h| (h / 100) % 360),
        saturation: (hsv.saturation >> 8) as u8,
        value: (hsv.value >> 8) as u8,
    }
}

/// Converts device HSV back to bytes. Hues of 360 and above wrap.
pub fn hsv_to_rgb8(hsv: DeviceHsv) -> Rgb8 {
    hsv16_to_rgb(Hsv16 {
        hue: hsv.hue.map(|h| (h % 360) * 100),
        saturation: widen(hsv.saturation),
        value: widen(hsv.value),
    })
}
