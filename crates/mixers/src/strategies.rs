//! Blend formulas over byte RGB.
//!
//! Every function here is pure. `rate` is the mixer color's share and is
//! expected in [0, 1]; the registry clamps it before calling in.

use palette_tin_core::color::Rgb8;
use palette_tin_core::hsv::{hsv_to_rgb8, rgb8_to_hsv, DeviceHsv};
use palette_tin_core::okhsl::{okhsl_to_srgb, srgb_to_okhsl, Okhsl};

use crate::spectral::SpectralMix;

/// Mixer share used by the hybrid strategies.
pub const HYBRID_RATE: f64 = 0.40;

fn round_byte(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

fn per_channel(a: Rgb8, b: Rgb8, f: impl Fn(u8, u8) -> u8) -> Rgb8 {
    Rgb8::new(f(a.r, b.r), f(a.g, b.g), f(a.b, b.b))
}

/// `round((1 - rate) * base + rate * mixer)` per channel.
pub fn weighted_average(base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
    let wc = 1.0 - rate;
    per_channel(base, mixer, |b, m| {
        round_byte(wc * b as f64 + rate * m as f64)
    })
}

/// Linear interpolation, `round(base * (1 - rate) + mixer * rate)`.
pub fn lerp(base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
    per_channel(base, mixer, |b, m| {
        round_byte(b as f64 * (1.0 - rate) + m as f64 * rate)
    })
}

/// The overlay blend mode for one channel, in integer arithmetic.
fn overlay_channel(c1: u8, c2: u8) -> u8 {
    let (c1, c2) = (c1 as u32, c2 as u32);
    let v = if c1 < 128 {
        2 * c1 * c2 / 255
    } else {
        255 - 2 * (255 - c1) * (255 - c2) / 255
    };
    v as u8
}

/// Overlay blend of `mixer` onto `base`, faded in by `rate`.
pub fn overlay(base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
    per_channel(base, mixer, |c1, c2| {
        let blend = overlay_channel(c1, c2) as f64;
        round_byte(blend * rate + c1 as f64 * (1.0 - rate))
    })
}

/// Spectral result pulled toward the weighted average.
pub fn hybrid(spectral: &dyn SpectralMix, base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
    let pigment = spectral.mix(base, mixer, rate);
    let average = weighted_average(base, mixer, rate);
    weighted_average(pigment, average, HYBRID_RATE)
}

/// Spectral result pulled toward the overlay blend.
pub fn overlay_hybrid(spectral: &dyn SpectralMix, base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
    let pigment = spectral.mix(base, mixer, rate);
    let blended = overlay(base, mixer, rate);
    weighted_average(pigment, blended, HYBRID_RATE)
}

/// Base hue with the mixer's device saturation and value.
///
/// An achromatic base stays achromatic: the result is gray at the mixer's value.
pub fn sat_val(base: Rgb8, mixer: Rgb8) -> Rgb8 {
    let b = rgb8_to_hsv(base);
    let m = rgb8_to_hsv(mixer);
    hsv_to_rgb8(DeviceHsv {
        hue: b.hue,
        saturation: m.saturation,
        value: m.value,
    })
}

fn okhsl_of(c: Rgb8) -> Okhsl {
    srgb_to_okhsl(c.to_srgb())
}

/// Base Okhsl hue with the mixer's Okhsl saturation and lightness.
pub fn sat_val_okhsl(base: Rgb8, mixer: Rgb8) -> Rgb8 {
    let b = okhsl_of(base);
    let m = okhsl_of(mixer);
    okhsl_to_srgb(Okhsl {
        h: b.h,
        s: m.s,
        l: m.l,
    })
    .to_rgb8()
}

/// Base Okhsl hue and saturation with the mixer's Okhsl lightness.
pub fn lightness_okhsl(base: Rgb8, mixer: Rgb8) -> Rgb8 {
    let b = okhsl_of(base);
    let m = okhsl_of(mixer);
    okhsl_to_srgb(Okhsl {
        h: b.h,
        s: b.s,
        l: m.l,
    })
    .to_rgb8()
}
