//! Okhsl and Okhsv: perceptual hue/saturation/lightness and
//! hue/saturation/value cylinders built on OKLab.
//!
//! Hue is a fraction of a turn in [0, 1). Saturation is remapped so that
//! `s = 1` always lands on the sRGB gamut boundary, and lightness goes through
//! a toe curve so that `l = 0.5` reads as a perceptual mid gray.
//!
//! These are not interchangeable with the naive sRGB HSL/HSV formulas.

use crate::color::{
    linear_to_srgb, oklab_to_linear, rgb_to_oklab, signed_cbrt, OkLab, Srgb,
};
use crate::gamut::{find_cusp, find_gamut_intersection, Cusp, ACHROMATIC_EPS};

const TOE_K1: f64 = 0.206;
const TOE_K2: f64 = 0.03;
const TOE_K3: f64 = (1.0 + TOE_K1) / (1.0 + TOE_K2);

/// Saturation at which the Okhsl chroma mapping switches segments.
const MID: f64 = 0.8;
const MID_INV: f64 = 1.25;

/// Largest saturation the inverse conversions accept.
///
/// The cusp and boundary are polynomial fits, so some in-gamut colors sit
/// slightly past them and convert to `s` a little above 1 (up to about 1.012
/// for dark saturated blues in Okhsv). Accepting that headroom keeps those
/// colors round-tripping.
pub const MAX_SATURATION: f64 = 1.02;

/// Okhsl lightness below which the result is black. The chroma anchors
/// underflow long before this matters for any displayable color.
const MIN_LIGHTNESS: f64 = 1e-10;

/// Okhsl color: hue in turns, saturation and lightness in [0, 1].
///
/// Saturation may exceed 1 by a hair, see [`MAX_SATURATION`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Okhsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Okhsv color: hue in turns, saturation and value in [0, 1].
///
/// Saturation may exceed 1 by a hair, see [`MAX_SATURATION`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Okhsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Slopes of the gamut triangle edges: `S = C / L` toward black and
/// `T = C / (1 - L)` toward white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct St {
    pub s: f64,
    pub t: f64,
}

/// Chroma anchors along one lightness: `c0` (low-saturation reference),
/// `c_mid` (smooth approximation of the boundary) and `c_max` (the boundary).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamutTriad {
    pub c0: f64,
    pub c_mid: f64,
    pub c_max: f64,
}

/// Maps OKLab lightness to the perceptual lightness scale.
pub fn toe(x: f64) -> f64 {
    let y = TOE_K3 * x - TOE_K1;
    0.5 * (y + (y * y + 4.0 * TOE_K2 * TOE_K3 * x).sqrt())
}

/// Inverse of [`toe`].
pub fn toe_inv(x: f64) -> f64 {
    (x * x + TOE_K1 * x) / (TOE_K3 * (x + TOE_K2))
}

pub fn to_st(cusp: Cusp) -> St {
    St {
        s: cusp.c / cusp.l,
        t: cusp.c / (1.0 - cusp.l),
    }
}

/// Smooth rational fit of the `S`/`T` slopes, used for `c_mid`.
pub fn st_mid(a_: f64, b_: f64) -> St {
    let s = 0.11516993
        + 1.0
            / (7.44778970
                + 4.15901240 * b_
                + a_ * (-2.19557347
                    + 1.75198401 * b_
                    + a_ * (-2.13704948 - 10.02301043 * b_
                        + a_ * (-4.24894561 + 5.38770819 * b_ + 4.69891013 * a_))));
    let t = 0.11239642
        + 1.0
            / (1.61320320 - 0.68124379 * b_
                + a_ * (0.40370612
                    + 0.90148123 * b_
                    + a_ * (-0.27087943
                        + 0.61223990 * b_
                        + a_ * (0.00299215 - 0.45399568 * b_ - 0.14661872 * a_))));
    St { s, t }
}

/// Computes the chroma anchors for lightness `l` along hue `(a_, b_)`.
pub fn gamut_triad(l: f64, a_: f64, b_: f64) -> GamutTriad {
    let cusp = find_cusp(a_, b_);
    let c_max = find_gamut_intersection(a_, b_, l, 1.0, l, Some(cusp));
    let st_max = to_st(cusp);

    // Scale factor that makes the smooth approximation touch the real boundary.
    let k = c_max / (l * st_max.s).min((1.0 - l) * st_max.t);

    let st_mid = st_mid(a_, b_);
    let c_a = l * st_mid.s;
    let c_b = (1.0 - l) * st_mid.t;
    let c_mid = 0.9 * k * (1.0 / (1.0 / c_a.powi(4) + 1.0 / c_b.powi(4))).sqrt().sqrt();

    let c_a0 = l * 0.4;
    let c_b0 = (1.0 - l) * 0.8;
    let c0 = (1.0 / (1.0 / (c_a0 * c_a0) + 1.0 / (c_b0 * c_b0))).sqrt();

    GamutTriad { c0, c_mid, c_max }
}

fn encode_clamped(lab: OkLab) -> Srgb {
    linear_to_srgb(oklab_to_linear(lab)).clamped()
}

/// Non-finite hues point along `h = 0`.
fn hue_direction(h: f64) -> (f64, f64) {
    let h = if h.is_finite() { h } else { 0.0 };
    let angle = 2.0 * std::f64::consts::PI * h;
    (angle.cos(), angle.sin())
}

/// Clamps into `[0, max]`, sending NaN to 0.
fn clamp_or_zero(x: f64, max: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, max)
    }
}

/// Converts Okhsl to sRGB. Inputs are clamped to their domains (NaN reads
/// as 0) and the result is clamped into [0, 1].
pub fn okhsl_to_srgb(hsl: Okhsl) -> Srgb {
    let s = clamp_or_zero(hsl.s, MAX_SATURATION);
    let l = clamp_or_zero(hsl.l, 1.0);
    if l >= 1.0 {
        return Srgb {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        };
    }
    if l < MIN_LIGHTNESS {
        return Srgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        };
    }

    let (a_, b_) = hue_direction(hsl.h);
    let lightness = toe_inv(l);
    let GamutTriad { c0, c_mid, c_max } = gamut_triad(lightness, a_, b_);

    let c = if s < MID {
        let t = MID_INV * s;
        let k1 = MID * c0;
        let k2 = 1.0 - k1 / c_mid;
        t * k1 / (1.0 - k2 * t)
    } else {
        let t = (s - MID) / (1.0 - MID);
        let k0 = c_mid;
        let k1 = (1.0 - MID) * c_mid * c_mid * MID_INV * MID_INV / c0;
        let k2 = 1.0 - k1 / (c_max - c_mid);
        k0 + t * k1 / (1.0 - k2 * t)
    };

    encode_clamped(OkLab {
        l: lightness,
        a: c * a_,
        b: c * b_,
    })
}

/// Converts sRGB to Okhsl.
///
/// `s` is not clamped at 1, see [`MAX_SATURATION`]. Black, white, and colors with chroma below the achromatic threshold get
/// `s = 0`; their hue is whatever direction the residual chroma points.
pub fn srgb_to_okhsl(rgb: Srgb) -> Okhsl {
    let lab = rgb_to_oklab(rgb);
    let h = lab.hue_turns();
    let (c, a_, b_) = lab.chroma_direction();

    if lab.l <= 0.0 {
        return Okhsl { h, s: 0.0, l: 0.0 };
    }
    if lab.l >= 1.0 {
        return Okhsl { h, s: 0.0, l: 1.0 };
    }
    if c < ACHROMATIC_EPS {
        return Okhsl {
            h,
            s: 0.0,
            l: toe(lab.l),
        };
    }

    let GamutTriad { c0, c_mid, c_max } = gamut_triad(lab.l, a_, b_);

    let s = if c < c_mid {
        let k1 = MID * c0;
        let k2 = 1.0 - k1 / c_mid;
        let denom = k1 + k2 * c;
        let t = if denom != 0.0 { c / denom } else { 0.0 };
        t * MID
    } else {
        let k0 = c_mid;
        let k1 = (1.0 - MID) * c_mid * c_mid * MID_INV * MID_INV / c0;
        let range = c_max - c_mid;
        let k2 = if range != 0.0 { 1.0 - k1 / range } else { 0.0 };
        let denom = k1 + k2 * (c - k0);
        let t = if denom != 0.0 { (c - k0) / denom } else { 0.0 };
        MID + (1.0 - MID) * t
    };

    Okhsl {
        h,
        s,
        l: toe(lab.l),
    }
}

/// Converts Okhsv to sRGB. Inputs are clamped to their domains (NaN reads
/// as 0) and the result is clamped into [0, 1].
pub fn okhsv_to_srgb(hsv: Okhsv) -> Srgb {
    let s = clamp_or_zero(hsv.s, MAX_SATURATION);
    let v = clamp_or_zero(hsv.v, 1.0);
    let (a_, b_) = hue_direction(hsv.h);

    let St { s: s_max, t: t_max } = to_st(find_cusp(a_, b_));
    let s0 = 0.5;
    let k = 1.0 - s0 / s_max;

    // Point on the triangle edge for this saturation, at v = 1.
    let l_v = 1.0 - s * s0 / (s0 + t_max - t_max * k * s);
    let c_v = s * t_max * s0 / (s0 + t_max - t_max * k * s);

    let mut l = v * l_v;
    let mut c = v * c_v;

    let l_vt = toe_inv(l_v);
    let c_vt = if l_v != 0.0 { c_v * l_vt / l_v } else { 0.0 };

    let l_new = toe_inv(l);
    c = if l != 0.0 { c * l_new / l } else { 0.0 };
    l = l_new;

    let scale_l = rgb_scale(l_vt, c_vt, a_, b_);
    l *= scale_l;
    c *= scale_l;

    encode_clamped(OkLab {
        l,
        a: c * a_,
        b: c * b_,
    })
}

/// Reciprocal cube root of the largest channel at the reference point, the
/// factor that makes `v = 1` reach the gamut boundary exactly.
fn rgb_scale(l_vt: f64, c_vt: f64, a_: f64, b_: f64) -> f64 {
    let rgb = oklab_to_linear(OkLab {
        l: l_vt,
        a: a_ * c_vt,
        b: b_ * c_vt,
    });
    signed_cbrt(1.0 / rgb.r.max(rgb.g).max(rgb.b.max(0.0)))
}

/// Converts sRGB to Okhsv.
///
/// `v` is clamped into [0, 1]; `s` is not clamped at 1, see
/// [`MAX_SATURATION`]. Black has `v = 0`; near-achromatic colors get `s = 0` and `v = toe(L)`.
pub fn srgb_to_okhsv(rgb: Srgb) -> Okhsv {
    let lab = rgb_to_oklab(rgb);
    let h = lab.hue_turns();
    let (c, a_, b_) = lab.chroma_direction();

    if lab.l <= 0.0 {
        return Okhsv { h, s: 0.0, v: 0.0 };
    }
    if c < ACHROMATIC_EPS {
        return Okhsv {
            h,
            s: 0.0,
            v: toe(lab.l.min(1.0)),
        };
    }

    let St { s: s_max, t: t_max } = to_st(find_cusp(a_, b_));
    let s0 = 0.5;
    let k = 1.0 - s0 / s_max;

    // Project onto the v = 1 edge through black.
    let denom = c + lab.l * t_max;
    let t = if denom != 0.0 { t_max / denom } else { 0.0 };
    let l_v = t * lab.l;
    let c_v = t * c;

    let l_vt = toe_inv(l_v);
    let c_vt = if l_v != 0.0 { c_v * l_vt / l_v } else { 0.0 };

    let scale_l = rgb_scale(l_vt, c_vt, a_, b_);
    let l = lab.l / scale_l;
    let l_toe = toe(l);

    let v = if l_v != 0.0 { l_toe / l_v } else { 0.0 };
    let v = clamp_or_zero(v, 1.0);
    let s_denom = t_max * s0 + t_max * k * c_v;
    let s = if s_denom != 0.0 {
        (s0 + t_max) * c_v / s_denom
    } else {
        0.0
    };

    Okhsv { h, s, v }
}
