//! sRGB gamut geometry in OKLab: cusp search, ray/gamut intersection, and
//! the five clipping policies.
//!
//! Every query works in the lightness/chroma half-plane of a single hue,
//! given as a unit vector `(a_, b_)`. The gamut boundary in that plane is a
//! curved triangle with corners at black, white, and the cusp; the routines
//! here approximate it with the two straight edges through the cusp and then
//! correct the upper edge with one Halley step against the exact cubic.

use crate::color::{linear_to_oklab, oklab_to_linear, signed_cbrt, LinearRgb, OkLab};
use crate::error::ColorError;

/// Chroma below this is treated as achromatic; the hue direction is undefined.
pub(crate) const ACHROMATIC_EPS: f64 = 1e-5;

/// Default `alpha` for the adaptive clipping policies.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Rows of the LMS (cubed) to linear sRGB matrix.
const LMS_TO_RGB: [[f64; 3]; 3] = [
    [4.0767416621, -3.3077115913, 0.2309699292],
    [-1.2684380046, 2.6097574011, -0.3413193965],
    [-0.0041960863, -0.7034186147, 1.7076147010],
];

/// Lightness/chroma of the most saturated in-gamut color for one hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cusp {
    pub l: f64,
    pub c: f64,
}

/// The RGB channel that reaches zero first as saturation grows along a hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimitingChannel {
    Red,
    Green,
    Blue,
}

impl LimitingChannel {
    fn for_hue(a: f64, b: f64) -> Self {
        if -1.88170328 * a - 0.80936493 * b > 1.0 {
            LimitingChannel::Red
        } else if 1.81444104 * a - 1.19445276 * b > 1.0 {
            LimitingChannel::Green
        } else {
            LimitingChannel::Blue
        }
    }

    /// Coefficients of the polynomial fit `k0 + k1 a + k2 b + k3 a^2 + k4 a b`.
    fn fit(self) -> [f64; 5] {
        match self {
            LimitingChannel::Red => [1.19086277, 1.76576728, 0.59662641, 0.75515197, 0.56771245],
            LimitingChannel::Green => {
                [0.73956515, -0.45954404, 0.08285427, 0.12541070, 0.14503204]
            }
            LimitingChannel::Blue => {
                [1.35733652, -0.00915799, -1.15130210, -0.50559606, 0.00692167]
            }
        }
    }

    fn weights(self) -> [f64; 3] {
        match self {
            LimitingChannel::Red => LMS_TO_RGB[0],
            LimitingChannel::Green => LMS_TO_RGB[1],
            LimitingChannel::Blue => LMS_TO_RGB[2],
        }
    }
}

/// Rate of change of the cube-rooted LMS channels per unit chroma along a hue.
fn lms_hue_slopes(a: f64, b: f64) -> [f64; 3] {
    [
        0.3963377774 * a + 0.2158037573 * b,
        -0.1055613458 * a - 0.0638541728 * b,
        -0.0894841775 * a - 1.2914855480 * b,
    ]
}

fn dot(w: [f64; 3], v: [f64; 3]) -> f64 {
    w[0] * v[0] + w[1] * v[1] + w[2] * v[2]
}

/// Value of the limiting channel at `(L = 1, C = s)` along the hue, with its
/// first and second derivatives in `s`.
fn limiting_channel_at(a: f64, b: f64, s: f64) -> (f64, f64, f64) {
    let w = LimitingChannel::for_hue(a, b).weights();
    let k = lms_hue_slopes(a, b);
    let lms_ = k.map(|ki| 1.0 + s * ki);

    let value: [f64; 3] = std::array::from_fn(|i| lms_[i] * lms_[i] * lms_[i]);
    let d1: [f64; 3] = std::array::from_fn(|i| 3.0 * k[i] * lms_[i] * lms_[i]);
    let d2: [f64; 3] = std::array::from_fn(|i| 6.0 * k[i] * k[i] * lms_[i]);

    (dot(w, value), dot(w, d1), dot(w, d2))
}

/// Closed-form estimate of the maximum saturation `S = C / L` for a hue.
pub fn max_saturation_estimate(a: f64, b: f64) -> f64 {
    let [k0, k1, k2, k3, k4] = LimitingChannel::for_hue(a, b).fit();
    k0 + k1 * a + k2 * b + k3 * a * a + k4 * a * b
}

/// Maximum saturation `S = C / L` for the hue `(a, b)` (a unit vector):
/// the polynomial estimate refined by one Halley step.
///
/// A vanishing Halley denominator (the degenerate hue `(0, 0)`) keeps the estimate.
pub fn compute_max_saturation(a: f64, b: f64) -> f64 {
    let s = max_saturation_estimate(a, b);
    let (f, f1, f2) = limiting_channel_at(a, b, s);
    let denom = f1 * f1 - 0.5 * f * f2;
    if denom == 0.0 {
        return s;
    }
    s - f * f1 / denom
}

/// Finds the cusp for the hue `(a, b)`.
pub fn find_cusp(a: f64, b: f64) -> Cusp {
    let s_cusp = compute_max_saturation(a, b);
    let rgb_at_max = oklab_to_linear(OkLab {
        l: 1.0,
        a: s_cusp * a,
        b: s_cusp * b,
    });
    let l_cusp = signed_cbrt(1.0 / rgb_at_max.max_channel());
    Cusp {
        l: l_cusp,
        c: l_cusp * s_cusp,
    }
}

/// One Halley correction of `t` for a single RGB channel hitting 1.
///
/// Returns infinity when the correction points the wrong way. A zero
/// denominator yields a zero step, which still competes in the caller's `min`.
fn channel_step(row: [f64; 3], cubed: [f64; 3], d1: [f64; 3], d2: [f64; 3]) -> f64 {
    let value = dot(row, cubed) - 1.0;
    let v1 = dot(row, d1);
    let v2 = dot(row, d2);
    let denom = v1 * v1 - 0.5 * value * v2;
    let u = if denom != 0.0 { v1 / denom } else { 0.0 };
    if u >= 0.0 {
        -value * u
    } else {
        f64::INFINITY
    }
}

/// Finds `t` such that `(L0 * (1 - t) + t * L1, t * C1)` lies on the gamut
/// boundary for the hue `(a, b)`.
///
/// Pass a precomputed `cusp` to avoid recomputing it.
pub fn find_gamut_intersection(
    a: f64,
    b: f64,
    l1: f64,
    c1: f64,
    l0: f64,
    cusp: Option<Cusp>,
) -> f64 {
    let cusp = cusp.unwrap_or_else(|| find_cusp(a, b));

    if (l1 - l0) * cusp.c - (cusp.l - l0) * c1 <= 0.0 {
        // Lower half: the black-to-cusp edge is exact enough.
        return cusp.c * l0 / (c1 * cusp.l + cusp.c * (l0 - l1));
    }

    // Upper half: intersect the white-to-cusp edge, then refine.
    let mut t = cusp.c * (l0 - 1.0) / (c1 * (cusp.l - 1.0) + cusp.c * (l0 - l1));

    let dl = l1 - l0;
    let dc = c1;
    let k = lms_hue_slopes(a, b);
    let lms_dt = k.map(|ki| dl + dc * ki);

    let l = l0 * (1.0 - t) + t * l1;
    let c = t * c1;
    let lms_ = k.map(|ki| l + c * ki);

    let cubed: [f64; 3] = std::array::from_fn(|i| lms_[i] * lms_[i] * lms_[i]);
    let d1: [f64; 3] = std::array::from_fn(|i| 3.0 * lms_dt[i] * lms_[i] * lms_[i]);
    let d2: [f64; 3] = std::array::from_fn(|i| 6.0 * lms_dt[i] * lms_dt[i] * lms_[i]);

    let step = LMS_TO_RGB
        .iter()
        .map(|&row| channel_step(row, cubed, d1, d2))
        .fold(f64::INFINITY, f64::min);
    t += step;
    t
}

/// Policy for choosing the lightness a clipped color is projected toward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ClipStrategy {
    /// Keep lightness, reduce chroma.
    #[default]
    PreserveChroma,
    /// Project toward `L = 0.5`.
    ProjectToMid,
    /// Project toward the cusp lightness of the hue.
    ProjectToCusp,
    /// Blend of the above around `L = 0.5`; larger `alpha` favors lightness changes.
    AdaptiveMid { alpha: f64 },
    /// Same as `AdaptiveMid` but centered on the cusp lightness.
    AdaptiveCusp { alpha: f64 },
}

const CLIP_NAMES: &[&str] = &[
    "preserve-chroma",
    "project-0.5",
    "project-cusp",
    "adaptive-0.5",
    "adaptive-cusp",
];

impl ClipStrategy {
    /// Looks up a policy by name; adaptive policies get [`DEFAULT_ALPHA`].
    pub fn from_name(name: &str) -> Result<Self, ColorError> {
        Self::from_name_with_alpha(name, DEFAULT_ALPHA)
    }

    /// Looks up a policy by name with an explicit `alpha` for the adaptive ones.
    ///
    /// `alpha` must be finite and non-negative when the policy uses it.
    pub fn from_name_with_alpha(name: &str, alpha: f64) -> Result<Self, ColorError> {
        let adaptive = name.starts_with("adaptive-");
        if adaptive && !(alpha.is_finite() && alpha >= 0.0) {
            return Err(ColorError::InvalidInput(format!(
                "alpha must be finite and non-negative, got {alpha}"
            )));
        }
        match name {
            "preserve-chroma" => Ok(ClipStrategy::PreserveChroma),
            "project-0.5" => Ok(ClipStrategy::ProjectToMid),
            "project-cusp" => Ok(ClipStrategy::ProjectToCusp),
            "adaptive-0.5" => Ok(ClipStrategy::AdaptiveMid { alpha }),
            "adaptive-cusp" => Ok(ClipStrategy::AdaptiveCusp { alpha }),
            _ => Err(ColorError::UnknownStrategy(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClipStrategy::PreserveChroma => CLIP_NAMES[0],
            ClipStrategy::ProjectToMid => CLIP_NAMES[1],
            ClipStrategy::ProjectToCusp => CLIP_NAMES[2],
            ClipStrategy::AdaptiveMid { .. } => CLIP_NAMES[3],
            ClipStrategy::AdaptiveCusp { .. } => CLIP_NAMES[4],
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        CLIP_NAMES
    }

    /// Lightness on the achromatic axis that `(l, c)` is projected toward.
    fn anchor_lightness(self, l: f64, c: f64, cusp: Cusp) -> f64 {
        match self {
            ClipStrategy::PreserveChroma => l.clamp(0.0, 1.0),
            ClipStrategy::ProjectToMid => 0.5,
            ClipStrategy::ProjectToCusp => cusp.l,
            ClipStrategy::AdaptiveMid { alpha } => {
                let ld = l - 0.5;
                let e1 = 0.5 + ld.abs() + alpha * c;
                0.5 * (1.0 + sgn(ld) * (e1 - (e1 * e1 - 2.0 * ld.abs()).sqrt()))
            }
            ClipStrategy::AdaptiveCusp { alpha } => {
                let ld = l - cusp.l;
                let k = 2.0 * if ld > 0.0 { 1.0 - cusp.l } else { cusp.l };
                let e1 = 0.5 * k + ld.abs() + alpha * c / k;
                cusp.l + 0.5 * (sgn(ld) * (e1 - (e1 * e1 - 2.0 * k * ld.abs()).sqrt()))
            }
        }
    }
}

/// Sign with `sgn(0) == 0`, unlike `f64::signum`.
fn sgn(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn clamp_unit(c: LinearRgb) -> LinearRgb {
    let clamp = |x: f64| if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
    LinearRgb {
        r: clamp(c.r),
        g: clamp(c.g),
        b: clamp(c.b),
    }
}

/// Maps a linear sRGB color into the unit cube with the given policy.
///
/// Colors already inside the closed unit cube are returned unchanged. Out of
/// gamut colors are moved along a straight line in the `(L, C)` plane of their
/// hue toward the policy's anchor lightness until they meet the boundary.
/// Near-achromatic colors have no usable hue and fall back to the gray at
/// their clamped lightness. The result is always clamped to [0, 1].
pub fn clip_to_gamut(rgb: LinearRgb, strategy: ClipStrategy) -> LinearRgb {
    if rgb.inside_unit_cube() {
        return rgb;
    }

    let lab = linear_to_oklab(rgb);
    let l = lab.l;
    let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
    if !(c >= ACHROMATIC_EPS) {
        let gray = l.clamp(0.0, 1.0);
        return clamp_unit(oklab_to_linear(OkLab {
            l: gray,
            a: 0.0,
            b: 0.0,
        }));
    }
    let a_ = lab.a / c;
    let b_ = lab.b / c;

    let cusp = find_cusp(a_, b_);
    let l0 = strategy.anchor_lightness(l, c, cusp);
    let t = find_gamut_intersection(a_, b_, l, c, l0, Some(cusp));

    let l_clipped = l0 * (1.0 - t) + t * l;
    let c_clipped = t * c;
    clamp_unit(oklab_to_linear(OkLab {
        l: l_clipped,
        a: c_clipped * a_,
        b: c_clipped * b_,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{rgb_to_oklab, Srgb};

    fn hue(degrees: f64) -> (f64, f64) {
        let r = degrees.to_radians();
        (r.cos(), r.sin())
    }

    fn boundary_distance(c: LinearRgb) -> f64 {
        c.min_channel().abs().min((c.max_channel() - 1.0).abs())
    }

    // -- cusp --

    #[test]
    fn cusp_touches_unit_cube_every_five_degrees() {
        for step in 0..72 {
            let (a, b) = hue(step as f64 * 5.0);
            let cusp = find_cusp(a, b);
            assert!(cusp.l > 0.0 && cusp.l < 1.0, "L_cusp {} at step {step}", cusp.l);
            assert!(cusp.c > 0.0, "C_cusp {} at step {step}", cusp.c);
            let rgb = oklab_to_linear(OkLab {
                l: cusp.l,
                a: cusp.c * a,
                b: cusp.c * b,
            });
            assert!(
                (rgb.max_channel() - 1.0).abs() < 1e-6,
                "max channel {} at {} degrees",
                rgb.max_channel(),
                step * 5
            );
        }
    }

    #[test]
    fn cusp_of_red_hue_is_red() {
        let (_, a, b) = rgb_to_oklab(Srgb {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        })
        .chroma_direction();
        let cusp = find_cusp(a, b);
        assert!((cusp.l - 0.62796).abs() < 1e-3, "L_cusp {}", cusp.l);
        assert!((cusp.c - 0.25768).abs() < 1e-3, "C_cusp {}", cusp.c);
    }

    #[test]
    fn halley_step_shrinks_residual_tenfold() {
        for degrees in [0.0, 60.0, 120.0, 180.0, 240.0, 300.0] {
            let (a, b) = hue(degrees);
            let (before, _, _) = limiting_channel_at(a, b, max_saturation_estimate(a, b));
            let (after, _, _) = limiting_channel_at(a, b, compute_max_saturation(a, b));
            assert!(
                after.abs() * 10.0 <= before.abs(),
                "{degrees} degrees: residual {before} -> {after}"
            );
        }
    }

    #[test]
    fn degenerate_hue_does_not_produce_nan() {
        let s = compute_max_saturation(0.0, 0.0);
        assert!(s.is_finite(), "S = {s}");
    }

    #[test]
    fn limiting_channel_sectors() {
        let (a, b) = hue(180.0);
        assert_eq!(LimitingChannel::for_hue(a, b), LimitingChannel::Red);
        let (a, b) = hue(0.0);
        assert_eq!(LimitingChannel::for_hue(a, b), LimitingChannel::Green);
        let (a, b) = hue(90.0);
        assert_eq!(LimitingChannel::for_hue(a, b), LimitingChannel::Blue);
    }

    // -- intersection --

    #[test]
    fn ray_through_cusp_exits_at_cusp() {
        let (a, b) = hue(29.0);
        let cusp = find_cusp(a, b);
        for l0 in [0.2, 0.5, 0.9] {
            let t = find_gamut_intersection(a, b, cusp.l, cusp.c, l0, None);
            assert!((t - 1.0).abs() < 1e-6, "t = {t} from L0 = {l0}");
        }
    }

    #[test]
    fn intersection_lands_on_boundary() {
        for step in 0..12 {
            let (a, b) = hue(step as f64 * 30.0);
            for l1 in [0.2, 0.5, 0.8, 0.95] {
                let t = find_gamut_intersection(a, b, l1, 0.5, 0.5, None);
                let l = 0.5 * (1.0 - t) + t * l1;
                let c = t * 0.5;
                let rgb = oklab_to_linear(OkLab {
                    l,
                    a: c * a,
                    b: c * b,
                });
                assert!(
                    boundary_distance(rgb) < 1e-3,
                    "hue {} L1 {l1}: {:?}",
                    step * 30,
                    rgb
                );
            }
        }
    }

    #[test]
    fn precomputed_cusp_matches_computed() {
        let (a, b) = hue(200.0);
        let cusp = find_cusp(a, b);
        let with = find_gamut_intersection(a, b, 0.9, 0.3, 0.6, Some(cusp));
        let without = find_gamut_intersection(a, b, 0.9, 0.3, 0.6, None);
        assert_eq!(with.to_bits(), without.to_bits());
    }

    // -- clipping --

    fn all_strategies() -> [ClipStrategy; 5] {
        [
            ClipStrategy::PreserveChroma,
            ClipStrategy::ProjectToMid,
            ClipStrategy::ProjectToCusp,
            ClipStrategy::AdaptiveMid {
                alpha: DEFAULT_ALPHA,
            },
            ClipStrategy::AdaptiveCusp {
                alpha: DEFAULT_ALPHA,
            },
        ]
    }

    #[test]
    fn in_gamut_colors_pass_through() {
        let inside = LinearRgb {
            r: 0.3,
            g: 0.0,
            b: 1.0,
        };
        for s in all_strategies() {
            assert_eq!(clip_to_gamut(inside, s), inside, "{}", s.name());
        }
    }

    #[test]
    fn out_of_gamut_colors_land_in_unit_cube() {
        let outside = LinearRgb {
            r: 1.4,
            g: 0.2,
            b: -0.3,
        };
        for s in all_strategies() {
            let clipped = clip_to_gamut(outside, s);
            assert!(clipped.inside_unit_cube(), "{}: {:?}", s.name(), clipped);
            assert!(boundary_distance(clipped) < 1e-3, "{}: {:?}", s.name(), clipped);
        }
    }

    #[test]
    fn preserve_chroma_keeps_lightness_and_hue() {
        let outside = LinearRgb {
            r: 1.2,
            g: 0.5,
            b: -0.1,
        };
        let before = linear_to_oklab(outside);
        let after = linear_to_oklab(clip_to_gamut(outside, ClipStrategy::PreserveChroma));
        assert!((before.l - after.l).abs() < 1e-3, "L {} -> {}", before.l, after.l);
        let (_, a0, b0) = before.chroma_direction();
        let (_, a1, b1) = after.chroma_direction();
        assert!((a0 - a1).abs() < 1e-2 && (b0 - b1).abs() < 1e-2);
    }

    #[test]
    fn overbright_gray_clips_to_white() {
        let overbright = LinearRgb {
            r: 2.0,
            g: 2.0,
            b: 2.0,
        };
        for s in all_strategies() {
            let clipped = clip_to_gamut(overbright, s);
            assert!(clipped.min_channel() > 0.999, "{}: {:?}", s.name(), clipped);
        }
    }

    #[test]
    fn negative_gray_clips_to_black() {
        let below = LinearRgb {
            r: -0.5,
            g: -0.5,
            b: -0.5,
        };
        let clipped = clip_to_gamut(below, ClipStrategy::ProjectToMid);
        assert!(clipped.max_channel() < 1e-6, "{:?}", clipped);
    }

    #[test]
    fn nan_input_falls_back_to_black() {
        let nan = LinearRgb {
            r: f64::NAN,
            g: 0.5,
            b: 0.5,
        };
        let clipped = clip_to_gamut(nan, ClipStrategy::PreserveChroma);
        assert!(clipped.inside_unit_cube(), "{:?}", clipped);
    }

    #[test]
    fn strategy_names_round_trip() {
        for s in all_strategies() {
            assert_eq!(ClipStrategy::from_name(s.name()).unwrap(), s);
        }
        assert_eq!(ClipStrategy::list_names().len(), 5);
    }

    #[test]
    fn unknown_strategy_name_is_rejected() {
        assert!(matches!(
            ClipStrategy::from_name("nearest"),
            Err(ColorError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn adaptive_alpha_must_be_finite_and_non_negative() {
        for alpha in [f64::NAN, -0.1, f64::INFINITY] {
            assert!(
                matches!(
                    ClipStrategy::from_name_with_alpha("adaptive-cusp", alpha),
                    Err(ColorError::InvalidInput(_))
                ),
                "alpha {alpha}"
            );
        }
        assert_eq!(
            ClipStrategy::from_name_with_alpha("adaptive-0.5", 0.0).unwrap(),
            ClipStrategy::AdaptiveMid { alpha: 0.0 }
        );
        // ignored by the fixed projections
        assert_eq!(
            ClipStrategy::from_name_with_alpha("project-cusp", f64::NAN).unwrap(),
            ClipStrategy::ProjectToCusp
        );
    }

    #[test]
    fn sgn_of_zero_is_zero() {
        assert_eq!(sgn(0.0), 0.0);
        assert_eq!(sgn(-3.0), -1.0);
        assert_eq!(sgn(2.0), 1.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clipping_is_idempotent(
                r in -1.0_f64..=2.0,
                g in -1.0_f64..=2.0,
                b in -1.0_f64..=2.0,
                which in 0usize..5,
            ) {
                let s = all_strategies()[which];
                let once = clip_to_gamut(LinearRgb { r, g, b }, s);
                let twice = clip_to_gamut(once, s);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn clipping_always_lands_in_unit_cube(
                r in -1.0_f64..=2.0,
                g in -1.0_f64..=2.0,
                b in -1.0_f64..=2.0,
                which in 0usize..5,
            ) {
                let clipped = clip_to_gamut(LinearRgb { r, g, b }, all_strategies()[which]);
                prop_assert!(clipped.inside_unit_cube(), "{:?}", clipped);
            }
        }
    }
}
