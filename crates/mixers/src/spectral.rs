//! Spectral mixing collaborator.
//!
//! Physically based paint mixing needs reflectance curves that this crate does
//! not carry. Hosts that have them implement [`SpectralMix`]; everything else
//! gets [`LinearLightMix`].

use palette_tin_core::color::{decode, encode, Rgb8};

/// A pigment-style two-color mix.
pub trait SpectralMix: Send + Sync {
    /// Mixes `mixer` into `base`; `rate` is the mixer's share in [0, 1].
    fn mix(&self, base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8;
}

/// Weighted geometric mean per channel in linear light.
///
/// Multiplying channels behaves like stacking filters: complementary colors
/// darken rather than wash out to gray, which is closer to paint than an
/// arithmetic average.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLightMix;

/// Floor applied before the geometric mean so a zero channel does not absorb
/// everything.
const REFLECTANCE_FLOOR: f64 = 1e-4;

impl SpectralMix for LinearLightMix {
    fn mix(&self, base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
        let t = rate.clamp(0.0, 1.0);
        let channel = |b: u8, m: u8| {
            let b = decode(b).max(REFLECTANCE_FLOOR);
            let m = decode(m).max(REFLECTANCE_FLOOR);
            encode(b.powf(1.0 - t) * m.powf(t))
        };
        Rgb8::new(
            channel(base.r, mixer.r),
            channel(base.g, mixer.g),
            channel(base.b, mixer.b),
        )
    }
}
