#![deny(unsafe_code)]
//! Mixer registry: named two-color blend strategies over byte RGB.
//!
//! A [`MixerRegistry`] is built once by an explicit constructor and keeps its
//! names in registration order, which is also the order a settings index
//! refers to. Strategies are looked up by display name and applied to a base
//! color, a mixer color, and a rate.

pub mod spectral;
pub mod strategies;

use std::fmt;
use std::sync::Arc;

use palette_tin_core::color::Rgb8;
use palette_tin_core::error::ColorError;
use palette_tin_core::grid::PaletteGrid;

pub use spectral::{LinearLightMix, SpectralMix};

/// Names of the default catalog, in registration order.
const DEFAULT_NAMES: &[&str] = &[
    "Spectral",
    "Weighted average",
    "Hybrid",
    "Overlay",
    "Sat Val",
    "Sat Val okhsl",
    "lightness okhsl",
];

/// Custom blend function.
pub type MixFn = dyn Fn(Rgb8, Rgb8, f64) -> Rgb8 + Send + Sync;

/// A blend strategy.
#[derive(Clone)]
pub enum Mixer {
    /// The registry's spectral collaborator.
    Spectral,
    WeightedAverage,
    /// Spectral and weighted average combined.
    Hybrid,
    Overlay,
    /// Device HSV saturation/value transfer; ignores rate.
    SatVal,
    /// Okhsl saturation/lightness transfer; ignores rate.
    SatValOkhsl,
    /// Okhsl lightness transfer; ignores rate.
    LightnessOkhsl,
    Lerp,
    /// Spectral and overlay combined.
    OverlayHybrid,
    Custom(Arc<MixFn>),
}

impl fmt::Debug for Mixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mixer::Spectral => f.write_str("Spectral"),
            Mixer::WeightedAverage => f.write_str("WeightedAverage"),
            Mixer::Hybrid => f.write_str("Hybrid"),
            Mixer::Overlay => f.write_str("Overlay"),
            Mixer::SatVal => f.write_str("SatVal"),
            Mixer::SatValOkhsl => f.write_str("SatValOkhsl"),
            Mixer::LightnessOkhsl => f.write_str("LightnessOkhsl"),
            Mixer::Lerp => f.write_str("Lerp"),
            Mixer::OverlayHybrid => f.write_str("OverlayHybrid"),
            Mixer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Mixer {
    /// Applies the strategy. `rate` must already be in [0, 1].
    fn apply(&self, spectral: &dyn SpectralMix, base: Rgb8, mixer: Rgb8, rate: f64) -> Rgb8 {
        match self {
            Mixer::Spectral => spectral.mix(base, mixer, rate),
            Mixer::WeightedAverage => strategies::weighted_average(base, mixer, rate),
            Mixer::Hybrid => strategies::hybrid(spectral, base, mixer, rate),
            Mixer::Overlay => strategies::overlay(base, mixer, rate),
            Mixer::SatVal => strategies::sat_val(base, mixer),
            Mixer::SatValOkhsl => strategies::sat_val_okhsl(base, mixer),
            Mixer::LightnessOkhsl => strategies::lightness_okhsl(base, mixer),
            Mixer::Lerp => strategies::lerp(base, mixer, rate),
            Mixer::OverlayHybrid => strategies::overlay_hybrid(spectral, base, mixer, rate),
            Mixer::Custom(f) => f(base, mixer, rate),
        }
    }
}

/// Ordered catalog of named mixers.
pub struct MixerRegistry {
    entries: Vec<(String, Mixer)>,
    spectral: Arc<dyn SpectralMix>,
}

impl fmt::Debug for MixerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixerRegistry")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Default for MixerRegistry {
    fn default() -> Self {
        Self::new(Arc::new(LinearLightMix))
    }
}

impl MixerRegistry {
    /// Builds the default catalog around a spectral collaborator.
    pub fn new(spectral: Arc<dyn SpectralMix>) -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(DEFAULT_NAMES.len() + 2),
            spectral,
        };
        let defaults = [
            Mixer::Spectral,
            Mixer::WeightedAverage,
            Mixer::Hybrid,
            Mixer::Overlay,
            Mixer::SatVal,
            Mixer::SatValOkhsl,
            Mixer::LightnessOkhsl,
        ];
        for (name, mixer) in DEFAULT_NAMES.iter().zip(defaults) {
            registry.register(name, mixer);
        }
        tracing::debug!(count = registry.entries.len(), "mixer registry built");
        registry
    }

    /// The default catalog plus the strategies that are off by default,
    /// "LERP" and "Overlay Hybrid".
    pub fn with_disabled(spectral: Arc<dyn SpectralMix>) -> Self {
        let mut registry = Self::new(spectral);
        registry.register("LERP", Mixer::Lerp);
        registry.register("Overlay Hybrid", Mixer::OverlayHybrid);
        registry
    }

    /// Adds `name`. Re-registering an existing name replaces its mixer in place.
    pub fn register(&mut self, name: &str, mixer: Mixer) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => {
                tracing::warn!(name, "mixer re-registered, replacing previous entry");
                entry.1 = mixer;
            }
            None => self.entries.push((name.to_owned(), mixer)),
        }
    }

    /// Names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn get(&self, name: &str) -> Option<&Mixer> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    /// Mixes `mixer` into `base` with the named strategy.
    ///
    /// `rate` is clamped to [0, 1]; NaN is rejected with
    /// `ColorError::InvalidInput`. An unregistered name gives
    /// `ColorError::UnknownStrategy`.
    pub fn mix(&self, name: &str, base: Rgb8, mixer: Rgb8, rate: f64) -> Result<Rgb8, ColorError> {
        if rate.is_nan() {
            return Err(ColorError::InvalidInput("mix rate is NaN".into()));
        }
        let strategy = self
            .get(name)
            .ok_or_else(|| ColorError::UnknownStrategy(name.to_owned()))?;
        let rate = rate.clamp(0.0, 1.0);
        let out = strategy.apply(self.spectral.as_ref(), base, mixer, rate);
        tracing::trace!(
            strategy = name,
            base = %base.to_hex(),
            mixer = %mixer.to_hex(),
            rate,
            out = %out.to_hex(),
            "mixed"
        );
        Ok(out)
    }
}

/// Mixes the foreground color into one palette cell and writes the result back.
///
/// An empty cell takes the foreground color unchanged. Returns the new cell color.
pub fn mix_cell(
    registry: &MixerRegistry,
    strategy: &str,
    grid: &mut PaletteGrid,
    row: usize,
    col: usize,
    foreground: Rgb8,
    rate: f64,
) -> Result<Rgb8, ColorError> {
    let cell = grid.get(row, col).ok_or_else(|| {
        ColorError::InvalidInput(format!(
            "cell ({row}, {col}) outside {}x{} grid",
            grid.rows(),
            grid.cols()
        ))
    })?;
    let out = match cell {
        Some(base) => registry.mix(strategy, base, foreground, rate)?,
        None => {
            if !registry.contains(strategy) {
                return Err(ColorError::UnknownStrategy(strategy.to_owned()));
            }
            foreground
        }
    };
    grid.set(row, col, Some(out))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb8 = Rgb8::new(255, 0, 0);
    const BLUE: Rgb8 = Rgb8::new(0, 0, 255);

    #[test]
    fn default_names_in_registration_order() {
        let registry = MixerRegistry::default();
        assert_eq!(registry.list_names(), DEFAULT_NAMES);
    }

    #[test]
    fn disabled_strategies_are_not_default() {
        let registry = MixerRegistry::default();
        assert!(!registry.contains("LERP"));
        assert!(!registry.contains("Overlay Hybrid"));
        assert!(matches!(
            registry.mix("LERP", RED, BLUE, 0.5),
            Err(ColorError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn with_disabled_appends_two() {
        let registry = MixerRegistry::with_disabled(Arc::new(LinearLightMix));
        let names = registry.list_names();
        assert_eq!(names.len(), DEFAULT_NAMES.len() + 2);
        assert_eq!(&names[DEFAULT_NAMES.len()..], &["LERP", "Overlay Hybrid"]);
        assert_eq!(
            registry.mix("LERP", RED, BLUE, 0.5).unwrap(),
            Rgb8::new(128, 0, 128)
        );
    }

    #[test]
    fn unknown_strategy_fails() {
        let registry = MixerRegistry::default();
        match registry.mix("NoSuchMode", RED, BLUE, 0.5) {
            Err(ColorError::UnknownStrategy(name)) => assert_eq!(name, "NoSuchMode"),
            other => panic!("expected UnknownStrategy, got {other:?}"),
        }
    }

    #[test]
    fn red_blue_weighted_average() {
        let registry = MixerRegistry::default();
        let out = registry.mix("Weighted average", RED, BLUE, 0.5).unwrap();
        assert_eq!(out, Rgb8::new(128, 0, 128));
    }

    #[test]
    fn nan_rate_is_rejected() {
        let registry = MixerRegistry::default();
        assert!(matches!(
            registry.mix("Overlay", RED, BLUE, f64::NAN),
            Err(ColorError::InvalidInput(_))
        ));
    }

    #[test]
    fn rate_is_clamped() {
        let registry = MixerRegistry::default();
        assert_eq!(
            registry.mix("Weighted average", RED, BLUE, 1.5).unwrap(),
            BLUE
        );
        assert_eq!(
            registry.mix("Weighted average", RED, BLUE, -0.5).unwrap(),
            RED
        );
    }

    #[test]
    fn reregistration_overwrites_in_place() {
        let mut registry = MixerRegistry::default();
        let before = registry.list_names().iter().map(|s| s.to_string()).collect::<Vec<_>>();
        registry.register(
            "Overlay",
            Mixer::Custom(Arc::new(|_: Rgb8, _: Rgb8, _: f64| Rgb8::new(1, 2, 3))),
        );
        assert_eq!(registry.list_names(), before);
        assert_eq!(
            registry.mix("Overlay", RED, BLUE, 0.5).unwrap(),
            Rgb8::new(1, 2, 3)
        );
    }

    #[test]
    fn custom_mixer_appends() {
        let mut registry = MixerRegistry::default();
        registry.register("Mixer share", Mixer::Custom(Arc::new(|_: Rgb8, m: Rgb8, _: f64| m)));
        assert_eq!(registry.list_names().last(), Some(&"Mixer share"));
        assert_eq!(registry.mix("Mixer share", RED, BLUE, 0.0).unwrap(), BLUE);
    }

    struct ConstantSpectral(Rgb8);

    impl SpectralMix for ConstantSpectral {
        fn mix(&self, _: Rgb8, _: Rgb8, _: f64) -> Rgb8 {
            self.0
        }
    }

    #[test]
    fn spectral_collaborator_is_used() {
        let gray = Rgb8::new(50, 50, 50);
        let registry = MixerRegistry::new(Arc::new(ConstantSpectral(gray)));
        assert_eq!(registry.mix("Spectral", RED, BLUE, 0.5).unwrap(), gray);
        // Hybrid: weighted_average(gray, (128, 0, 128), 0.4)
        assert_eq!(
            registry.mix("Hybrid", RED, BLUE, 0.5).unwrap(),
            Rgb8::new(81, 30, 81)
        );
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MixerRegistry>();
    }

    // -- mix_cell --

    #[test]
    fn mix_cell_writes_result_back() {
        let registry = MixerRegistry::default();
        let mut grid = PaletteGrid::new(1, 2).unwrap();
        grid.set(0, 0, Some(RED)).unwrap();
        let out = mix_cell(&registry, "Weighted average", &mut grid, 0, 0, BLUE, 0.5).unwrap();
        assert_eq!(out, Rgb8::new(128, 0, 128));
        assert_eq!(grid.get(0, 0), Some(Some(out)));
    }

    #[test]
    fn mix_cell_into_empty_takes_foreground() {
        let registry = MixerRegistry::default();
        let mut grid = PaletteGrid::new(1, 2).unwrap();
        let out = mix_cell(&registry, "Overlay", &mut grid, 0, 1, BLUE, 0.5).unwrap();
        assert_eq!(out, BLUE);
        assert_eq!(grid.get(0, 1), Some(Some(BLUE)));
    }

    #[test]
    fn mix_cell_errors_leave_grid_untouched() {
        let registry = MixerRegistry::default();
        let mut grid = PaletteGrid::new(1, 1).unwrap();
        assert!(matches!(
            mix_cell(&registry, "NoSuchMode", &mut grid, 0, 0, BLUE, 0.5),
            Err(ColorError::UnknownStrategy(_))
        ));
        assert!(matches!(
            mix_cell(&registry, "Overlay", &mut grid, 3, 0, BLUE, 0.5),
            Err(ColorError::InvalidInput(_))
        ));
        assert_eq!(grid.filled_count(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rgb8() -> impl Strategy<Value = Rgb8> {
            any::<[u8; 3]>().prop_map(Rgb8::from)
        }

        proptest! {
            #[test]
            fn rate_free_strategies_ignore_rate(base in rgb8(), mixer in rgb8()) {
                let registry = MixerRegistry::default();
                for name in ["Sat Val", "Sat Val okhsl", "lightness okhsl"] {
                    let at_zero = registry.mix(name, base, mixer, 0.0).unwrap();
                    prop_assert_eq!(registry.mix(name, base, mixer, 0.5).unwrap(), at_zero);
                    prop_assert_eq!(registry.mix(name, base, mixer, 1.0).unwrap(), at_zero);
                }
            }

            #[test]
            fn every_strategy_is_total(base in rgb8(), mixer in rgb8(), rate in 0.0f64..=1.0) {
                let registry = MixerRegistry::with_disabled(Arc::new(LinearLightMix));
                for name in registry.list_names() {
                    prop_assert!(registry.mix(name, base, mixer, rate).is_ok());
                }
            }
        }
    }
}
