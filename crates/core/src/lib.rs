#![deny(unsafe_code)]
//! Core color model for Palette Tin.
//!
//! Provides the OKLab conversion chain (`color`), gamut geometry and chroma
//! clipping (`gamut`), the Okhsl/Okhsv cylinders (`okhsl`), device HSV and
//! color naming (`hsv`, `naming`), and the palette data model: grid, store,
//! history, and settings.

pub mod color;
pub mod error;
pub mod gamut;
pub mod grid;
pub mod history;
pub mod hsv;
pub mod naming;
pub mod okhsl;
pub mod settings;

pub use color::{LinearRgb, OkLab, Rgb8, Srgb};
pub use error::ColorError;
pub use gamut::{clip_to_gamut, ClipStrategy, Cusp};
pub use grid::{PaletteDocument, PaletteGrid, PaletteStore};
pub use history::PaletteHistory;
pub use hsv::DeviceHsv;
pub use okhsl::{Okhsl, Okhsv};
pub use settings::Settings;
