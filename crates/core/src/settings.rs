//! Persisted user preferences.
//!
//! The on-disk document is a flat JSON object. Reading is lenient: a key that
//! is missing or holds the wrong JSON type falls back to its default, so a
//! hand-edited or older settings file always loads.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::error::ColorError;
use crate::grid::to_pretty_json;
use crate::history::DEFAULT_HISTORY_LIMIT;

const KEY_MIXING_MODE: &str = "mixingMode";
const KEY_HISTORY_SIZE: &str = "historySize";
// Misspelling is part of the file format.
const KEY_MINIMIZE_RETAIN_WIDTH: &str = "minizeRetainWitdh";

/// User preferences for the palette docker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Index into the mixer registry's name list.
    pub mixing_mode: usize,
    /// Palette history limit, at least 1.
    pub history_size: usize,
    /// Keep the docker width when it is minimized.
    pub minimize_retain_width: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mixing_mode: 0,
            history_size: DEFAULT_HISTORY_LIMIT,
            minimize_retain_width: false,
        }
    }
}

impl Settings {
    /// Extracts settings from a JSON document, defaulting anything unusable.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            mixing_mode: param_usize(value, KEY_MIXING_MODE, defaults.mixing_mode),
            history_size: param_usize(value, KEY_HISTORY_SIZE, defaults.history_size).max(1),
            minimize_retain_width: param_bool(
                value,
                KEY_MINIMIZE_RETAIN_WIDTH,
                defaults.minimize_retain_width,
            ),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            KEY_MIXING_MODE: self.mixing_mode,
            KEY_HISTORY_SIZE: self.history_size,
            KEY_MINIMIZE_RETAIN_WIDTH: self.minimize_retain_width,
        })
    }

    /// Reads settings from a JSON file. The file must exist and be valid
    /// JSON; individual keys are read leniently.
    pub fn load(path: &Path) -> Result<Self, ColorError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        let settings = Self::from_value(&value);
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Writes settings as four-space-indented JSON.
    pub fn save(&self, path: &Path) -> Result<(), ColorError> {
        fs::write(path, to_pretty_json(&self.to_value())?)?;
        tracing::debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Resolves `mixing_mode` against the registry's ordered names.
    pub fn mixing_strategy<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Option<&'a str> {
        names.get(self.mixing_mode).map(AsRef::as_ref)
    }
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or
/// not a non-negative integer.
fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
