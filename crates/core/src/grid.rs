//! Palette grid: a rectangular grid of optional byte colors, plus the JSON
//! document envelope and a directory-backed palette store.
//!
//! On disk a palette is `{"name": "...", "palette": [[[r, g, b], null, ...], ...]}`
//! where `null` marks an empty cell.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::error::ColorError;

/// Reserved palette name that `PaletteStore::save` refuses to write.
pub const DEFAULT_PALETTE_NAME: &str = "_default";

const PALETTE_EXTENSION: &str = "json";

/// Rectangular grid of palette cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<Rgb8>>>", into = "Vec<Vec<Option<Rgb8>>>")]
pub struct PaletteGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Rgb8>>,
}

impl PaletteGrid {
    /// Creates an all-empty grid. Both dimensions must be non-zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ColorError> {
        if rows == 0 || cols == 0 {
            return Err(ColorError::InvalidPalette(format!(
                "grid dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        let len = rows.checked_mul(cols).ok_or_else(|| {
            ColorError::InvalidPalette(format!("grid {rows}x{cols} is too large"))
        })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![None; len],
        })
    }

    /// Builds a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Option<Rgb8>>>) -> Result<Self, ColorError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(ColorError::InvalidPalette("palette grid is empty".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ColorError::InvalidPalette(format!(
                "row {i} has {} cells, expected {cols}",
                row.len()
            )));
        }
        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    /// An empty cell is `Some(None)`.
    pub fn get(&self, row: usize, col: usize) -> Option<Option<Rgb8>> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Writes a cell; `None` empties it.
    pub fn set(&mut self, row: usize, col: usize, color: Option<Rgb8>) -> Result<(), ColorError> {
        let i = self.index(row, col).ok_or_else(|| {
            ColorError::InvalidInput(format!(
                "cell ({row}, {col}) outside {}x{} grid",
                self.rows, self.cols
            ))
        })?;
        self.cells[i] = color;
        Ok(())
    }

    /// Number of non-empty cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterates rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<Rgb8>]> {
        self.cells.chunks(self.cols)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

impl TryFrom<Vec<Vec<Option<Rgb8>>>> for PaletteGrid {
    type Error = ColorError;

    fn try_from(rows: Vec<Vec<Option<Rgb8>>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PaletteGrid> for Vec<Vec<Option<Rgb8>>> {
    fn from(grid: PaletteGrid) -> Self {
        grid.iter_rows().map(<[_]>::to_vec).collect()
    }
}

/// A named palette as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDocument {
    pub name: String,
    pub palette: PaletteGrid,
}

/// Serializes with four-space indentation.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ColorError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Keeps alphanumerics and `._- ` after trimming surrounding whitespace.
pub fn sanitize_name(name: &str) -> Result<String, ColorError> {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || "._- ".contains(*c))
        .collect();
    if cleaned.is_empty() {
        return Err(ColorError::InvalidInput(format!(
            "invalid palette name: {name:?}"
        )));
    }
    Ok(cleaned)
}

/// Directory of `<name>.json` palette documents.
#[derive(Debug, Clone)]
pub struct PaletteStore {
    dir: PathBuf,
}

impl PaletteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{PALETTE_EXTENSION}"))
    }

    /// Sorted names of the palettes in the directory.
    pub fn list(&self) -> Result<Vec<String>, ColorError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PALETTE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads the palette saved under `name`, after the same sanitizing as
    /// [`PaletteStore::save`].
    pub fn load(&self, name: &str) -> Result<PaletteDocument, ColorError> {
        let name = sanitize_name(name)?;
        let path = self.path_for(&name);
        let text = fs::read_to_string(&path)?;
        let doc: PaletteDocument = serde_json::from_str(&text)?;
        tracing::debug!(
            name = name.as_str(),
            rows = doc.palette.rows(),
            cols = doc.palette.cols(),
            "loaded palette"
        );
        Ok(doc)
    }

    /// Saves `grid` under a sanitized `name` and returns the name used.
    ///
    /// Never overwrites: an existing palette or the reserved default name is
    /// rejected.
    pub fn save(&self, name: &str, grid: &PaletteGrid) -> Result<String, ColorError> {
        let name = sanitize_name(name)?;
        if name == DEFAULT_PALETTE_NAME {
            return Err(ColorError::InvalidInput(
                "the default palette cannot be overwritten".into(),
            ));
        }
        let doc = PaletteDocument {
            name: name.clone(),
            palette: grid.clone(),
        };
        let bytes = to_pretty_json(&doc)?;

        let path = self.path_for(&name);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ColorError::InvalidInput(format!(
                    "palette {name:?} already exists"
                )));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&bytes)?;
        tracing::debug!(name = %name, path = %path.display(), "saved palette");
        Ok(name)
    }
}
