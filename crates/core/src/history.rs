//! Bounded undo history of palette grid snapshots.

use std::collections::VecDeque;

use crate::error::ColorError;
use crate::grid::PaletteGrid;

/// Default number of snapshots retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// A bounded stack of grid snapshots, newest last.
///
/// Holds at most `limit` snapshots; pushing onto a full history drops the
/// oldest. The newest snapshot is the current state, so `undo` discards it
/// and returns the one before.
#[derive(Debug, Clone)]
pub struct PaletteHistory {
    snapshots: VecDeque<PaletteGrid>,
    limit: usize,
}

impl Default for PaletteHistory {
    fn default() -> Self {
        Self {
            snapshots: VecDeque::with_capacity(DEFAULT_HISTORY_LIMIT),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl PaletteHistory {
    /// Creates an empty history. `limit` must be at least 1.
    pub fn new(limit: usize) -> Result<Self, ColorError> {
        check_limit(limit)?;
        Ok(Self {
            snapshots: VecDeque::with_capacity(limit),
            limit,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Records a new current snapshot.
    pub fn push(&mut self, grid: PaletteGrid) {
        if self.snapshots.len() == self.limit {
            self.snapshots.pop_front();
            tracing::debug!(limit = self.limit, "history full, dropped oldest snapshot");
        }
        self.snapshots.push_back(grid);
    }

    /// Changes the limit, dropping the oldest snapshots if it shrinks.
    pub fn set_limit(&mut self, limit: usize) -> Result<(), ColorError> {
        check_limit(limit)?;
        let excess = self.snapshots.len().saturating_sub(limit);
        if excess > 0 {
            self.snapshots.drain(..excess);
            tracing::debug!(limit, dropped = excess, "history limit reduced");
        }
        self.limit = limit;
        Ok(())
    }

    /// Discards the current snapshot and returns the previous one.
    ///
    /// Returns `None`, leaving the history untouched, when there is nothing
    /// to go back to.
    pub fn undo(&mut self) -> Option<&PaletteGrid> {
        if self.snapshots.len() < 2 {
            return None;
        }
        self.snapshots.pop_back();
        self.snapshots.back()
    }

    /// The current (newest) snapshot.
    pub fn current(&self) -> Option<&PaletteGrid> {
        self.snapshots.back()
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
    }

    /// Snapshots from oldest to newest.
    pub fn snapshots(&self) -> impl Iterator<Item = &PaletteGrid> {
        self.snapshots.iter()
    }
}

fn check_limit(limit: usize) -> Result<(), ColorError> {
    if limit == 0 {
        return Err(ColorError::InvalidInput(
            "history limit must be at least 1".into(),
        ));
    }
    Ok(())
}
