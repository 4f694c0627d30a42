//! Diagonal run scanning over a boolean match mask
//!
//! Rows are candidate early frames, columns candidate late frames. A run of
//! `true` cells along a diagonal `j - i = k` is a time-aligned repeated
//! passage.
//!
//! # Algorithm
//!
//! 1. Visit diagonals in increasing `k`, from `-(rows - 1)` to `cols - 1`
//! 2. Walk each diagonal left to right, tracking the current run
//! 3. Emit a [`MatchSpan`] whenever a run ends
//! 4. Keep the first run of maximal length as the best match
//!
//! The scan order is fixed, so the winner is deterministic: a later run of
//! equal length never replaces an earlier one.

use super::similarity::FeatureTable;
use super::{BestMatch, MatchSpan};
use rayon::prelude::*;

/// Flat `rows × cols` boolean grid, indexed `row * cols + col`
#[derive(Debug, Clone)]
pub struct MatchMask {
    cells: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl MatchMask {
    /// All-false mask
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![false; rows * cols],
            rows,
            cols,
        }
    }

    /// Cross-half mask: cell `(i, j)` is set iff
    /// `similarity(i, split + j) >= threshold`.
    ///
    /// `split` is the first late-half frame; the mask is
    /// `split × (frames - split)`. Rows are filled in parallel.
    pub fn cross_half(table: &FeatureTable, split: usize, threshold: f64) -> Self {
        let rows = split.min(table.frames());
        let cols = table.frames() - rows;
        let mut mask = Self::new(rows, cols);
        if cols == 0 {
            return mask;
        }

        mask.cells
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = table.similarity(i, split + j) >= threshold;
                }
            });
        mask
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value; panics when out of range
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.cols, "mask index out of range");
        self.cells[row * self.cols + col]
    }

    /// Set a cell; panics when out of range
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(row < self.rows && col < self.cols, "mask index out of range");
        self.cells[row * self.cols + col] = value;
    }

    /// Number of `true` cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Result of a full diagonal scan
#[derive(Debug, Clone, Default)]
pub struct DiagonalScan {
    /// First-encountered longest run (mask coordinates)
    pub best: BestMatch,
    /// Every run on every diagonal, longest first
    pub spans: Vec<MatchSpan>,
}

/// Scan every diagonal of `mask` for runs of matching cells
///
/// Span coordinates are mask coordinates (row, column); callers offset the
/// column by the split point to get absolute late frames.
///
/// Complexity is O(rows × cols).
pub fn scan_diagonals(mask: &MatchMask) -> DiagonalScan {
    let rows = mask.rows() as isize;
    let cols = mask.cols() as isize;
    let mut best = BestMatch::default();
    let mut spans = Vec::new();

    if rows == 0 || cols == 0 {
        return DiagonalScan { best, spans };
    }

    for k in (1 - rows)..cols {
        let row_base = if k >= 0 { 0 } else { (-k) as usize };
        let col_base = if k >= 0 { k as usize } else { 0 };
        let len = (mask.rows() - row_base).min(mask.cols() - col_base);

        let mut run = 0usize;
        let mut run_start = 0usize;
        for s in 0..len {
            if mask.get(row_base + s, col_base + s) {
                if run == 0 {
                    run_start = s;
                }
                run += 1;
            } else if run > 0 {
                close_run(&mut best, &mut spans, row_base + run_start, col_base + run_start, run);
                run = 0;
            }
        }
        if run > 0 {
            close_run(&mut best, &mut spans, row_base + run_start, col_base + run_start, run);
        }
    }

    // Stable sort keeps scan order among equal lengths
    spans.sort_by(|a, b| b.length.cmp(&a.length));

    DiagonalScan { best, spans }
}

fn close_run(
    best: &mut BestMatch,
    spans: &mut Vec<MatchSpan>,
    row: usize,
    col: usize,
    length: usize,
) {
    best.offer(length, row, col);
    spans.push(MatchSpan {
        early_start_frame: row,
        late_start_frame: col,
        length,
    });
}
