//! Mask penalty scoring (rules N1-N4) and automatic mask selection

use rayon::prelude::*;
use tracing::debug;

use crate::models::{Grid, MaskPattern, QRCode};

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

const FINDER_LIKE: [bool; 11] = [
    true, false, true, true, true, false, true, false, false, false, false,
];

/// Reads the grid along rows (`transpose = false`) or columns
fn line(grid: &Grid, index: usize, transpose: bool) -> Vec<bool> {
    let size = grid.width();
    (0..size)
        .map(|k| {
            if transpose {
                grid.get(index, k)
            } else {
                grid.get(k, index)
            }
        })
        .collect()
}

/// N1: runs of five or more same-coloured modules
fn run_penalty(modules: &[bool]) -> u32 {
    let mut score = 0;
    let mut run = 0;
    let mut prev = None;
    for &m in modules {
        if prev == Some(m) {
            run += 1;
        } else {
            if run >= 5 {
                score += N1 + (run - 5);
            }
            run = 1;
            prev = Some(m);
        }
    }
    if run >= 5 {
        score += N1 + (run - 5);
    }
    score
}

/// N3: 1:1:3:1:1 finder-like runs flanked by four light modules
///
/// Modules outside the symbol count as light, so a pattern against the
/// border still matches.
fn finder_penalty(modules: &[bool]) -> u32 {
    let flank = [false; 4];
    let padded: Vec<bool> = flank
        .iter()
        .chain(modules)
        .chain(flank.iter())
        .copied()
        .collect();
    let reversed = FINDER_LIKE.iter().rev();
    let matches = padded
        .windows(FINDER_LIKE.len())
        .map(|w| {
            let forward = w.iter().eq(FINDER_LIKE.iter());
            let backward = w.iter().eq(reversed.clone());
            forward as u32 + backward as u32
        })
        .sum::<u32>();
    matches * N3
}

/// Total penalty of a complete symbol grid; lower is better
pub fn penalty_score(grid: &Grid) -> u32 {
    let size = grid.width();
    let mut score = 0;

    for index in 0..size {
        for transpose in [false, true] {
            let modules = line(grid, index, transpose);
            score += run_penalty(&modules);
            score += finder_penalty(&modules);
        }
    }

    // N2: 2x2 blocks of one colour
    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let c = grid.get(x, y);
            if grid.get(x + 1, y) == c && grid.get(x, y + 1) == c && grid.get(x + 1, y + 1) == c {
                score += N2;
            }
        }
    }

    // N4: deviation of the dark ratio from 50%, in 5% steps
    let total = size * size;
    if total > 0 {
        let dark = grid.tiles(Some(true)).count();
        let k = (dark * 20).abs_diff(total * 10) / total;
        score += k as u32 * N4;
    }

    score
}

/// Score all eight masks in parallel and return the lowest, preferring the
/// smaller index on ties
pub fn select_best_mask(qr: &QRCode) -> (MaskPattern, u32) {
    let (score, mask) = MaskPattern::ALL
        .par_iter()
        .map(|&mask| (penalty_score(&qr.with_mask(mask).grid()), mask))
        .min_by_key(|&(score, mask)| (score, mask.index()))
        .unwrap_or((0, MaskPattern::default()));
    debug!(mask = mask.index(), score, "selected mask");
    (mask, score)
}

impl QRCode {
    /// Same symbol with the lowest-penalty mask
    pub fn with_best_mask(&self) -> QRCode {
        let (mask, _) = select_best_mask(self);
        self.with_mask(mask)
    }
}
