//! Zigzag data placement and read-back

use crate::models::{Grid, MaskPattern};

/// Visits every module of a `size`x`size` symbol in data placement order.
///
/// Column pairs are scanned from the right edge leftwards, skipping the
/// vertical timing column. Within a pair the right column comes first and
/// the vertical direction alternates from pair to pair, starting upwards.
/// Yields `(x, y)`.
pub struct ZigZag {
    size: usize,
    right: isize,
    vert: usize,
    j: usize,
}

impl ZigZag {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            right: size as isize - 1,
            vert: 0,
            j: 0,
        }
    }
}

impl Iterator for ZigZag {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        loop {
            if self.right < 1 {
                return None;
            }
            if self.vert >= self.size {
                self.vert = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
                continue;
            }
            let right = self.right as usize;
            let x = right - self.j;
            let upward = (right + 1) & 2 == 0;
            let y = if upward {
                self.size - 1 - self.vert
            } else {
                self.vert
            };

            self.j += 1;
            if self.j == 2 {
                self.j = 0;
                self.vert += 1;
            }
            return Some((x, y));
        }
    }
}

/// Write `codewords` MSB-first into every module of `target` that `reserved`
/// does not use. Modules past the end of the codewords get 0; extra
/// codewords are dropped. With `mask`, each placed bit is XORed with the
/// mask predicate at (row y, column x).
pub fn place_data(target: &mut Grid, reserved: &Grid, codewords: &[u8], mask: Option<MaskPattern>) {
    let total_bits = codewords.len() * 8;
    let free = ZigZag::new(target.width()).filter(|&(x, y)| !reserved.used(x, y));
    for (i, (x, y)) in free.enumerate() {
        let bit = i < total_bits && (codewords[i >> 3] >> (7 - (i & 7))) & 1 == 1;
        let flip = mask.is_some_and(|m| m.is_masked(y, x));
        target.set(x, y, bit ^ flip);
    }
}

/// Read the data modules of `grid` back in placement order, undoing `mask`
pub fn extract_bits(grid: &Grid, reserved: &Grid, mask: Option<MaskPattern>) -> Vec<bool> {
    ZigZag::new(grid.width())
        .filter(|&(x, y)| !reserved.used(x, y))
        .map(|(x, y)| grid.get(x, y) ^ mask.is_some_and(|m| m.is_masked(y, x)))
        .collect()
}

/// Pack the first `count` codewords out of [`extract_bits`]
pub fn extract_codewords(
    grid: &Grid,
    reserved: &Grid,
    mask: Option<MaskPattern>,
    count: usize,
) -> Vec<u8> {
    extract_bits(grid, reserved, mask)
        .chunks_exact(8)
        .take(count)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect()
}
