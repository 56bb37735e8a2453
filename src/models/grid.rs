/// Compact two-bit-per-cell matrix.
///
/// Every cell carries a `value` bit (dark/light) and a `used` bit
/// (reserved/occupied vs free). Four cells are packed per byte: the value
/// bit sits at `shift` and the used bit at `shift + 1`. A cell that is not
/// used has no meaningful value and reads as background.
///
/// Combinators (`union`, `erase`, `intersect`, `invert`) always allocate a
/// fresh grid and never touch their inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Grid {
    /// Create an empty grid where no cell is used
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(4);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn position(&self, x: usize, y: usize) -> (usize, u32) {
        let index = y * self.width + x;
        (index >> 2, ((index & 3) << 1) as u32)
    }

    /// Set the value at (x, y) and mark the cell used. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte_index, shift) = self.position(x, y);
        let mask = 0b11 << shift;
        let bits = ((value as u8) << shift) | (1 << (shift + 1));
        self.data[byte_index] = (self.data[byte_index] & !mask) | bits;
    }

    /// Get the value bit at (x, y); false outside the grid or on unused cells
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte_index, shift) = self.position(x, y);
        (self.data[byte_index] >> shift) & 0b11 == 0b11
    }

    /// Whether (x, y) has been written
    pub fn used(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte_index, shift) = self.position(x, y);
        (self.data[byte_index] >> (shift + 1)) & 1 == 1
    }

    /// Iterate the coordinates of used cells in row-major order.
    ///
    /// `only` filters by value: `Some(true)` yields dark cells, `Some(false)`
    /// light ones, `None` every used cell.
    pub fn tiles(&self, only: Option<bool>) -> Tiles<'_> {
        Tiles {
            grid: self,
            index: 0,
            only,
        }
    }

    /// Number of used cells
    pub fn count_used(&self) -> usize {
        self.data
            .iter()
            .map(|b| (b & 0b1010_1010).count_ones() as usize)
            .sum()
    }

    /// Raw packed storage
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overlay grids into a new grid sized to the largest input.
    ///
    /// A cell is used when any input uses it. Dark wins: the result is dark
    /// when any input that uses the cell is dark, regardless of order.
    pub fn union(grids: &[&Grid]) -> Grid {
        let width = grids.iter().map(|g| g.width).max().unwrap_or(0);
        let height = grids.iter().map(|g| g.height).max().unwrap_or(0);
        let mut result = Grid::new(width, height);
        for grid in grids {
            for (x, y) in grid.tiles(None) {
                if !result.get(x, y) {
                    result.set(x, y, grid.get(x, y));
                }
            }
        }
        result
    }

    /// Copy of `self` without the cells used by any of `others`
    pub fn erase(&self, others: &[&Grid]) -> Grid {
        let mut result = Grid::new(self.width, self.height);
        for (x, y) in self.tiles(None) {
            if !others.iter().any(|g| g.used(x, y)) {
                result.set(x, y, self.get(x, y));
            }
        }
        result
    }

    /// Copy of `self` restricted to cells used by every one of `others`
    pub fn intersect(&self, others: &[&Grid]) -> Grid {
        let mut result = Grid::new(self.width, self.height);
        for (x, y) in self.tiles(None) {
            if others.iter().all(|g| g.used(x, y)) {
                result.set(x, y, self.get(x, y));
            }
        }
        result
    }

    /// Copy of `self` with the value of every used cell flipped
    pub fn invert(&self) -> Grid {
        let mut result = Grid::new(self.width, self.height);
        for (x, y) in self.tiles(None) {
            result.set(x, y, !self.get(x, y));
        }
        result
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Iterator over used cells of a [`Grid`], see [`Grid::tiles`]
pub struct Tiles<'a> {
    grid: &'a Grid,
    index: usize,
    only: Option<bool>,
}

impl Iterator for Tiles<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.grid.width * self.grid.height;
        while self.index < total {
            // Skip four empty cells at a time
            if self.index & 3 == 0 && self.grid.data[self.index >> 2] == 0 {
                self.index += 4;
                continue;
            }
            let index = self.index;
            self.index += 1;

            let byte = self.grid.data[index >> 2];
            let shift = (index & 3) << 1;
            if (byte >> (shift + 1)) & 1 == 0 {
                continue;
            }
            let is_on = (byte >> shift) & 1 == 1;
            if self.only.is_none_or(|want| want == is_on) {
                return Some((index % self.grid.width, index / self.grid.width));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(5, 5);
        grid.set(0, 0, true);
        grid.set(1, 1, false);
        grid.set(2, 2, true);
        grid
    }

    #[test]
    fn test_grid_set_get() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);

        grid.set(1, 1, true);
        assert!(grid.get(1, 1));
        assert!(!grid.get(0, 0));

        grid.set(1, 1, false);
        assert!(!grid.get(1, 1));
        assert!(grid.used(1, 1));
    }

    #[test]
    fn test_fresh_grid_is_unused() {
        let grid = Grid::new(13, 7);
        for y in 0..7 {
            for x in 0..13 {
                assert!(!grid.used(x, y));
                assert!(!grid.get(x, y));
            }
        }
        assert_eq!(grid.count_used(), 0);
        assert_eq!(grid.tiles(None).count(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        grid.set(3, 0, true); // Should not panic
        grid.set(0, 3, true);
        assert!(!grid.get(3, 0));
        assert!(!grid.used(0, 3));
        assert_eq!(grid.count_used(), 0);
    }

    #[test]
    fn test_tiles_filters() {
        let grid = sample_grid();
        let used: Vec<_> = grid.tiles(None).collect();
        assert_eq!(used, vec![(0, 0), (1, 1), (2, 2)]);

        let on: Vec<_> = grid.tiles(Some(true)).collect();
        assert_eq!(on, vec![(0, 0), (2, 2)]);

        let off: Vec<_> = grid.tiles(Some(false)).collect();
        assert_eq!(off, vec![(1, 1)]);
    }

    #[test]
    fn test_tiles_sparse_large_grid() {
        let mut grid = Grid::new(1000, 1000);
        grid.set(999, 999, true);
        grid.set(3, 500, false);
        let used: Vec<_> = grid.tiles(None).collect();
        assert_eq!(used, vec![(3, 500), (999, 999)]);
    }

    #[test]
    fn test_union_dark_wins() {
        let mut g1 = Grid::new(3, 3);
        g1.set(0, 0, true);
        g1.set(1, 1, false);

        let mut g2 = Grid::new(3, 3);
        g2.set(1, 1, true);
        g2.set(2, 2, true);

        let combined = Grid::union(&[&g1, &g2]);
        assert!(combined.get(0, 0));
        assert!(combined.get(1, 1));
        assert!(combined.get(2, 2));
        assert!(combined.used(0, 0));
        assert!(combined.used(1, 1));
        assert!(combined.used(2, 2));
        assert!(!combined.used(0, 2));

        // Order does not matter for the result
        assert_eq!(Grid::union(&[&g2, &g1]), combined);
        // Inputs untouched
        assert!(!g1.get(1, 1));
    }

    #[test]
    fn test_union_takes_largest_dimensions() {
        let small = Grid::new(2, 2);
        let mut wide = Grid::new(6, 3);
        wide.set(5, 2, true);
        let combined = Grid::union(&[&small, &wide]);
        assert_eq!((combined.width(), combined.height()), (6, 3));
        assert!(combined.get(5, 2));
    }

    #[test]
    fn test_erase_and_intersect() {
        let grid = sample_grid();
        let mut mask = Grid::new(5, 5);
        mask.set(1, 1, true);
        mask.set(4, 4, true);

        let erased = grid.erase(&[&mask]);
        assert_eq!(erased.tiles(None).collect::<Vec<_>>(), vec![(0, 0), (2, 2)]);

        let kept = grid.intersect(&[&mask]);
        assert_eq!(kept.tiles(None).collect::<Vec<_>>(), vec![(1, 1)]);
        // Value comes from the original, not from the mask
        assert!(!kept.get(1, 1));
    }

    #[test]
    fn test_invert() {
        let inverted = sample_grid().invert();
        assert!(!inverted.get(0, 0));
        assert!(inverted.get(1, 1));
        assert!(!inverted.used(3, 3));
    }
}
