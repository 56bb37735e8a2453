//! Module grids derived from a [`QRCode`]
//!
//! Every grid is recomputed from the symbol's version, ECL, mask and
//! codewords; nothing is cached.

use crate::encoder::function_patterns::{
    draw_alignment, draw_finders, draw_format, draw_timing, draw_version,
};
use crate::encoder::placement::place_data;
use crate::models::{Grid, QRCode};

impl QRCode {
    fn blank(&self) -> Grid {
        Grid::new(self.size(), self.size())
    }

    pub fn finder_grid(&self) -> Grid {
        let mut grid = self.blank();
        draw_finders(&mut grid, self.size());
        grid
    }

    pub fn timing_grid(&self) -> Grid {
        let mut grid = self.blank();
        draw_timing(&mut grid, self.size());
        grid
    }

    pub fn alignment_grid(&self) -> Grid {
        let mut grid = self.blank();
        draw_alignment(&mut grid, self.version);
        grid
    }

    /// Format information and the dark module
    pub fn format_grid(&self) -> Grid {
        let mut grid = self.blank();
        draw_format(
            &mut grid,
            self.size(),
            self.error_correction,
            self.mask_pattern,
        );
        grid
    }

    /// Empty below version 7
    pub fn version_grid(&self) -> Grid {
        let mut grid = self.blank();
        draw_version(&mut grid, self.size(), self.version);
        grid
    }

    /// Every module that is not available for data, format included
    pub fn functional_grid(&self) -> Grid {
        Grid::union(&[
            &self.finder_grid(),
            &self.timing_grid(),
            &self.alignment_grid(),
            &self.format_grid(),
            &self.version_grid(),
        ])
    }

    /// Masked data modules only
    pub fn data_grid(&self) -> Grid {
        self.place(true)
    }

    /// Data modules before masking
    pub fn raw_data_grid(&self) -> Grid {
        self.place(false)
    }

    fn place(&self, masked: bool) -> Grid {
        let reserved = self.functional_grid();
        let mut grid = self.blank();
        let mask = masked.then_some(self.mask_pattern);
        place_data(&mut grid, &reserved, &self.codewords, mask);
        grid
    }

    /// The complete symbol
    pub fn grid(&self) -> Grid {
        let reserved = self.functional_grid();
        let mut grid = reserved.clone();
        place_data(&mut grid, &reserved, &self.codewords, Some(self.mask_pattern));
        grid
    }
}
