use crate::encoder::bch::{format_bits, version_bits};
use crate::models::{ECLevel, Grid, MaskPattern, Version};

/// Three finder patterns with their light separators.
///
/// Each occupies an 8x8 footprint: the 7x7 ring-and-core plus the
/// separator row and column facing the symbol interior.
pub fn draw_finders(grid: &mut Grid, size: usize) {
    for r in 0..8 {
        for c in 0..8 {
            let ring = (3i32 - r as i32).abs().max((3i32 - c as i32).abs());
            let on = ring != 2 && r != 7 && c != 7;
            grid.set(r, c, on);
            grid.set(size - r - 1, c, on);
            grid.set(r, size - c - 1, on);
        }
    }
}

/// Alternating modules on row 6 and column 6 between the finders
pub fn draw_timing(grid: &mut Grid, size: usize) {
    for i in 8..=size - 8 {
        let on = i % 2 == 0;
        grid.set(6, i, on);
        grid.set(i, 6, on);
    }
}

/// Alignment pattern centers for a given version, ascending.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + 4).div_ceil(num_align * 2 - 2) * 2
    };

    // Evenly spaced back from the far edge, first one pinned at 6
    let last = version.size() - 7;
    let mut positions = Vec::with_capacity(num_align);
    positions.push(6);
    positions.extend((0..num_align - 1).rev().map(|k| last - k * step));
    positions
}

/// 5x5 alignment patterns at every center pair not overlapping a finder
pub fn draw_alignment(grid: &mut Grid, version: Version) {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    for (i, &cx) in positions.iter().enumerate() {
        for (j, &cy) in positions.iter().enumerate() {
            let on_finder = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if on_finder {
                continue;
            }
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let x = (cx as i32 + dx) as usize;
                    let y = (cy as i32 + dy) as usize;
                    grid.set(x, y, dx.abs().max(dy.abs()) != 1);
                }
            }
        }
    }
}

/// Both copies of the format information plus the dark module
pub fn draw_format(grid: &mut Grid, size: usize, ec_level: ECLevel, mask: MaskPattern) {
    let bits = format_bits(ec_level, mask);
    let bit = |i: usize| (bits >> i) & 1 == 1;

    // Around the top-left finder
    for i in 0..=5 {
        grid.set(8, i, bit(i));
    }
    grid.set(8, 7, bit(6));
    grid.set(8, 8, bit(7));
    grid.set(7, 8, bit(8));
    for i in 9..15 {
        grid.set(14 - i, 8, bit(i));
    }

    // Split between the other two finders
    for i in 0..8 {
        grid.set(size - 1 - i, 8, bit(i));
    }
    for i in 8..15 {
        grid.set(8, size - 15 + i, bit(i));
    }

    grid.set(8, size - 8, true);
}

/// Two transposed 6x3 copies of the version information (version 7+)
pub fn draw_version(grid: &mut Grid, size: usize, version: Version) {
    if version.number() < 7 {
        return;
    }
    let bits = version_bits(version);
    for i in 0..18 {
        let on = (bits >> i) & 1 == 1;
        let a = size - 11 + i % 3;
        let b = i / 3;
        grid.set(a, b, on);
        grid.set(b, a, on);
    }
}
