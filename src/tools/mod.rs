use crate::error::{QrError, Result};
use crate::models::Grid;

/// Render a grid as terminal text, two modules per character cell.
///
/// Dark modules are drawn as filled halves of block characters, surrounded
/// by `quiet_zone` light modules on every side.
pub fn render_text(grid: &Grid, quiet_zone: usize) -> String {
    let width = grid.width() + 2 * quiet_zone;
    let height = grid.height() + 2 * quiet_zone;
    let dark = |x: usize, y: usize| {
        x >= quiet_zone
            && y >= quiet_zone
            && grid.get(x - quiet_zone, y - quiet_zone)
    };

    let mut out = String::with_capacity((width + 1) * height.div_ceil(2) * 3);
    for y in (0..height).step_by(2) {
        for x in 0..width {
            let ch = match (dark(x, y), dark(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

/// Lower-case hex without separators
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse hex, ignoring whitespace
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(QrError::InvalidOptions(format!(
            "odd number of hex digits: {}",
            digits.len()
        )));
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair)
                .map_err(|_| QrError::InvalidOptions("non-ascii hex input".to_string()))?;
            u8::from_str_radix(s, 16)
                .map_err(|_| QrError::InvalidOptions(format!("invalid hex byte {s:?}")))
        })
        .collect()
}
