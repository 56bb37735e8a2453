use crate::encoder::bits::BitBuffer;
use crate::encoder::modes::Mode;
use crate::error::{QrError, Result};

/// A maximal run of characters sharing one mode, with its payload already
/// serialized (header excluded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub mode: Mode,
    pub text: String,
    /// Value of the character count field (bytes for byte mode)
    pub num_chars: usize,
    pub data: BitBuffer,
}

impl Segment {
    pub fn new(mode: Mode, text: &str) -> Result<Self> {
        let mut data = BitBuffer::new();
        mode.encode(text, &mut data)?;
        Ok(Self {
            mode,
            text: text.to_string(),
            num_chars: mode.char_count(text),
            data,
        })
    }
}

/// Collapse per-character modes into `(mode, char_len)` runs
pub fn mode_runs(steps: &[Mode]) -> Vec<(Mode, usize)> {
    let mut runs: Vec<(Mode, usize)> = Vec::new();
    for &mode in steps {
        match runs.last_mut() {
            Some((last, len)) if *last == mode => *len += 1,
            _ => runs.push((mode, 1)),
        }
    }
    runs
}

/// Cut `text` wherever the per-character mode in `steps` changes.
///
/// `steps` must hold one mode per character.
pub fn split_into_segments(text: &str, steps: &[Mode]) -> Result<Vec<Segment>> {
    let char_len = text.chars().count();
    if char_len != steps.len() {
        return Err(QrError::EncodingInvariantViolation(format!(
            "{} mode steps for {} characters",
            steps.len(),
            char_len
        )));
    }

    let mut segments = Vec::new();
    let mut rest = text;
    for (mode, len) in mode_runs(steps) {
        let split_at = rest
            .char_indices()
            .nth(len)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(split_at);
        segments.push(Segment::new(mode, head)?);
        rest = tail;
    }
    Ok(segments)
}
