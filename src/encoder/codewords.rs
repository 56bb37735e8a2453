use tracing::debug;

use crate::encoder::bits::BitBuffer;
use crate::encoder::optimizer::Strategy;
use crate::encoder::reed_solomon::{compute_divisor, compute_remainder};
use crate::encoder::segment::{Segment, split_into_segments};
use crate::encoder::tables::{
    capacity_bits, ec_block_info, num_data_codewords, num_raw_codewords,
};
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Version};

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Concatenate mode indicator, count field and payload of every segment
pub fn serialize(segments: &[Segment], version: Version) -> Result<BitBuffer> {
    let total: usize = segments
        .iter()
        .map(|s| s.mode.header_bits(version) as usize + s.data.len())
        .sum();
    let mut out = BitBuffer::with_capacity(total);
    for segment in segments {
        out.write_bits(segment.mode.mode_bits(), 4)?;
        out.write_bits(
            segment.num_chars as u32,
            segment.mode.char_count_bits(version),
        )?;
        out.append(&segment.data);
    }
    Ok(out)
}

/// Serialize `text` along `strategy`, pad to capacity, then add parity
/// and interleave
pub fn construct_codewords(
    text: &str,
    strategy: &Strategy,
    version: Version,
    ecl: ECLevel,
) -> Result<Vec<u8>> {
    let segments = split_into_segments(text, &strategy.steps)?;
    let data = pad_to_capacity(serialize(&segments, version)?, version, ecl)?;
    add_ecc_and_interleave(&data, version, ecl)
}

/// Terminator, byte alignment and alternating pad bytes up to the data
/// capacity of (version, ecl)
pub fn pad_to_capacity(mut bits: BitBuffer, version: Version, ecl: ECLevel) -> Result<Vec<u8>> {
    let capacity = capacity_bits(version, ecl);
    if bits.len() > capacity {
        return Err(QrError::DataTooLong {
            needed_bits: bits.len(),
            capacity_bits: capacity,
        });
    }
    bits.write_zeros((capacity - bits.len()).min(4));
    bits.write_zeros((8 - bits.len() % 8) % 8);

    let mut bytes = bits.into_bytes();
    for pad in PAD_BYTES.iter().cycle() {
        if bytes.len() * 8 >= capacity {
            break;
        }
        bytes.push(*pad);
    }
    Ok(bytes)
}

/// Split data codewords into Reed-Solomon blocks, append each block's
/// parity and interleave the result
pub fn add_ecc_and_interleave(data: &[u8], version: Version, ecl: ECLevel) -> Result<Vec<u8>> {
    let expected = num_data_codewords(version, ecl);
    if data.len() != expected {
        return Err(QrError::EncodingInvariantViolation(format!(
            "{} data codewords for {expected} slots at {version}-{ecl:?}",
            data.len()
        )));
    }

    let info = ec_block_info(version, ecl);
    let raw_codewords = num_raw_codewords(version);
    let num_short_blocks = info.num_blocks - raw_codewords % info.num_blocks;
    let short_block_len = raw_codewords / info.num_blocks;
    let short_data_len = short_block_len
        .checked_sub(info.ecc_per_block)
        .ok_or_else(|| {
            QrError::EncodingInvariantViolation(format!(
                "block of {short_block_len} codewords cannot hold {} parity codewords",
                info.ecc_per_block
            ))
        })?;
    debug!(
        version = %version,
        blocks = info.num_blocks,
        short_blocks = num_short_blocks,
        ecc_per_block = info.ecc_per_block,
        "block layout"
    );

    let divisor = compute_divisor(info.ecc_per_block)?;
    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for i in 0..info.num_blocks {
        let len = short_data_len + usize::from(i >= num_short_blocks);
        let chunk = data.get(offset..offset + len).ok_or_else(|| {
            QrError::EncodingInvariantViolation(format!("block {i} runs past the data"))
        })?;
        offset += len;

        let mut block = Vec::with_capacity(short_block_len + 1);
        block.extend_from_slice(chunk);
        let ecc = compute_remainder(chunk, &divisor);
        // Placeholder keeps parity aligned with the long blocks
        if i < num_short_blocks {
            block.push(0);
        }
        block.extend_from_slice(&ecc);
        blocks.push(block);
    }
    if offset != data.len() {
        return Err(QrError::EncodingInvariantViolation(format!(
            "blocks consumed {offset} of {} data codewords",
            data.len()
        )));
    }

    let mut result = Vec::with_capacity(raw_codewords);
    for i in 0..=short_block_len {
        for (j, block) in blocks.iter().enumerate() {
            if i == short_data_len && j < num_short_blocks {
                continue;
            }
            result.push(block[i]);
        }
    }
    if result.len() != raw_codewords {
        return Err(QrError::EncodingInvariantViolation(format!(
            "interleaved {} codewords, symbol holds {raw_codewords}",
            result.len()
        )));
    }
    Ok(result)
}
