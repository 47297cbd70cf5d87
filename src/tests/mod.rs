// Whole stream tests shared by all modules.



use alloc::vec::Vec;

use crate::encoder::{Encoder, EncoderParams, Subsampling};

pub(crate) fn params(quality: u8, subsampling: Subsampling) -> EncoderParams {
    EncoderParams {
        quality,
        subsampling,
        no_chroma_discrimination: false,
    }
}

/// Encodes `data` row by row into a new vector
pub(crate) fn encode_rows(
    data: &[u8],
    width: u16,
    height: u16,
    channels: u8,
    params: EncoderParams,
) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder
        .init(Vec::new(), width, height, channels, params)
        .unwrap();

    let stride = usize::from(width) * usize::from(channels);
    for row in data.chunks_exact(stride).take(usize::from(height)) {
        encoder.feed(Some(row)).unwrap();
    }
    encoder.feed(None).unwrap();

    encoder.deinit().unwrap()
}

pub(crate) fn rgb_35x21() -> Vec<u8> {
    let mut data = Vec::with_capacity(35 * 21 * 3);
    for y in 0..21usize {
        for x in 0..35usize {
            data.push((x * 7) as u8);
            data.push((y * 11) as u8);
            data.push(((x * y) & 255) as u8);
        }
    }
    data
}

pub(crate) fn gray_35x21() -> Vec<u8> {
    let mut data = Vec::with_capacity(35 * 21);
    for y in 0..21usize {
        for x in 0..35usize {
            data.push(((x * 5 + y * 3) & 255) as u8);
        }
    }
    data
}

/// 64x48 RGB noise from a linear congruential generator
pub(crate) fn noise_64x48() -> Vec<u8> {
    let mut state: u32 = 12345;
    (0..64 * 48 * 3)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            (state >> 16) as u8
        })
        .collect()
}
