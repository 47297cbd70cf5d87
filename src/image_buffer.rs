use alloc::vec::Vec;

use crate::color_transform::{luma_to_ycbcr_row, pad_row, rgb_to_luma_row, rgb_to_ycbcr_row};
use crate::encoder::ColorType;
use crate::error::EncoderResult;

/// One MCU row worth of converted scanlines
///
/// Every line holds `aligned_width` interleaved pixels of the working color space
/// (1 byte for luma only output, 3 bytes for YCbCr). Pixels beyond the image width
/// repeat the last image pixel of the line.
pub(crate) struct McuRows {
    data: Vec<u8>,
    line_len: usize,
    num_lines: usize,
    width: usize,
    bytes_per_pixel: usize,
    filled: usize,
}

impl McuRows {
    pub fn new(
        width: usize,
        aligned_width: usize,
        num_lines: usize,
        bytes_per_pixel: usize,
    ) -> EncoderResult<McuRows> {
        let line_len = aligned_width * bytes_per_pixel;

        let mut data = Vec::new();
        data.try_reserve_exact(line_len * num_lines)?;
        data.resize(line_len * num_lines, 0);

        Ok(McuRows {
            data,
            line_len,
            num_lines,
            width,
            bytes_per_pixel,
            filled: 0,
        })
    }

    #[inline(always)]
    fn line(&self, index: usize) -> &[u8] {
        &self.data[index * self.line_len..(index + 1) * self.line_len]
    }

    /// Number of lines loaded since the last reset
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.num_lines
    }

    pub fn reset(&mut self) {
        self.filled = 0;
    }

    /// Converts one source scanline into the next free line
    ///
    /// `scanline` must hold at least `width` pixels of `color_type`.
    pub fn load_scanline(&mut self, scanline: &[u8], color_type: ColorType) {
        debug_assert!(!self.is_full());

        let start = self.filled * self.line_len;
        let line = &mut self.data[start..start + self.line_len];

        let src = &scanline[..self.width * color_type.get_bytes_per_pixel()];

        match (color_type, self.bytes_per_pixel) {
            (ColorType::Rgb, 3) => rgb_to_ycbcr_row(src, line),
            (ColorType::Rgb, _) => rgb_to_luma_row(src, line),
            (ColorType::Luma, 3) => luma_to_ycbcr_row(src, line),
            (ColorType::Luma, _) => line[..self.width].copy_from_slice(src),
        }

        pad_row(line, self.width, self.bytes_per_pixel);

        self.filled += 1;
    }

    /// Fills the remaining lines with copies of the last loaded one
    pub fn pad_partial(&mut self) {
        if self.filled == 0 {
            return;
        }

        let last = (self.filled - 1) * self.line_len;
        for index in self.filled..self.num_lines {
            self.data
                .copy_within(last..last + self.line_len, index * self.line_len);
        }

        self.filled = self.num_lines;
    }

    /// Level shifted 8x8 block of component `c` at block position `x`, `y` of the MCU row
    pub fn load_block(&self, block: &mut [i32; 64], x: usize, y: usize, c: usize) {
        let bpp = self.bytes_per_pixel;
        let start = x * 8 * bpp + c;

        for (i, row) in block.chunks_exact_mut(8).enumerate() {
            let src = &self.line(y * 8 + i)[start..];

            for (j, value) in row.iter_mut().enumerate() {
                *value = i32::from(src[j * bpp]) - 128;
            }
        }
    }

    /// Chroma block of a 16x8 MCU, averaging horizontal pairs
    ///
    /// The rounding bias alternates between 0 and 2 across a row and the order flips
    /// on every row.
    pub fn load_block_h2v1(&self, block: &mut [i32; 64], mcu_x: usize, c: usize) {
        let bpp = self.bytes_per_pixel;
        let start = mcu_x * 16 * bpp + c;

        let (mut a, mut b) = (0, 2);

        for (i, row) in block.chunks_exact_mut(8).enumerate() {
            let src = &self.line(i)[start..];

            for (j, value) in row.iter_mut().enumerate() {
                let bias = if j & 1 == 0 { a } else { b };
                let sum = i32::from(src[2 * j * bpp]) + i32::from(src[(2 * j + 1) * bpp]);

                *value = ((sum + bias) >> 1) - 128;
            }

            core::mem::swap(&mut a, &mut b);
        }
    }

    /// Chroma block of a 16x16 MCU, averaging 2x2 squares
    ///
    /// Same bias pattern as [`McuRows::load_block_h2v1`].
    pub fn load_block_h2v2(&self, block: &mut [i32; 64], mcu_x: usize, c: usize) {
        let bpp = self.bytes_per_pixel;
        let start = mcu_x * 16 * bpp + c;

        let (mut a, mut b) = (0, 2);

        for (i, row) in block.chunks_exact_mut(8).enumerate() {
            let src1 = &self.line(2 * i)[start..];
            let src2 = &self.line(2 * i + 1)[start..];

            for (j, value) in row.iter_mut().enumerate() {
                let bias = if j & 1 == 0 { a } else { b };
                let left = 2 * j * bpp;
                let right = (2 * j + 1) * bpp;
                let sum = i32::from(src1[left])
                    + i32::from(src1[right])
                    + i32::from(src2[left])
                    + i32::from(src2[right]);

                *value = ((sum + bias) >> 2) - 128;
            }

            core::mem::swap(&mut a, &mut b);
        }
    }
}
