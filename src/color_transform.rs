// Fixed point BT.601 full range conversion, 16 fractional bits

use rgb::FromSlice;

const YR: i32 = 19595;
const YG: i32 = 38470;
const YB: i32 = 7471;

const CB_R: i32 = -11059;
const CB_G: i32 = -21709;
const CB_B: i32 = 32768;

const CR_R: i32 = 32768;
const CR_G: i32 = -27439;
const CR_B: i32 = -5329;

const ROUNDING: i32 = 32768;

#[inline(always)]
fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[inline(always)]
pub(crate) fn rgb_to_luma_pixel(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    ((r * YR + g * YG + b * YB + ROUNDING) >> 16) as u8
}

#[inline(always)]
pub(crate) fn rgb_to_ycbcr_pixel(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let y = rgb_to_luma_pixel(r, g, b);

    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let cb = clamp(128 + ((r * CB_R + g * CB_G + b * CB_B + ROUNDING) >> 16));
    let cr = clamp(128 + ((r * CR_R + g * CR_G + b * CR_B + ROUNDING) >> 16));

    (y, cb, cr)
}

/// Interleaved RGB to interleaved YCbCr, one output triple per input pixel
pub(crate) fn rgb_to_ycbcr_row(src: &[u8], dst: &mut [u8]) {
    for (pixel, out) in src.as_rgb().iter().zip(dst.chunks_exact_mut(3)) {
        let (y, cb, cr) = rgb_to_ycbcr_pixel(pixel.r, pixel.g, pixel.b);
        out[0] = y;
        out[1] = cb;
        out[2] = cr;
    }
}

/// Interleaved RGB to luma
pub(crate) fn rgb_to_luma_row(src: &[u8], dst: &mut [u8]) {
    for (pixel, out) in src.as_rgb().iter().zip(dst.iter_mut()) {
        *out = rgb_to_luma_pixel(pixel.r, pixel.g, pixel.b);
    }
}

/// Grayscale to interleaved YCbCr with neutral chroma
pub(crate) fn luma_to_ycbcr_row(src: &[u8], dst: &mut [u8]) {
    for (&y, out) in src.iter().zip(dst.chunks_exact_mut(3)) {
        out[0] = y;
        out[1] = 128;
        out[2] = 128;
    }
}

/// Replicates the last of `width` pixels up to the end of `row`
pub(crate) fn pad_row(row: &mut [u8], width: usize, bytes_per_pixel: usize) {
    let end = width * bytes_per_pixel;
    if width == 0 || end >= row.len() {
        return;
    }

    let (pixels, padding) = row.split_at_mut(end);
    let last = &pixels[end - bytes_per_pixel..];

    for chunk in padding.chunks_exact_mut(bytes_per_pixel) {
        chunk.copy_from_slice(last);
    }
}
