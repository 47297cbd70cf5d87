use crate::writer::ZIGZAG;

/// # Quantization tables used for encoding
///
/// Sample quantization tables given in Annex K (Clause K.1) of Recommendation ITU-T T.81 (1992) | ISO/IEC 10918-1:1994.
/// Stored in natural (row major) order.
static DEFAULT_LUMA_TABLE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69,
    56, 14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81,
    104, 113, 92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

static DEFAULT_CHROMA_TABLE: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99,
    99, 47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

/// Quality scaled quantization table, entries in 1..=255
#[derive(Debug, Clone)]
pub struct QuantizationTable {
    table: [u16; 64],
}

impl QuantizationTable {
    fn get_scale_factor(quality: u8) -> u32 {
        let quality = quality.clamp(1, 100) as u32;
        if quality < 50 {
            5000 / quality
        } else {
            200 - quality * 2
        }
    }

    fn get_with_quality(table: &[u16; 64], quality: u8) -> [u16; 64] {
        let scale = QuantizationTable::get_scale_factor(quality);

        let mut q_table = [1u16; 64];

        for (i, &v) in table.iter().enumerate() {
            let v = (u32::from(v) * scale + 50) / 100;
            q_table[i] = v.clamp(1, 255) as u16;
        }
        q_table
    }

    /// Scales the Annex K luma or chroma table to `quality`
    pub fn new_with_quality(quality: u8, is_luma: bool) -> QuantizationTable {
        let base = if is_luma {
            &DEFAULT_LUMA_TABLE
        } else {
            &DEFAULT_CHROMA_TABLE
        };

        QuantizationTable {
            table: QuantizationTable::get_with_quality(base, quality),
        }
    }

    /// Divisor for the coefficient at natural order `index`
    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        self.table[index]
    }

    /// Quantizes a DCT output block given in natural order
    ///
    /// The result is in zig-zag order. Magnitudes are rounded half up, then the sign is
    /// restored.
    pub fn quantize_block(&self, block: &[i32; 64], q_block: &mut [i16; 64]) {
        for (i, out) in q_block.iter_mut().enumerate() {
            let z = ZIGZAG[i] as usize & 0x3F;
            let value = block[z];
            let divisor = i32::from(self.table[z]);

            let magnitude = (value.abs() + (divisor >> 1)) / divisor;

            *out = if value < 0 {
                -magnitude as i16
            } else {
                magnitude as i16
            };
        }
    }
}
