use alloc::vec::Vec;

use crate::error::{EncoderResult, EncodingError};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CodingClass {
    Dc = 0,
    Ac = 1,
}

// Tables from Annex K of ITU-T T.81

static DEFAULT_LUMA_DC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

static DEFAULT_LUMA_DC_VALUES: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
];

static DEFAULT_CHROMA_DC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x03, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
];

static DEFAULT_CHROMA_DC_VALUES: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
];

static DEFAULT_LUMA_AC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05, 0x04, 0x04, 0x00, 0x00, 0x01, 0x7D,
];

static DEFAULT_LUMA_AC_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7,
    0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5,
    0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
    0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

static DEFAULT_CHROMA_AC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x02, 0x01, 0x02, 0x04, 0x04, 0x03, 0x04, 0x07, 0x05, 0x04, 0x04, 0x00, 0x01, 0x02, 0x77,
];

static DEFAULT_CHROMA_AC_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0,
    0x15, 0x62, 0x72, 0xD1, 0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
    0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5,
    0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3,
    0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
    0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

/// Canonical Huffman code built from a bit length histogram and its symbol list
///
/// The lookup is indexed by symbol and only covers symbols up to the largest one in
/// the list. Symbols without a code map to a zero length entry.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    lookup_table: Vec<(u8, u16)>,
    length: [u8; 16],
    values: Vec<u8>,
}

impl HuffmanTable {
    /// `length[i]` is the number of codes of length `i + 1`
    pub fn new(length: &[u8; 16], values: &[u8]) -> EncoderResult<HuffmanTable> {
        let num_codes: usize = length.iter().map(|&l| usize::from(l)).sum();

        if num_codes > 256 || num_codes > values.len() {
            return Err(EncodingError::InvalidHuffmanTable);
        }

        let values = &values[..num_codes];
        let max_value = values.iter().copied().max().map_or(0, usize::from);

        let mut lookup_table = Vec::new();
        lookup_table.try_reserve_exact(max_value + 1)?;
        lookup_table.resize(max_value + 1, (0u8, 0u16));

        let mut owned_values = Vec::new();
        owned_values.try_reserve_exact(num_codes)?;
        owned_values.extend_from_slice(values);

        let mut code = 0u32;
        let mut symbols = values.iter();

        for (i, &count) in length.iter().enumerate() {
            let size = i as u8 + 1;

            for _ in 0..count {
                if code >= (1 << size) {
                    return Err(EncodingError::InvalidHuffmanTable);
                }

                // num_codes was checked against the symbol list above
                if let Some(&symbol) = symbols.next() {
                    lookup_table[usize::from(symbol)] = (size, code as u16);
                }
                code += 1;
            }

            code <<= 1;
        }

        Ok(HuffmanTable {
            lookup_table,
            length: *length,
            values: owned_values,
        })
    }

    pub fn default_luma_dc() -> EncoderResult<HuffmanTable> {
        HuffmanTable::new(&DEFAULT_LUMA_DC_CODE_LENGTHS, &DEFAULT_LUMA_DC_VALUES)
    }

    pub fn default_luma_ac() -> EncoderResult<HuffmanTable> {
        HuffmanTable::new(&DEFAULT_LUMA_AC_CODE_LENGTHS, &DEFAULT_LUMA_AC_VALUES)
    }

    pub fn default_chroma_dc() -> EncoderResult<HuffmanTable> {
        HuffmanTable::new(&DEFAULT_CHROMA_DC_CODE_LENGTHS, &DEFAULT_CHROMA_DC_VALUES)
    }

    pub fn default_chroma_ac() -> EncoderResult<HuffmanTable> {
        HuffmanTable::new(&DEFAULT_CHROMA_AC_CODE_LENGTHS, &DEFAULT_CHROMA_AC_VALUES)
    }

    /// Code length and code for a symbol; `(0, 0)` if the table has no code for it
    #[inline]
    pub fn get_for_value(&self, value: u8) -> (u8, u16) {
        self.lookup_table
            .get(usize::from(value))
            .copied()
            .unwrap_or_default()
    }

    pub fn length(&self) -> &[u8; 16] {
        &self.length
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::HuffmanTable;
    use crate::error::EncodingError;

    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn codes(table: &HuffmanTable) -> Vec<(u8, u16)> {
        table
            .values()
            .iter()
            .map(|&v| table.get_for_value(v))
            .collect()
    }

    fn is_prefix(a: (u8, u16), b: (u8, u16)) -> bool {
        a.0 <= b.0 && (b.1 >> (b.0 - a.0)) == a.1
    }

    fn assert_prefix_free(codes: &[(u8, u16)]) {
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!is_prefix(a, b), "{:?} is a prefix of {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_luma_dc_codes() {
        let table = HuffmanTable::default_luma_dc().unwrap();

        assert_eq!(table.get_for_value(0), (2, 0b00));
        assert_eq!(table.get_for_value(1), (3, 0b010));
        assert_eq!(table.get_for_value(5), (3, 0b110));
        assert_eq!(table.get_for_value(6), (4, 0b1110));
        assert_eq!(table.get_for_value(11), (9, 0b1_1111_1110));

        // beyond the largest symbol
        assert_eq!(table.get_for_value(12), (0, 0));
    }

    #[test]
    fn test_luma_ac_codes() {
        let table = HuffmanTable::default_luma_ac().unwrap();

        assert_eq!(table.values().len(), 162);
        assert_eq!(table.get_for_value(0x01), (2, 0b00));
        assert_eq!(table.get_for_value(0x00), (4, 0b1010));
        assert_eq!(table.get_for_value(0xF0), (11, 0b111_1111_1001));
        // not part of the standard table
        assert_eq!(table.get_for_value(0x0B), (0, 0));
    }

    #[test]
    fn test_default_tables_are_prefix_free() {
        for table in [
            HuffmanTable::default_luma_dc().unwrap(),
            HuffmanTable::default_luma_ac().unwrap(),
            HuffmanTable::default_chroma_dc().unwrap(),
            HuffmanTable::default_chroma_ac().unwrap(),
        ] {
            assert_prefix_free(&codes(&table));
        }
    }

    #[test]
    fn test_invalid_tables() {
        // three codes of length one
        let mut length = [0u8; 16];
        length[0] = 3;
        assert!(matches!(
            HuffmanTable::new(&length, &[0, 1, 2]),
            Err(EncodingError::InvalidHuffmanTable)
        ));

        // more codes than symbols
        let mut length = [0u8; 16];
        length[1] = 2;
        assert!(matches!(
            HuffmanTable::new(&length, &[0]),
            Err(EncodingError::InvalidHuffmanTable)
        ));
    }

    /// Bit length histograms that satisfy the Kraft inequality
    fn valid_lengths() -> impl Strategy<Value = [u8; 16]> {
        proptest::collection::vec(0u8..=255, 16).prop_map(|wanted| {
            let mut length = [0u8; 16];
            let mut available = 2u32;
            let mut total = 0u32;

            for (i, &w) in wanted.iter().enumerate() {
                let count = u32::from(w).min(available).min(256 - total);
                length[i] = count as u8;
                total += count;
                available = (available - count) * 2;
            }
            length
        })
    }

    proptest! {
        #[test]
        fn canonical_codes_are_prefix_free(length in valid_lengths(), seed in any::<u64>()) {
            let num_codes: usize = length.iter().map(|&l| usize::from(l)).sum();

            // distinct symbols in a seed dependent order
            let mut values: Vec<u8> = (0..=255u8).collect();
            let mut state = seed;
            for i in (1..values.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                values.swap(i, (state >> 33) as usize % (i + 1));
            }
            values.truncate(num_codes);

            let table = HuffmanTable::new(&length, &values).unwrap();
            let codes = codes(&table);

            let mut histogram = [0u8; 16];
            for &(size, _) in &codes {
                prop_assert!((1..=16).contains(&size));
                histogram[usize::from(size) - 1] += 1;
            }
            prop_assert_eq!(histogram, length);

            assert_prefix_free(&codes);
        }
    }
}
