use crate::error::{EncoderResult, EncodingError};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;

use byteorder::{BigEndian, ByteOrder};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Size of the internal output buffer handed to the sink in one call
pub(crate) const OUTPUT_BUFFER_SIZE: usize = 2048;

/// Natural order position of each zig-zag index
pub static ZIGZAG: [u8; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// A no_std alternative for `std::io::Write`
///
/// An implementation of a subset of `std::io::Write` necessary to use the encoder without `std`.
/// This trait is implemented for `std::io::Write` if the `std` feature is enabled.
///
/// A write either accepts the whole buffer or fails; the encoder gives up on the
/// stream after the first failure.
pub trait JfifWrite {
    /// Attempts to write an entire buffer into this write.
    ///
    /// # Errors
    ///
    /// Return an error if the data can't be written
    fn write_all(&mut self, buf: &[u8]) -> Result<(), EncodingError>;
}

#[cfg(not(feature = "std"))]
impl<W: JfifWrite + ?Sized> JfifWrite for &mut W {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), EncodingError> {
        (**self).write_all(buf)
    }
}

#[cfg(not(feature = "std"))]
impl JfifWrite for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), EncodingError> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write + ?Sized> JfifWrite for W {
    #[inline(always)]
    fn write_all(&mut self, buf: &[u8]) -> Result<(), EncodingError> {
        self.write_all(buf)?;
        Ok(())
    }
}

/// Buffered JFIF byte and bit writer
///
/// Bits are collected in a 24 bit window, most significant first. Every completed
/// 0xFF byte is followed by a stuffed 0x00.
pub(crate) struct JfifWriter<W: JfifWrite> {
    w: W,
    buffer: [u8; OUTPUT_BUFFER_SIZE],
    buffered: usize,
    bit_buffer: u32,
    bits_in: u32,
    bytes_written: usize,
}

impl<W: JfifWrite> JfifWriter<W> {
    pub fn new(w: W) -> Self {
        JfifWriter {
            w,
            buffer: [0; OUTPUT_BUFFER_SIZE],
            buffered: 0,
            bit_buffer: 0,
            bits_in: 0,
            bytes_written: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.w
    }

    /// Bytes handed to the sink so far
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Bytes waiting in the output buffer
    #[cfg(test)]
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    /// Hands all buffered bytes to the sink
    pub fn flush(&mut self) -> EncoderResult<()> {
        if self.buffered > 0 {
            let len = self.buffered;
            self.buffered = 0;
            self.w.write_all(&self.buffer[..len])?;
            self.bytes_written += len;
        }
        Ok(())
    }

    #[inline(always)]
    fn write_byte(&mut self, value: u8) -> EncoderResult<()> {
        self.buffer[self.buffered] = value;
        self.buffered += 1;

        if self.buffered == OUTPUT_BUFFER_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    pub fn write(&mut self, buf: &[u8]) -> EncoderResult<()> {
        for &b in buf {
            self.write_byte(b)?;
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> EncoderResult<()> {
        self.write_byte(value)
    }

    pub fn write_u16(&mut self, value: u16) -> EncoderResult<()> {
        let mut buf = [0u8; 2];
        BigEndian::write_u16(&mut buf, value);
        self.write(&buf)
    }

    /// Appends the `size` low bits of `bits`, which must not have higher bits set
    #[inline(always)]
    pub fn write_bits(&mut self, bits: u32, size: u8) -> EncoderResult<()> {
        debug_assert!(size <= 16);
        debug_assert!(bits < (1 << size));

        self.bits_in += u32::from(size);
        self.bit_buffer |= bits << (24 - self.bits_in);

        while self.bits_in >= 8 {
            let byte = (self.bit_buffer >> 16) as u8;
            self.write_byte(byte)?;
            if byte == 0xFF {
                self.write_byte(0x00)?;
            }

            self.bit_buffer = (self.bit_buffer << 8) & 0xFF_FFFF;
            self.bits_in -= 8;
        }

        Ok(())
    }

    /// Terminates the entropy coded segment
    ///
    /// Pads with a run of seven one bits; bits that still do not complete a byte are dropped.
    pub fn finish_scan(&mut self) -> EncoderResult<()> {
        self.write_bits(0x7F, 7)?;
        self.bit_buffer = 0;
        self.bits_in = 0;
        Ok(())
    }

    pub fn write_marker(&mut self, marker: Marker) -> EncoderResult<()> {
        self.write(&[0xFF, marker.into()])
    }

    pub fn write_segment(&mut self, marker: Marker, data: &[u8]) -> EncoderResult<()> {
        self.write_marker(marker)?;
        self.write_u16(data.len() as u16 + 2)?;
        self.write(data)?;

        Ok(())
    }

    #[inline]
    fn huffman_encode(&mut self, value: u8, table: &HuffmanTable) -> EncoderResult<()> {
        let (size, code) = table.get_for_value(value);
        debug_assert!(size > 0, "no Huffman code for symbol {:#04x}", value);
        self.write_bits(u32::from(code), size)
    }

    #[inline]
    fn huffman_encode_value(&mut self, size: u8, symbol: u8, value: u16, table: &HuffmanTable) -> EncoderResult<()> {
        self.huffman_encode(symbol, table)?;
        if size > 0 {
            self.write_bits(u32::from(value), size)?;
        }
        Ok(())
    }

    /// Entropy codes one quantized block given in zig-zag order
    ///
    /// Returns the block's DC value, the predictor for the next block of the component.
    pub fn write_block(
        &mut self,
        block: &[i16; 64],
        prev_dc: i16,
        dc_table: &HuffmanTable,
        ac_table: &HuffmanTable,
    ) -> EncoderResult<i16> {
        let dc = block[0];
        let diff = i32::from(dc) - i32::from(prev_dc);
        let (size, value) = get_code(diff);

        self.huffman_encode_value(size, size, value, dc_table)?;

        let mut zero_run = 0;

        for &coefficient in &block[1..] {
            if coefficient == 0 {
                zero_run += 1;
                continue;
            }

            while zero_run >= 16 {
                self.huffman_encode(0xF0, ac_table)?;
                zero_run -= 16;
            }

            let (size, value) = get_code(i32::from(coefficient));
            let symbol = (zero_run << 4) | size;

            self.huffman_encode_value(size, symbol, value, ac_table)?;

            zero_run = 0;
        }

        if zero_run > 0 {
            self.huffman_encode(0x00, ac_table)?;
        }

        Ok(dc)
    }
}

/// Magnitude category and value bits of a coefficient
///
/// Negative values are sent as the low bits of `value - 1`.
#[inline]
pub(crate) fn get_code(value: i32) -> (u8, u16) {
    let magnitude = value.unsigned_abs();
    let num_bits = (32 - magnitude.leading_zeros()) as u8;

    let bits = if value < 0 { value - 1 } else { value };
    let mask = (1u32 << num_bits) - 1;

    (num_bits, (bits as u32 & mask) as u16)
}

#[cfg(test)]
mod tests {
    use super::{get_code, JfifWriter, OUTPUT_BUFFER_SIZE, ZIGZAG};
    use crate::error::EncodingError;
    use crate::huffman::HuffmanTable;
    use crate::writer::JfifWrite;

    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn unstuff(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        let mut i = 0;
        while i < data.len() {
            out.push(data[i]);
            if data[i] == 0xFF {
                assert_eq!(data.get(i + 1), Some(&0x00), "0xFF at {} is not stuffed", i);
                i += 1;
            }
            i += 1;
        }
        out
    }

    fn read_bits(data: &[u8], count: usize) -> Vec<bool> {
        (0..count)
            .map(|i| data[i / 8] & (0x80 >> (i % 8)) != 0)
            .collect()
    }

    fn decode_value(size: u8, bits: u16) -> i32 {
        if size == 0 {
            0
        } else if bits < (1 << (size - 1)) {
            i32::from(bits) - (1 << size) + 1
        } else {
            i32::from(bits)
        }
    }

    #[test]
    fn test_zigzag_is_permutation() {
        let mut seen = [false; 64];
        for &i in ZIGZAG.iter() {
            assert!(!seen[i as usize]);
            seen[i as usize] = true;
        }
        assert_eq!(&ZIGZAG[..6], &[0, 1, 8, 16, 9, 2]);
    }

    #[test]
    fn test_get_code() {
        assert_eq!(get_code(0), (0, 0));
        assert_eq!(get_code(1), (1, 1));
        assert_eq!(get_code(-1), (1, 0));
        assert_eq!(get_code(3), (2, 3));
        assert_eq!(get_code(-3), (2, 0));
        assert_eq!(get_code(-2), (2, 1));
        assert_eq!(get_code(255), (8, 255));
        assert_eq!(get_code(-255), (8, 0));
        assert_eq!(get_code(1024), (11, 1024));
        assert_eq!(get_code(-2047), (11, 0));
    }

    #[test]
    fn test_byte_stuffing() {
        let mut out = Vec::new();
        {
            let mut writer = JfifWriter::new(&mut out);
            writer.write_bits(0xFF, 8).unwrap();
            writer.write_bits(0x0F, 4).unwrap();
            writer.write_bits(0xF, 4).unwrap();
            writer.write_bits(0x1, 1).unwrap();
            writer.finish_scan().unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(out, vec![0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn test_partial_bits_are_dropped() {
        let mut out = Vec::new();
        {
            let mut writer = JfifWriter::new(&mut out);
            writer.write_bits(0b101, 3).unwrap();
            writer.finish_scan().unwrap();
            writer.write_u8(0xAB).unwrap();
            writer.flush().unwrap();
        }
        // 101 + 11111 fill the first byte, the remaining two ones are discarded
        assert_eq!(out, vec![0b1011_1111, 0xAB]);
    }

    #[test]
    fn test_output_is_buffered() {
        let mut out = Vec::new();
        {
            let mut writer = JfifWriter::new(&mut out);
            writer.write(&[7u8; OUTPUT_BUFFER_SIZE - 1]).unwrap();
            assert_eq!(writer.bytes_written(), 0);
            assert_eq!(writer.buffered(), OUTPUT_BUFFER_SIZE - 1);

            writer.write_u8(7).unwrap();
            assert_eq!(writer.bytes_written(), OUTPUT_BUFFER_SIZE);
            assert_eq!(writer.buffered(), 0);

            writer.write_u16(0x1234).unwrap();
            writer.flush().unwrap();
            assert_eq!(writer.bytes_written(), OUTPUT_BUFFER_SIZE + 2);
        }
        assert_eq!(&out[OUTPUT_BUFFER_SIZE..], &[0x12, 0x34]);
    }

    struct FailingSink;

    impl JfifWrite for FailingSink {
        fn write_all(&mut self, _buf: &[u8]) -> Result<(), EncodingError> {
            Err(EncodingError::Write("rejected".to_string()))
        }
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let mut writer = JfifWriter::new(FailingSink);
        writer.write_u8(1).unwrap();
        assert!(matches!(writer.flush(), Err(EncodingError::Write(_))));
    }

    #[test]
    fn test_write_block_zero_runs() {
        let dc_table = HuffmanTable::default_luma_dc().unwrap();
        let ac_table = HuffmanTable::default_luma_ac().unwrap();

        // DC diff 0, one coefficient after a run of 17 zeros, then EOB
        let mut block = [0i16; 64];
        block[18] = 1;

        let mut out = Vec::new();
        {
            let mut writer = JfifWriter::new(&mut out);
            let dc = writer.write_block(&block, 0, &dc_table, &ac_table).unwrap();
            assert_eq!(dc, 0);
            writer.finish_scan().unwrap();
            writer.flush().unwrap();
        }

        let mut expected: Vec<bool> = Vec::new();
        let mut push = |(size, code): (u8, u16)| {
            for i in (0..size).rev() {
                expected.push(code & (1 << i) != 0);
            }
        };
        push(dc_table.get_for_value(0));
        push(ac_table.get_for_value(0xF0));
        push(ac_table.get_for_value(0x11));
        push((1, 1));
        push(ac_table.get_for_value(0x00));

        let bits = read_bits(&unstuff(&out), expected.len());
        assert_eq!(bits, expected);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "no Huffman code")]
    fn test_missing_symbol_panics_in_debug() {
        // codes only for symbols 1 and 5
        let mut length = [0u8; 16];
        length[1] = 2;
        let table = HuffmanTable::new(&length, &[1, 5]).unwrap();

        let mut out = Vec::new();
        let mut writer = JfifWriter::new(&mut out);
        writer.huffman_encode(1, &table).unwrap();
        let _ = writer.huffman_encode(3, &table);
    }

    proptest! {
        #[test]
        fn dc_magnitude_round_trip(d in -2047i32..=2047) {
            let (size, bits) = get_code(d);
            prop_assert!(size <= 11);
            prop_assert!(u32::from(bits) < (1u32 << size));
            prop_assert_eq!(decode_value(size, bits), d);
        }

        #[test]
        fn stuffing_is_reversible(codes in proptest::collection::vec((any::<u16>(), 1u8..=16), 0..200)) {
            let mut out = Vec::new();
            let mut expected = Vec::new();
            {
                let mut writer = JfifWriter::new(&mut out);
                for &(value, size) in &codes {
                    let value = u32::from(value) & ((1 << size) - 1);
                    writer.write_bits(value, size).unwrap();
                    for i in (0..size).rev() {
                        expected.push(value & (1 << i) != 0);
                    }
                }
                writer.finish_scan().unwrap();
                writer.flush().unwrap();
            }

            let data = unstuff(&out);
            prop_assert_eq!(data.len(), (expected.len() + 7) / 8);
            prop_assert_eq!(read_bits(&data, expected.len()), expected.clone());

            // padding is all ones
            let padded = read_bits(&data, data.len() * 8);
            prop_assert!(padded[expected.len()..].iter().all(|&b| b));
        }
    }
}
