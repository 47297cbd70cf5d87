use crate::encoder::Component;
use crate::error::EncoderResult;
use crate::huffman::{CodingClass, HuffmanTable};
use crate::quantization::QuantizationTable;
use crate::writer::{JfifWrite, JfifWriter, ZIGZAG};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Baseline DCT start of frame
    SOF0,
    /// Define Huffman table
    DHT,
    /// Define quantization table
    DQT,
    /// Start of scan
    SOS,
    /// JFIF application segment
    APP0,
}

impl From<Marker> for u8 {
    fn from(marker: Marker) -> Self {
        use Marker::*;

        match marker {
            SOI => 0xD8,
            EOI => 0xD9,
            SOF0 => 0xC0,
            DHT => 0xC4,
            DQT => 0xDB,
            SOS => 0xDA,
            APP0 => 0xE0,
        }
    }
}

impl<W: JfifWrite> JfifWriter<W> {
    /// APP0 segment: JFIF 1.1, no units, 1:1 density, no thumbnail
    pub fn write_jfif_header(&mut self) -> EncoderResult<()> {
        self.write_segment(
            Marker::APP0,
            &[
                b'J', b'F', b'I', b'F', 0, // identifier
                0x01, 0x01, // version
                0x00, // units
                0x00, 0x01, 0x00, 0x01, // density
                0x00, 0x00, // thumbnail
            ],
        )
    }

    /// One DQT segment per table, entries in zig-zag order
    pub fn write_dqt(&mut self, tables: &[QuantizationTable]) -> EncoderResult<()> {
        for (index, table) in tables.iter().enumerate() {
            self.write_marker(Marker::DQT)?;
            self.write_u16(64 + 1 + 2)?;
            self.write_u8(index as u8)?;

            for &z in ZIGZAG.iter() {
                self.write_u8(table.get(z as usize) as u8)?;
            }
        }

        Ok(())
    }

    pub fn write_sof(&mut self, width: u16, height: u16, components: &[Component]) -> EncoderResult<()> {
        self.write_marker(Marker::SOF0)?;
        self.write_u16(8 + 3 * components.len() as u16)?;

        // Sample precision
        self.write_u8(8)?;

        self.write_u16(height)?;
        self.write_u16(width)?;

        self.write_u8(components.len() as u8)?;

        for component in components {
            self.write_u8(component.id)?;
            self.write_u8(
                (component.horizontal_sampling_factor << 4) | component.vertical_sampling_factor,
            )?;
            self.write_u8(component.quantization_table)?;
        }

        Ok(())
    }

    fn write_huffman_segment(
        &mut self,
        class: CodingClass,
        destination: u8,
        table: &HuffmanTable,
    ) -> EncoderResult<()> {
        assert!(destination < 4, "Bad destination: {}", destination);

        self.write_marker(Marker::DHT)?;
        self.write_u16(2 + 1 + 16 + table.values().len() as u16)?;

        self.write_u8(((class as u8) << 4) | destination)?;
        self.write(table.length())?;
        self.write(table.values())?;

        Ok(())
    }

    /// DC and AC tables of the luma pair, then of the chroma pair when present
    pub fn write_dht(&mut self, tables: &[(HuffmanTable, HuffmanTable)]) -> EncoderResult<()> {
        for (destination, (dc_table, ac_table)) in tables.iter().enumerate() {
            self.write_huffman_segment(CodingClass::Dc, destination as u8, dc_table)?;
            self.write_huffman_segment(CodingClass::Ac, destination as u8, ac_table)?;
        }

        Ok(())
    }

    pub fn write_sos(&mut self, components: &[Component]) -> EncoderResult<()> {
        self.write_marker(Marker::SOS)?;
        self.write_u16(6 + 2 * components.len() as u16)?;

        self.write_u8(components.len() as u8)?;

        for component in components {
            self.write_u8(component.id)?;
            self.write_u8((component.dc_huffman_table << 4) | component.ac_huffman_table)?;
        }

        // Spectral selection start, end and successive approximation
        self.write(&[0, 63, 0])?;

        Ok(())
    }
}
