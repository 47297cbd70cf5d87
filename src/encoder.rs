use alloc::vec::Vec;

use log::{debug, trace, warn};

use crate::error::{EncoderResult, EncodingError};
use crate::fdct::fdct;
use crate::huffman::HuffmanTable;
use crate::image_buffer::McuRows;
use crate::marker::Marker;
use crate::quantization::QuantizationTable;
use crate::writer::{JfifWrite, JfifWriter};

/// # Color type of the source image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorType {
    /// Grayscale with 1 byte per pixel
    Luma,

    /// RGB with 3 bytes per pixel
    Rgb,
}

impl ColorType {
    pub(crate) fn get_bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Luma => 1,
            ColorType::Rgb => 3,
        }
    }

    /// Color type for a source channel count of 1 or 3
    pub fn from_channels(channels: u8) -> Option<ColorType> {
        match channels {
            1 => Some(ColorType::Luma),
            3 => Some(ColorType::Rgb),
            _ => None,
        }
    }
}

/// # Output component layout and chroma subsampling
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[allow(non_camel_case_types)]
pub enum Subsampling {
    /// Luma only, 8x8 MCU
    Grayscale,
    /// YCbCr without subsampling, 8x8 MCU
    R_4_4_4,
    /// YCbCr with chroma halved horizontally, 16x8 MCU
    R_4_2_2,
    /// YCbCr with chroma halved in both directions, 16x16 MCU
    R_4_2_0,
}

impl Subsampling {
    /// Sampling factors of the luma component; chroma is always sampled 1x1
    pub(crate) fn get_sampling_factors(self) -> (u8, u8) {
        use Subsampling::*;

        match self {
            Grayscale | R_4_4_4 => (1, 1),
            R_4_2_2 => (2, 1),
            R_4_2_0 => (2, 2),
        }
    }

    pub(crate) fn num_components(self) -> usize {
        match self {
            Subsampling::Grayscale => 1,
            _ => 3,
        }
    }
}

/// # Encoding parameters
///
/// Copied into the encoder on [`Encoder::init`] and never changed while an image is encoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EncoderParams {
    /// Quality between 1 and 100 where 100 is the highest image quality
    pub quality: u8,

    /// Output components and chroma subsampling
    pub subsampling: Subsampling,

    /// Quantize chroma with the luma table
    pub no_chroma_discrimination: bool,
}

impl Default for EncoderParams {
    fn default() -> Self {
        EncoderParams {
            quality: 85,
            subsampling: Subsampling::R_4_2_0,
            no_chroma_discrimination: false,
        }
    }
}

impl EncoderParams {
    pub fn new(quality: u8) -> EncoderParams {
        EncoderParams {
            quality,
            ..Default::default()
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidQuality` if the quality is outside 1..=100
    pub fn validate(&self) -> EncoderResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(EncodingError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

/// # State of an [`Encoder`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncoderState {
    /// No image set up, or torn down with [`Encoder::deinit`]
    Uninitialized,

    /// Headers written, accepting scanlines
    Encoding,

    /// End of image written
    Finished,

    /// A sink write failed; the stream is abandoned
    Failed,
}

pub(crate) struct Component {
    pub id: u8,
    pub quantization_table: u8,
    pub dc_huffman_table: u8,
    pub ac_huffman_table: u8,
    pub horizontal_sampling_factor: u8,
    pub vertical_sampling_factor: u8,
}

impl Component {
    pub fn new(id: u8, table: u8, horizontal_sampling_factor: u8, vertical_sampling_factor: u8) -> Component {
        Component {
            id,
            quantization_table: table,
            dc_huffman_table: table,
            ac_huffman_table: table,
            horizontal_sampling_factor,
            vertical_sampling_factor,
        }
    }
}

/// Per image state, rebuilt from scratch on every init
struct Pipeline<W: JfifWrite> {
    writer: JfifWriter<W>,
    state: EncoderState,

    params: EncoderParams,
    width: u16,
    height: u16,
    color_type: ColorType,

    components: Vec<Component>,
    quantization_tables: [QuantizationTable; 2],
    huffman_tables: [(HuffmanTable, HuffmanTable); 2],

    rows: McuRows,
    mcus_per_row: usize,
    mcu_rows_done: usize,
    last_dc: [i16; 3],
    scanlines: u32,
}

impl<W: JfifWrite> Pipeline<W> {
    fn new(
        w: W,
        width: u16,
        height: u16,
        color_type: ColorType,
        params: EncoderParams,
    ) -> EncoderResult<Pipeline<W>> {
        let num_components = params.subsampling.num_components();
        let (h, v) = params.subsampling.get_sampling_factors();

        let mut components = Vec::new();
        components.try_reserve_exact(num_components)?;
        components.push(Component::new(1, 0, h, v));
        if num_components == 3 {
            components.push(Component::new(2, 1, 1, 1));
            components.push(Component::new(3, 1, 1, 1));
        }

        let quantization_tables = [
            QuantizationTable::new_with_quality(params.quality, true),
            QuantizationTable::new_with_quality(params.quality, params.no_chroma_discrimination),
        ];

        let huffman_tables = [
            (
                HuffmanTable::default_luma_dc()?,
                HuffmanTable::default_luma_ac()?,
            ),
            (
                HuffmanTable::default_chroma_dc()?,
                HuffmanTable::default_chroma_ac()?,
            ),
        ];

        let mcu_width = usize::from(h) * 8;
        let mcu_height = usize::from(v) * 8;
        let mcus_per_row = ceil_div(usize::from(width), mcu_width);

        let rows = McuRows::new(
            usize::from(width),
            mcus_per_row * mcu_width,
            mcu_height,
            num_components,
        )?;

        Ok(Pipeline {
            writer: JfifWriter::new(w),
            state: EncoderState::Encoding,
            params,
            width,
            height,
            color_type,
            components,
            quantization_tables,
            huffman_tables,
            rows,
            mcus_per_row,
            mcu_rows_done: 0,
            last_dc: [0; 3],
            scanlines: 0,
        })
    }

    fn num_tables(&self) -> usize {
        if self.components.len() == 1 {
            1
        } else {
            2
        }
    }

    fn write_headers(&mut self) -> EncoderResult<()> {
        let num_tables = self.num_tables();

        self.writer.write_marker(Marker::SOI)?;
        self.writer.write_jfif_header()?;
        self.writer.write_dqt(&self.quantization_tables[..num_tables])?;
        self.writer.write_sof(self.width, self.height, &self.components)?;
        self.writer.write_dht(&self.huffman_tables[..num_tables])?;
        self.writer.write_sos(&self.components)?;

        Ok(())
    }

    /// Marks the stream as failed on sink errors
    fn check<T>(&mut self, result: EncoderResult<T>) -> EncoderResult<T> {
        if let Err(err) = &result {
            if err.is_sink_failure() {
                warn!("Sink write failed, abandoning stream: {}", err);
                self.state = EncoderState::Failed;
            }
        }
        result
    }

    fn ensure_encoding(&self) -> EncoderResult<()> {
        match self.state {
            EncoderState::Encoding => Ok(()),
            EncoderState::Failed => Err(EncodingError::StreamFailed),
            EncoderState::Finished => Err(EncodingError::AlreadyFinished),
            EncoderState::Uninitialized => Err(EncodingError::NotInitialized),
        }
    }

    fn feed_scanline(&mut self, scanline: &[u8]) -> EncoderResult<()> {
        let required = usize::from(self.width) * self.color_type.get_bytes_per_pixel();
        if scanline.len() < required {
            return Err(EncodingError::BadImageData {
                length: scanline.len(),
                required,
            });
        }

        if self.scanlines >= u32::from(self.height) {
            return Err(EncodingError::TooManyScanlines {
                height: self.height,
            });
        }

        self.rows.load_scanline(scanline, self.color_type);
        self.scanlines += 1;

        if self.rows.is_full() {
            self.process_mcu_row()?;
            self.rows.reset();
        }

        Ok(())
    }

    fn finish(&mut self) -> EncoderResult<()> {
        if self.scanlines < u32::from(self.height) {
            warn!(
                "Finishing after {} of {} scanlines, the image will be incomplete",
                self.scanlines, self.height
            );
        }

        if self.rows.filled() > 0 {
            self.rows.pad_partial();
            self.process_mcu_row()?;
            self.rows.reset();
        }

        self.writer.finish_scan()?;
        self.writer.write_marker(Marker::EOI)?;
        self.writer.flush()?;

        self.state = EncoderState::Finished;

        debug!(
            "Finished {}x{} image, {} bytes written",
            self.width,
            self.height,
            self.writer.bytes_written()
        );

        Ok(())
    }

    fn process_mcu_row(&mut self) -> EncoderResult<()> {
        trace!("Encoding MCU row {}", self.mcu_rows_done);

        let mut block = [0i32; 64];

        for mcu_x in 0..self.mcus_per_row {
            match self.params.subsampling {
                Subsampling::Grayscale => {
                    self.rows.load_block(&mut block, mcu_x, 0, 0);
                    self.code_block(&mut block, 0)?;
                }
                Subsampling::R_4_4_4 => {
                    for c in 0..3 {
                        self.rows.load_block(&mut block, mcu_x, 0, c);
                        self.code_block(&mut block, c)?;
                    }
                }
                Subsampling::R_4_2_2 => {
                    for x in 0..2 {
                        self.rows.load_block(&mut block, mcu_x * 2 + x, 0, 0);
                        self.code_block(&mut block, 0)?;
                    }
                    for c in 1..3 {
                        self.rows.load_block_h2v1(&mut block, mcu_x, c);
                        self.code_block(&mut block, c)?;
                    }
                }
                Subsampling::R_4_2_0 => {
                    for y in 0..2 {
                        for x in 0..2 {
                            self.rows.load_block(&mut block, mcu_x * 2 + x, y, 0);
                            self.code_block(&mut block, 0)?;
                        }
                    }
                    for c in 1..3 {
                        self.rows.load_block_h2v2(&mut block, mcu_x, c);
                        self.code_block(&mut block, c)?;
                    }
                }
            }
        }

        self.mcu_rows_done += 1;

        Ok(())
    }

    fn code_block(&mut self, block: &mut [i32; 64], c: usize) -> EncoderResult<()> {
        fdct(block);

        let component = &self.components[c];

        let mut q_block = [0i16; 64];
        self.quantization_tables[usize::from(component.quantization_table)]
            .quantize_block(block, &mut q_block);

        let (dc_table, ac_table) = &self.huffman_tables[usize::from(component.dc_huffman_table)];

        self.last_dc[c] = self
            .writer
            .write_block(&q_block, self.last_dc[c], dc_table, ac_table)?;

        Ok(())
    }
}

/// # The JPEG encoder
///
/// Encodes one image at a time from scanlines fed top to bottom:
///
/// ```
/// use baseline_jpeg_encoder::{Encoder, EncoderParams};
///
/// let mut output = Vec::new();
/// let mut encoder = Encoder::new();
///
/// encoder.init(&mut output, 2, 2, 1, EncoderParams::new(90))?;
/// encoder.feed(Some(&[0, 255]))?;
/// encoder.feed(Some(&[255, 0]))?;
/// encoder.finish()?;
/// drop(encoder);
///
/// assert_eq!(&output[..2], &[0xFF, 0xD8]);
/// # Ok::<(), baseline_jpeg_encoder::EncodingError>(())
/// ```
pub struct Encoder<W: JfifWrite> {
    pipeline: Option<Pipeline<W>>,
}

impl<W: JfifWrite> Default for Encoder<W> {
    fn default() -> Self {
        Encoder::new()
    }
}

impl<W: JfifWrite> Encoder<W> {
    /// Create an encoder without an image
    pub fn new() -> Encoder<W> {
        Encoder { pipeline: None }
    }

    /// Sets up the encoder for a new image and writes the headers
    ///
    /// Any previous image is torn down first, together with its sink.
    ///
    /// # Errors
    ///
    /// Invalid dimensions, channel counts or parameters are rejected before anything
    /// is allocated or written. Allocation failures and sink errors are returned as well;
    /// after a sink error the encoder stays in the [`EncoderState::Failed`] state.
    pub fn init(
        &mut self,
        w: W,
        width: u16,
        height: u16,
        channels: u8,
        params: EncoderParams,
    ) -> EncoderResult<()> {
        self.pipeline = None;

        let color_type = validate_image(width, height, channels, &params)?;

        let mut pipeline = Pipeline::new(w, width, height, color_type, params)?;

        debug!(
            "Encoding {}x{} {:?} image, quality {}, {:?}",
            width, height, color_type, params.quality, params.subsampling
        );

        let result = pipeline.write_headers();
        let result = pipeline.check(result);

        self.pipeline = Some(pipeline);

        result
    }

    /// Feeds the next scanline, or finishes the image on `None`
    ///
    /// A scanline holds `width` pixels of the source color type; extra bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StreamFailed` once a sink write failed, `AlreadyFinished` after the end of
    /// image was written and `NotInitialized` without an image.
    pub fn feed(&mut self, scanline: Option<&[u8]>) -> EncoderResult<()> {
        let pipeline = self
            .pipeline
            .as_mut()
            .ok_or(EncodingError::NotInitialized)?;

        pipeline.ensure_encoding()?;

        let result = match scanline {
            Some(scanline) => pipeline.feed_scanline(scanline),
            None => pipeline.finish(),
        };

        pipeline.check(result)
    }

    /// Pads the last MCU row and terminates the stream; same as `feed(None)`
    pub fn finish(&mut self) -> EncoderResult<()> {
        self.feed(None)
    }

    /// Feeds all rows of a tightly packed image and finishes it
    ///
    /// # Errors
    ///
    /// Returns `BadImageData` if `data` is smaller than the initialized dimensions require.
    pub fn encode(&mut self, data: &[u8]) -> EncoderResult<()> {
        let (stride, height) = match self.pipeline.as_ref() {
            Some(pipeline) => (
                usize::from(pipeline.width) * pipeline.color_type.get_bytes_per_pixel(),
                usize::from(pipeline.height),
            ),
            None => return Err(EncodingError::NotInitialized),
        };

        let required = stride * height;
        if data.len() < required {
            return Err(EncodingError::BadImageData {
                length: data.len(),
                required,
            });
        }

        for row in data[..required].chunks_exact(stride) {
            self.feed(Some(row))?;
        }

        self.finish()
    }

    /// Tears down the current image and hands back its sink
    pub fn deinit(&mut self) -> Option<W> {
        self.pipeline
            .take()
            .map(|pipeline| pipeline.writer.into_inner())
    }

    pub fn state(&self) -> EncoderState {
        self.pipeline
            .as_ref()
            .map_or(EncoderState::Uninitialized, |pipeline| pipeline.state)
    }

    /// Scanlines accepted for the current image
    pub fn scanlines_fed(&self) -> u32 {
        self.pipeline
            .as_ref()
            .map_or(0, |pipeline| pipeline.scanlines)
    }
}

/// Checks image dimensions, channel count and parameters
pub(crate) fn validate_image(
    width: u16,
    height: u16,
    channels: u8,
    params: &EncoderParams,
) -> EncoderResult<ColorType> {
    if width == 0 || height == 0 {
        return Err(EncodingError::ZeroImageDimensions { width, height });
    }

    let color_type =
        ColorType::from_channels(channels).ok_or(EncodingError::InvalidChannelCount(channels))?;

    params.validate()?;

    Ok(color_type)
}

fn ceil_div(value: usize, div: usize) -> usize {
    value / div + usize::from(value % div != 0)
}
