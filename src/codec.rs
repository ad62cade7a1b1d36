//! The encode/decode control loops: the only place that touches a byte
//! source/sink directly, keeping the `BitBuffer` and `Tree` in lockstep on
//! both sides of the wire.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::bitbuffer::{BitBuffer, Cell};
use crate::tree::Tree;
use crate::{CodecConfig, Error};

/// A sink for progress reports during a long encode/decode. The codec
/// tolerates its total absence (`None`): nothing here is required for
/// correctness, only for user feedback, so the core never assumes one is
/// attached.
pub trait ProgressSink {
    fn update(&mut self, bytes_processed: u64);
    fn finish(&mut self);
}

/// End-of-run statistics, returned to the caller rather than printed.
/// The core does no I/O beyond the source/sink it was handed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub elapsed: Duration,
}

impl Metrics {
    /// Percentage by which output is smaller than input; negative if the
    /// output grew (possible for small or already-dense inputs).
    pub fn percent_reduction(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (self.input_bytes as f64 - self.output_bytes as f64) / self.input_bytes as f64 * 100.0
    }
}

fn flush_cells<C: Cell, W: Write>(
    bits: &mut BitBuffer<C>,
    sink: &mut W,
    output_bytes: &mut u64,
) -> Result<(), Error> {
    while bits.can_trim_cell() {
        let bytes = bits.trim_cell().be_bytes();
        sink.write_all(&bytes)?;
        *output_bytes += bytes.len() as u64;
    }
    Ok(())
}

fn flush_bytes<C: Cell, W: Write>(
    bits: &mut BitBuffer<C>,
    sink: &mut W,
    output_bytes: &mut u64,
) -> Result<(), Error> {
    while bits.can_trim_byte() {
        sink.write_all(&[bits.trim_byte()])?;
        *output_bytes += 1;
    }
    Ok(())
}

fn encode_byte<C: Cell>(tree: &mut Tree<C>, bits: &mut BitBuffer<C>, b: u8) {
    match tree.leaf_for(b) {
        Some(leaf) => {
            bits.append_bits(tree.code(leaf));
            tree.increment(leaf);
        }
        None => {
            bits.append_bits(tree.code(tree.nyt()));
            bits.append_low_bits(b);
            trace!("expanding nyt for byte {b:#04x}");
            tree.expand_nyt(b);
        }
    }
}

/// Encodes every byte of `source` into `sink` using the adaptive Huffman
/// tree, terminated by the NYT code followed by a literal zero byte.
///
/// The terminator scheme cannot distinguish "the input legitimately
/// contains a never-before-seen 0x00 byte" from "end of stream": once byte
/// 0x00 has occurred anywhere in the input, the decoder will stop at the
/// very next occurrence of 0x00 (whether from NYT or from a symbol that
/// has already been assigned a leaf), rather than reproducing it. This is
/// the wire format's documented limitation (it is not mended here: doing
/// so would require a length prefix or header this format deliberately
/// does not have); it is safe for text input, which practically never
/// contains a null byte.
pub fn encode<C: Cell, R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    config: &CodecConfig,
    mut progress: Option<&mut dyn ProgressSink>,
) -> Result<Metrics, Error> {
    let start = Instant::now();
    let mut tree: Tree<C> = Tree::new();
    let mut bits: BitBuffer<C> = BitBuffer::with_growth(config.growth);
    let mut input_bytes: u64 = 0;
    let mut output_bytes: u64 = 0;

    let mut buf = [0u8; 1];
    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        encode_byte(&mut tree, &mut bits, buf[0]);
        input_bytes += 1;
        flush_cells(&mut bits, sink, &mut output_bytes)?;
        if input_bytes % config.update_stride == 0 {
            if let Some(p) = progress.as_deref_mut() {
                p.update(input_bytes);
            }
        }
    }

    debug!("encode: terminating after {input_bytes} input bytes");
    encode_byte(&mut tree, &mut bits, 0);
    flush_cells(&mut bits, sink, &mut output_bytes)?;
    bits.pad_to_full_byte();
    flush_bytes(&mut bits, sink, &mut output_bytes)?;

    if let Some(p) = progress {
        p.finish();
    }

    Ok(Metrics { input_bytes, output_bytes, elapsed: start.elapsed() })
}

fn load_byte<C: Cell, R: Read>(
    source: &mut R,
    bits: &mut BitBuffer<C>,
    input_bytes: &mut u64,
    config: &CodecConfig,
    progress: &mut Option<&mut dyn ProgressSink>,
) -> Result<(), Error> {
    let mut buf = [0u8; 1];
    let n = source.read(&mut buf)?;
    if n == 0 {
        return Err(Error::MalformedInput);
    }
    bits.append_low_bits(buf[0]);
    *input_bytes += 1;
    if *input_bytes % config.update_stride == 0 {
        if let Some(p) = progress.as_deref_mut() {
            p.update(*input_bytes);
        }
    }
    Ok(())
}

/// Decodes a stream produced by [`encode`], stopping at the NYT-plus-zero
/// terminator. Returns [`Error::MalformedInput`] if the source runs out
/// before the terminator is observed. The format has no length prefix,
/// so a truncated input is otherwise indistinguishable from one trailing
/// off mid-code.
pub fn decode<C: Cell, R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    config: &CodecConfig,
    mut progress: Option<&mut dyn ProgressSink>,
) -> Result<Metrics, Error> {
    let start = Instant::now();
    let mut tree: Tree<C> = Tree::new();
    let mut bits: BitBuffer<C> = BitBuffer::with_growth(config.growth);
    let mut input_bytes: u64 = 0;
    let mut output_bytes: u64 = 0;

    loop {
        let mut node = tree.root();
        while !tree.is_leaf(node) {
            if bits.is_empty() {
                load_byte(source, &mut bits, &mut input_bytes, config, &mut progress)?;
            }
            let bit = bits.trim_bit();
            node = tree.walk(node, bit);
        }

        if tree.is_nyt(node) {
            while !bits.can_trim_byte() {
                load_byte(source, &mut bits, &mut input_bytes, config, &mut progress)?;
            }
            let b = bits.trim_byte();
            if b == 0 {
                debug!("decode: terminator reached after {output_bytes} output bytes");
                break;
            }
            sink.write_all(&[b])?;
            trace!("expanding nyt for byte {b:#04x}");
            tree.expand_nyt(b);
        } else {
            let b = tree.symbol(node);
            sink.write_all(&[b])?;
            tree.increment(node);
        }
        output_bytes += 1;
    }

    if let Some(p) = progress {
        p.finish();
    }

    Ok(Metrics { input_bytes, output_bytes, elapsed: start.elapsed() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STD_CODEC_CONFIG;
    use std::io::Cursor;

    fn roundtrip<C: Cell>(data: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        encode::<C, _, _>(&mut Cursor::new(data), &mut compressed, &STD_CODEC_CONFIG, None)
            .expect("encode failed");
        let mut out = Vec::new();
        decode::<C, _, _>(&mut Cursor::new(compressed), &mut out, &STD_CODEC_CONFIG, None)
            .expect("decode failed");
        out
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(roundtrip::<u32>(b""), b"");
    }

    #[test]
    fn empty_input_is_a_single_padded_byte() {
        let mut compressed = Vec::new();
        encode::<u32, _, _>(&mut Cursor::new(&b""[..]), &mut compressed, &STD_CODEC_CONFIG, None)
            .unwrap();
        assert_eq!(compressed, vec![0x00]);
    }

    #[test]
    fn single_byte_round_trips() {
        assert_eq!(roundtrip::<u32>(b"a"), b"a");
    }

    #[test]
    fn repeated_byte_round_trips() {
        assert_eq!(roundtrip::<u32>(b"aaaa"), b"aaaa");
    }

    #[test]
    fn all_distinct_bytes_round_trip() {
        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(roundtrip::<u32>(&data), data);
    }

    #[test]
    fn english_prose_round_trips_u8_cells() {
        let text = "the quick brown fox jumps over the lazy dog. \
                     pack my box with five dozen liquor jugs. "
            .repeat(64);
        assert_eq!(roundtrip::<u8>(text.as_bytes()), text.as_bytes());
    }

    #[test]
    fn english_prose_round_trips_u32_cells() {
        let text = "the quick brown fox jumps over the lazy dog. \
                     pack my box with five dozen liquor jugs. "
            .repeat(64);
        assert_eq!(roundtrip::<u32>(text.as_bytes()), text.as_bytes());
    }

    #[test]
    fn truncated_input_is_malformed() {
        let mut compressed = Vec::new();
        encode::<u32, _, _>(&mut Cursor::new(b"hello"), &mut compressed, &STD_CODEC_CONFIG, None)
            .unwrap();
        compressed.truncate(compressed.len() - 1);
        let mut out = Vec::new();
        let err = decode::<u32, _, _>(
            &mut Cursor::new(compressed),
            &mut out,
            &STD_CODEC_CONFIG,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput));
    }

    struct CountingProgress {
        updates: usize,
        finished: bool,
    }

    impl ProgressSink for CountingProgress {
        fn update(&mut self, _bytes_processed: u64) {
            self.updates += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn progress_sink_is_driven_at_stride_and_finished_once() {
        let mut config = STD_CODEC_CONFIG;
        config.update_stride = 10;
        let data = vec![b'x'; 55];
        let mut compressed = Vec::new();
        let mut progress = CountingProgress { updates: 0, finished: false };
        encode::<u32, _, _>(&mut Cursor::new(&data), &mut compressed, &config, Some(&mut progress))
            .unwrap();
        assert_eq!(progress.updates, 5);
        assert!(progress.finished);
    }
}
