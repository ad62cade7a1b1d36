//! # Adaptive Huffman
//!
//! Single-pass, single-file compression using a Vitter/FGK-style adaptive
//! Huffman tree. Encoder and decoder reconstruct identical tree state from
//! the sequence of symbols already seen. No code table is ever
//! transmitted.
//!
//! * `bitbuffer` is the cell-backed bit FIFO that packs variable-length
//!   codes onto byte-aligned storage.
//! * `tree` is the dynamic Huffman tree: node arena, sibling-property
//!   cascade increment, cached root-to-node codes.
//! * `order_list` threads every tree node in non-decreasing rank order so
//!   `tree` can find a swap candidate in O(1).
//! * `codec` drives the encode/decode control loops over a generic byte
//!   source/sink, with an optional [`codec::ProgressSink`] collaborator.
//! * `progress` is a terminal [`codec::ProgressSink`] for CLI use; it is
//!   ambient scaffolding, not part of the codec's own contract.
//!
//! ## Buffer Example
//!
//! ```
//! use adaptive_huffman::{codec, STD_CODEC_CONFIG};
//! use std::io::Cursor;
//!
//! let data = b"the quick brown fox jumps over the lazy dog".to_vec();
//! let mut compressed = Vec::new();
//! codec::encode::<u32, _, _>(&mut Cursor::new(&data), &mut compressed, &STD_CODEC_CONFIG, None)
//!     .expect("encode failed");
//! let mut restored = Vec::new();
//! codec::decode::<u32, _, _>(&mut Cursor::new(&compressed), &mut restored, &STD_CODEC_CONFIG, None)
//!     .expect("decode failed");
//! assert_eq!(restored, data);
//! ```

pub mod bitbuffer;
pub mod codec;
pub mod order_list;
pub mod progress;
pub mod tree;

pub use bitbuffer::GrowthPolicy;

/// Errors the core can surface to a caller. Conditions that can only be
/// triggered by a bug (an out-of-range bit fed to `Tree::walk`, a trim
/// called on an underfull `BitBuffer`) are not represented here: those
/// are programming errors and panic, since `Result` is reserved for
/// conditions a caller can actually act on.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Decode reached end-of-source before observing the NYT+0x00
    /// terminator. The wire format carries no length prefix, so this is
    /// indistinguishable from "still mid-code" until the source is
    /// actually exhausted.
    #[error("malformed input: source exhausted before terminator")]
    MalformedInput,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration accepted at codec construction, paired with a
/// `STD_CODEC_CONFIG` default. No other configuration knobs are exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// How many input bytes between `ProgressSink::update` calls.
    pub update_stride: u64,
    /// `BitBuffer` growth policy: grow to the exact size needed, or
    /// double repeatedly until sufficient.
    pub growth: GrowthPolicy,
}

pub const STD_CODEC_CONFIG: CodecConfig =
    CodecConfig { update_stride: 10_000, growth: GrowthPolicy::Linear };

impl Default for CodecConfig {
    fn default() -> Self {
        STD_CODEC_CONFIG
    }
}
