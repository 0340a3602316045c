//! Text utilities: word boundaries, offset unit conversion, normalization

pub mod boundaries;
pub mod normalize;
pub mod units;

pub use boundaries::{is_word_boundary, ranges_overlap, snap_to_token_boundaries};
pub use normalize::{canonical_json, is_nfc, normalize_nfc};
pub use units::{byte_to_utf16, utf16_len, utf16_to_byte_clamped, GraphemeIndexer};
