//! Content hashing used as a stable photo identifier.

use blake3::Hasher as Blake3Hasher;

/// BLAKE3 hex digest of an encoded image buffer.
///
/// Identical files get identical identifiers regardless of their path, which is
/// what the history store keys records by.
pub fn photo_identifier(data: &[u8]) -> String {
    let mut hasher = Blake3Hasher::new();
    hasher.update(data);
    hasher.finalize().to_hex().to_string()
}
