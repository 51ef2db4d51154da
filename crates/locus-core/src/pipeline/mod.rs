//! Image input stages.
//!
//! - **validate**: Existence, size and magic-byte checks before reading a file
//! - **decode**: Decode encoded bytes with dimension and time limits
//! - **hash**: Stable photo identifiers from file content

pub mod decode;
pub mod hash;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use hash::photo_identifier;
pub use validate::Validator;
