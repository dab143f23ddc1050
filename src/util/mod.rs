//! Shared utility functions.

pub mod encoding;

pub use encoding::{decode_identifier, encode_identifier, IdentifierError};
