//! Symmetric encryption of POI records.
//!
//! Records are serialized to JSON, sealed with AES-256-GCM under either a per-call key or the
//! codec's configured default key, and carried as base64 text. See [`envelope`] for the byte
//! layout.

pub mod codec;
pub mod envelope;
pub mod key;

mod error;

pub use codec::PoiCodec;
pub use error::{DecryptFailure, Error, Result};
pub use key::{Key, derive_key};
