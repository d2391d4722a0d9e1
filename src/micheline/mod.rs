//! Micheline storage decoding.

pub mod decode;
pub mod types;
pub mod value;

pub use decode::decode_storage;
pub use types::MichelineType;
pub use value::{StorageMapping, StorageValue};
