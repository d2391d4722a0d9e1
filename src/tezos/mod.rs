pub mod address;

pub use address::{AccountId, AccountKind};
