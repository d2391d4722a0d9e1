//! Tezos account identifiers.
//!
//! Contract-ness is read off the address prefix; nothing is looked up on chain.
//! Text addresses must carry a valid base58check checksum and the version
//! bytes of their prefix.

use crate::error::AccountParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of every base58check address handled here (`tz1...`, `KT1...`, `sr1...`).
pub const ADDRESS_TEXT_LEN: usize = 36;
/// Binary form: one tag byte, a 20-byte hash and one curve/padding byte.
pub const ADDRESS_BINARY_LEN: usize = 22;

/// Decoded text address: three version bytes and a 20-byte hash.
const ADDRESS_PAYLOAD_LEN: usize = 23;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Ed25519,
    Secp256k1,
    P256,
    Bls,
    Originated,
    SmartRollup,
}

impl AccountKind {
    const ALL: [Self; 6] = [
        Self::Ed25519,
        Self::Secp256k1,
        Self::P256,
        Self::Bls,
        Self::Originated,
        Self::SmartRollup,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Ed25519 => "tz1",
            Self::Secp256k1 => "tz2",
            Self::P256 => "tz3",
            Self::Bls => "tz4",
            Self::Originated => "KT1",
            Self::SmartRollup => "sr1",
        }
    }

    fn version_bytes(self) -> [u8; 3] {
        match self {
            Self::Ed25519 => [6, 161, 159],
            Self::Secp256k1 => [6, 161, 161],
            Self::P256 => [6, 161, 164],
            Self::Bls => [6, 161, 166],
            Self::Originated => [2, 90, 121],
            Self::SmartRollup => [6, 124, 117],
        }
    }

    fn from_prefix(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| raw.starts_with(kind.prefix()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
    kind: AccountKind,
    text: String,
}

impl AccountId {
    /// Parses a text address exactly as given; surrounding whitespace is rejected.
    pub fn parse(raw: &str) -> Result<Self, AccountParseError> {
        let kind = AccountKind::from_prefix(raw)
            .ok_or_else(|| AccountParseError::UnknownPrefix(raw.to_string()))?;
        if raw.len() != ADDRESS_TEXT_LEN {
            return Err(AccountParseError::Length(raw.to_string()));
        }
        if !raw.chars().all(|c| BASE58_ALPHABET.contains(c)) {
            return Err(AccountParseError::Alphabet(raw.to_string()));
        }
        let payload = bs58::decode(raw)
            .with_check(None)
            .into_vec()
            .map_err(|_| AccountParseError::Checksum(raw.to_string()))?;
        if payload.len() != ADDRESS_PAYLOAD_LEN || payload[..3] != kind.version_bytes() {
            return Err(AccountParseError::Checksum(raw.to_string()));
        }
        Ok(Self {
            kind,
            text: raw.to_string(),
        })
    }

    /// Decodes the 22-byte binary address used by optimized Micheline.
    /// Bytes past the first 22 carry an entrypoint name and are ignored.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, AccountParseError> {
        if bytes.len() < ADDRESS_BINARY_LEN {
            return Err(AccountParseError::Binary(hex::encode(bytes)));
        }
        let bytes = &bytes[..ADDRESS_BINARY_LEN];
        let (kind, hash) = match (bytes[0], bytes[1]) {
            (0x00, curve) => {
                let kind = match curve {
                    0x00 => AccountKind::Ed25519,
                    0x01 => AccountKind::Secp256k1,
                    0x02 => AccountKind::P256,
                    0x03 => AccountKind::Bls,
                    _ => return Err(AccountParseError::Binary(hex::encode(bytes))),
                };
                (kind, &bytes[2..])
            }
            (0x01, _) if bytes[21] == 0x00 => (AccountKind::Originated, &bytes[1..21]),
            (0x03, _) if bytes[21] == 0x00 => (AccountKind::SmartRollup, &bytes[1..21]),
            _ => return Err(AccountParseError::Binary(hex::encode(bytes))),
        };

        let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
        payload.extend_from_slice(&kind.version_bytes());
        payload.extend_from_slice(hash);
        Ok(Self {
            kind,
            text: bs58::encode(payload).with_check().into_string(),
        })
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn is_contract(&self) -> bool {
        self.kind == AccountKind::Originated
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for AccountId {
    type Err = AccountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
