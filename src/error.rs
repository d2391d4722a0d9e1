use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubstitutorError>;

#[derive(Debug, Error)]
pub enum SubstitutorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage fetch error: {0}")]
    StorageFetch(#[from] StorageFetchError),
    #[error("storage decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("owner decode error: {0}")]
    OwnerDecode(#[from] OwnerDecodeError),
    #[error("audit write error: {0}")]
    AuditWrite(#[from] AuditWriteError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid LOG_LEVEL '{0}'")]
    InvalidLogLevel(String),
    #[error("invalid RPC_NODE '{url}': {reason}")]
    InvalidRpcNode { url: String, reason: String },
    #[error("cannot open LOG_FILE '{path}': {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum StorageFetchError {
    #[error("transport failure for {contract}: {reason}")]
    Transport { contract: String, reason: String },
    #[error("node answered HTTP {status} for {contract}: {body}")]
    Status {
        contract: String,
        status: u16,
        body: String,
    },
    #[error("malformed script for {contract}: {reason}")]
    MalformedScript { contract: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("storage is not record-shaped: {0}")]
    NotRecord(String),
    #[error("value does not match type `{expected}` at `{path}`")]
    ShapeMismatch { expected: String, path: String },
    #[error("malformed micheline: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnerDecodeError {
    #[error("owner field is not an address scalar: {0}")]
    NotScalar(String),
    #[error("owner field is not a valid account: {0}")]
    InvalidAccount(#[from] AccountParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountParseError {
    #[error("unknown address prefix in `{0}`")]
    UnknownPrefix(String),
    #[error("address `{0}` has invalid length")]
    Length(String),
    #[error("address `{0}` is not base58")]
    Alphabet(String),
    #[error("address `{0}` fails its base58check checksum")]
    Checksum(String),
    #[error("binary address {0} is not a known encoding")]
    Binary(String),
}

#[derive(Debug, Error)]
#[error("failed to append to audit log '{path}': {source}")]
pub struct AuditWriteError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}
