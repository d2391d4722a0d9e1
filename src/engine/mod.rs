//! Payout substitution engine: candidate and vault classification plus the
//! batch resolver that ties them to a storage reader and the audit log.

pub mod candidate;
pub mod reader;
pub mod resolver;
pub mod vault;

pub use candidate::{classify_candidate, CandidateClass, PayoutCandidate};
pub use reader::{ContractStorage, ContractStorageReader, SnapshotReader};
pub use resolver::{ClassificationOutcome, Resolution, SubstitutionResolver};
pub use vault::{classify_vault, VaultClass};
