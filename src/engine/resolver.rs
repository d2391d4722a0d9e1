//! Substitution resolver.
//!
//! Walks a candidate batch in order, investigates self-paying contracts, and
//! rewrites the recipient of vault payouts to the vault owner. Any fetch,
//! decode or audit failure aborts the whole batch; there is no partial result.

use crate::engine::candidate::{classify_candidate, CandidateClass, PayoutCandidate};
use crate::engine::reader::ContractStorageReader;
use crate::engine::vault::{classify_vault, VaultClass};
use crate::error::Result;
use crate::micheline::decode_storage;
use crate::tezos::AccountId;
use crate::utils::audit_log::{AuditLog, AuditRecord};
use crate::utils::config::{Config, LogLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    NotAContract,
    AlreadyRedirected,
    NotAVault,
    RedirectedTo(AccountId),
    VaultWithoutOwner,
}

impl ClassificationOutcome {
    pub fn level(&self) -> LogLevel {
        match self {
            Self::NotAContract => LogLevel::Verbose,
            Self::AlreadyRedirected | Self::NotAVault => LogLevel::Contracts,
            Self::RedirectedTo(_) => LogLevel::Redirects,
            Self::VaultWithoutOwner => LogLevel::Errors,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NotAContract => "not a contract.".to_string(),
            Self::AlreadyRedirected => "already substituted.".to_string(),
            Self::NotAVault => "not an oven.".to_string(),
            Self::RedirectedTo(owner) => format!("redirected to {owner}."),
            Self::VaultWithoutOwner => "WARNING: no owner address. Kept unchanged.".to_string(),
        }
    }
}

/// Output of one batch: candidates and outcomes share the input's order.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub cycle: i64,
    pub candidates: Vec<PayoutCandidate>,
    pub outcomes: Vec<ClassificationOutcome>,
    /// Records that passed the configured threshold, in write order.
    pub audit: Vec<AuditRecord>,
}

impl Resolution {
    pub fn redirected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ClassificationOutcome::RedirectedTo(_)))
            .count()
    }
}

pub struct SubstitutionResolver<'a> {
    config: &'a Config,
    reader: &'a dyn ContractStorageReader,
}

impl<'a> SubstitutionResolver<'a> {
    pub fn new(config: &'a Config, reader: &'a dyn ContractStorageReader) -> Self {
        Self { config, reader }
    }

    pub async fn resolve(&self, cycle: i64, candidates: &[PayoutCandidate]) -> Result<Resolution> {
        let mut log = AuditLog::open(self.config)?;
        log.record(LogLevel::System, format!("=== Cycle {cycle} ==="))?;
        log.record(
            LogLevel::Debug,
            format!(
                "RPC node is {}\nLog level is {}",
                self.config.rpc_node, self.config.log_level
            ),
        )?;

        let mut output = Vec::with_capacity(candidates.len());
        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let outcome = self.resolve_candidate(candidate).await?;
            log.candidate(&candidate.source, outcome.level(), &outcome.message())?;

            let resolved = match &outcome {
                ClassificationOutcome::RedirectedTo(owner) => {
                    tracing::info!(
                        "[RESOLVER] cycle {cycle}: {} payout redirected to owner {owner}",
                        candidate.source
                    );
                    candidate.with_recipient(owner.clone())
                }
                ClassificationOutcome::VaultWithoutOwner => {
                    tracing::warn!(
                        "[RESOLVER] cycle {cycle}: vault {} has no owner field; recipient kept",
                        candidate.source
                    );
                    candidate.clone()
                }
                other => {
                    tracing::debug!("[RESOLVER] {}: {other:?}", candidate.source);
                    candidate.clone()
                }
            };
            output.push(resolved);
            outcomes.push(outcome);
        }

        log.record(
            LogLevel::Debug,
            format!("{} candidates inspected.", candidates.len()),
        )?;
        let audit = log.close()?;

        Ok(Resolution {
            cycle,
            candidates: output,
            outcomes,
            audit,
        })
    }

    async fn resolve_candidate(&self, candidate: &PayoutCandidate) -> Result<ClassificationOutcome> {
        match classify_candidate(candidate) {
            CandidateClass::NotAContract => Ok(ClassificationOutcome::NotAContract),
            CandidateClass::AlreadyRedirected => Ok(ClassificationOutcome::AlreadyRedirected),
            CandidateClass::NeedsInvestigation => {
                let script = self.reader.fetch(&candidate.source).await?;
                let mapping = decode_storage(&script.storage, &script.storage_type)?;
                let outcome = match classify_vault(&mapping)? {
                    VaultClass::NotAVault => ClassificationOutcome::NotAVault,
                    VaultClass::Vault { owner: Some(owner) } => {
                        ClassificationOutcome::RedirectedTo(owner)
                    }
                    VaultClass::Vault { owner: None } => ClassificationOutcome::VaultWithoutOwner,
                };
                Ok(outcome)
            }
        }
    }
}
