use crate::tezos::AccountId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One computed payout. Only `recipient` is ever rewritten; every other
/// attribute the host sends is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutCandidate {
    pub source: AccountId,
    pub recipient: AccountId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl PayoutCandidate {
    pub fn new(source: AccountId, recipient: AccountId) -> Self {
        Self {
            source,
            recipient,
            attributes: Map::new(),
        }
    }

    pub fn with_recipient(&self, recipient: AccountId) -> Self {
        Self {
            recipient,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateClass {
    /// Contract paying itself; its storage decides the outcome.
    NeedsInvestigation,
    /// Contract payer with a different recipient.
    AlreadyRedirected,
    NotAContract,
}

pub fn classify_candidate(candidate: &PayoutCandidate) -> CandidateClass {
    if candidate.recipient.is_contract() && candidate.source == candidate.recipient {
        CandidateClass::NeedsInvestigation
    } else if candidate.source.is_contract() {
        CandidateClass::AlreadyRedirected
    } else {
        CandidateClass::NotAContract
    }
}
