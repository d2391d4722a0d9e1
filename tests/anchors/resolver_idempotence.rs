//! Anchor Test: a second pass over the resolver's own output changes nothing,
//! and batch shape survives arbitrary candidate mixes.

use crate::anchor_utils::*;
use payouts_substitutor::engine::{
    ClassificationOutcome, PayoutCandidate, SnapshotReader, SubstitutionResolver,
};
use payouts_substitutor::utils::config::Config;
use proptest::prelude::*;

const POOL: [&str; 7] = [
    VAULT_A,
    VAULT_B,
    MULTISIG,
    OWNER_A,
    OWNER_B,
    DELEGATOR_X,
    DELEGATOR_Y,
];

fn snapshot() -> SnapshotReader {
    SnapshotReader::new()
        .with_storage(account(VAULT_A), oven_storage(Some(OWNER_A)))
        .with_storage(account(VAULT_B), oven_storage(None))
        .with_storage(account(MULTISIG), multisig_storage())
}

fn run(cfg: &Config, reader: &SnapshotReader, batch: &[PayoutCandidate]) -> Vec<PayoutCandidate> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    rt.block_on(SubstitutionResolver::new(cfg, reader).resolve(1, batch))
        .expect("snapshot batch resolves")
        .candidates
}

#[tokio::test]
async fn test_redirected_candidate_is_already_substituted_on_second_pass() {
    let cfg = config("debug", None);
    let reader = snapshot();
    let input = vec![candidate(VAULT_A, VAULT_A), candidate(DELEGATOR_X, DELEGATOR_Y)];
    let resolver = SubstitutionResolver::new(&cfg, &reader);

    let first = resolver.resolve(900, &input).await.unwrap();
    let second = resolver.resolve(900, &first.candidates).await.unwrap();

    assert_eq!(second.candidates, first.candidates);
    assert_eq!(
        second.outcomes,
        vec![
            ClassificationOutcome::AlreadyRedirected,
            ClassificationOutcome::NotAContract
        ]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_order_cardinality_and_idempotence(
        pairs in proptest::collection::vec((0..POOL.len(), 0..POOL.len(), any::<bool>()), 0..24)
    ) {
        let cfg = config("debug", None);
        let reader = snapshot();
        let input: Vec<PayoutCandidate> = pairs
            .iter()
            .map(|&(src, dst, self_pay)| {
                let recipient = if self_pay { POOL[src] } else { POOL[dst] };
                candidate(POOL[src], recipient)
            })
            .collect();

        let once = run(&cfg, &reader, &input);
        prop_assert_eq!(once.len(), input.len());
        for (before, after) in input.iter().zip(&once) {
            prop_assert_eq!(&before.source, &after.source);
            prop_assert_eq!(&before.attributes, &after.attributes);
            if before.recipient != after.recipient {
                prop_assert_eq!(before.source.as_str(), VAULT_A);
                prop_assert_eq!(after.recipient.as_str(), OWNER_A);
            }
        }

        let twice = run(&cfg, &reader, &once);
        prop_assert_eq!(twice, once);
    }
}
