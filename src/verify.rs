//! Verify (C12): for every non-pending leaf reachable in a [`Timestamp`],
//! ask every named verifier what Unix timestamp that attestation
//! corresponds to, and aggregate the results. Mirrors
//! [`crate::submit`]/[`crate::upgrade`]'s fan-out-with-`join_all` shape,
//! but the collaborator is a blockchain lookup rather than a calendar HTTP
//! call, so it's abstracted behind [`BoxVerifier`] rather than
//! [`crate::calendar::CalendarClient`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::codec::Timestamp;
use crate::config::VerifyOptions;
use crate::error::VerifierError;
use crate::leaf::Leaf;

/// A named blockchain lookup. Given a non-pending leaf and its final
/// message, a verifier either declines (`None`, e.g. the leaf is on a
/// chain this verifier doesn't serve), confirms (`Some(Ok(unix_time))`),
/// or fails (`Some(Err(..))`). Several verifiers may serve the same chain
/// (e.g. two independent block explorers) — they are distinguished by
/// [`BoxVerifier::name`], not by chain.
#[async_trait]
pub trait BoxVerifier: Send + Sync {
    /// Human-readable name this verifier reports results under (e.g.
    /// `"verifyViaBlockstream"`).
    fn name(&self) -> &str;

    /// Resolves `leaf` against `msg`, returning the attested block's Unix
    /// timestamp if confirmed, `None` if this verifier declines to handle
    /// `leaf` at all, or an error if the lookup itself failed.
    async fn verify_attestation(
        &self,
        leaf: &Leaf,
        msg: &[u8],
        timeout: Duration,
    ) -> Option<Result<u64, VerifierError>>;
}

/// Outcome of [`verify`]: every distinct Unix timestamp a verifier
/// confirmed, mapped to the verifiers that confirmed it, plus the errors
/// any verifier raised along the way.
#[derive(Debug, Default)]
pub struct VerifyOutcome {
    pub attestations: BTreeMap<u64, Vec<String>>,
    pub errors: BTreeMap<String, Vec<VerifierError>>,
}

/// Walks every non-pending leaf in `ts` and fans out one
/// `verify_attestation` call per (leaf, verifier) pair concurrently. A
/// verifier that declines a leaf (returns `None`) contributes nothing,
/// the same as if it had never been asked.
pub async fn verify(
    verifiers: &[Box<dyn BoxVerifier>],
    ts: &Timestamp,
    options: VerifyOptions,
) -> VerifyOutcome {
    let leaves: Vec<(Vec<crate::op::Op>, Leaf)> = ts
        .tree
        .paths()
        .into_iter()
        .filter(|(_, leaf)| !leaf.is_pending())
        .collect();

    let requests = leaves.iter().flat_map(|(ops, leaf)| {
        let msg = crate::tree::apply_ops(&ts.file_hash.value, ops);
        verifiers.iter().map(move |verifier| {
            let msg = msg.clone();
            let leaf = leaf.clone();
            async move {
                let result = verifier
                    .verify_attestation(&leaf, &msg, options.timeout)
                    .await;
                (verifier.name().to_string(), result)
            }
        })
    });

    let responses = futures::future::join_all(requests).await;

    let mut outcome = VerifyOutcome::default();
    for (name, result) in responses {
        match result {
            None => {}
            Some(Ok(unix_time)) => {
                log::info!("{name} confirmed attestation at {unix_time}");
                outcome.attestations.entry(unix_time).or_default().push(name);
            }
            Some(Err(err)) => {
                log::warn!("{name} failed to confirm attestation: {err}");
                outcome.errors.entry(name).or_default().push(err);
            }
        }
    }
    for verifiers in outcome.attestations.values_mut() {
        verifiers.sort();
        verifiers.dedup();
    }

    outcome
}
