//! Submit (C9): hash a value, fan out to remote calendars concurrently,
//! and assemble the initial [`Timestamp`].
//!
//! Fan-out uses `futures::future::join_all` over one future per calendar
//! URL (spec.md §5's "tasks-and-join-all abstraction"); a single
//! calendar's failure never stops the others from contributing, mirroring
//! `server/src/api.rs`'s one-request-per-call shape generalized to N
//! concurrent requests.

use rand::RngCore;

use crate::calendar::CalendarClient;
use crate::codec;
use crate::codec::Timestamp;
use crate::config::SubmitOptions;
use crate::config::DEFAULT_FUDGE_LEN;
use crate::error::CodecError;
use crate::error::NetworkError;
use crate::error::ValidationError;
use crate::filehash::FileHash;
use crate::filehash::HashAlgorithm;
use crate::op::Op;
use crate::tree::Tree;

/// One calendar's submission failure, either at the transport layer or
/// while decoding its response.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("calendar {url} sent an unparseable tree: {source}")]
    Codec { url: String, source: CodecError },
}

/// Result of [`submit`]: the assembled timestamp (absent only if every
/// calendar failed) plus one error per calendar that failed.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub timestamp: Option<Timestamp>,
    pub errors: Vec<(String, SubmitError)>,
}

/// Computes `seed = sha256(value ++ fudge)`, POSTs it to every calendar in
/// `options.calendar_urls` concurrently, and assembles a [`Timestamp`]
/// whose root is `append(fudge) -> sha256 -> union(calendar subtrees)`.
/// The commitment hash is always SHA256 regardless of the file hash's own
/// algorithm; calendars are SHA256-only, matching the original
/// implementation's behaviour.
pub async fn submit(
    client: &dyn CalendarClient,
    algorithm: HashAlgorithm,
    value: &[u8],
    options: SubmitOptions,
) -> Result<SubmitOutcome, ValidationError> {
    if value.len() != algorithm.digest_len() {
        return Err(ValidationError::WrongDigestLength {
            algorithm: algorithm.name(),
            expected: algorithm.digest_len(),
            actual: value.len(),
        });
    }

    let fudge = options.fudge.unwrap_or_else(|| {
        let mut buf = vec![0u8; DEFAULT_FUDGE_LEN];
        rand::thread_rng().fill_bytes(&mut buf);
        buf
    });

    let mut seed_input = value.to_vec();
    seed_input.extend_from_slice(&fudge);
    let seed = crate::hash::sha256(&seed_input);

    let requests = options.calendar_urls.iter().map(|url| {
        let seed = &seed;
        async move {
            let result = client.post_digest(url, seed, options.timeout).await;
            (url.clone(), result)
        }
    });

    let responses = futures::future::join_all(requests).await;

    let mut merged = Tree::new();
    let mut errors = Vec::new();
    for (url, result) in responses {
        match result {
            Ok(body) => match codec::read_bare_tree(&body) {
                Ok(subtree) => {
                    log::info!("calendar {url} responded with a tree");
                    merged = merged.union(&subtree);
                }
                Err(source) => {
                    log::warn!("calendar {url} sent an unparseable tree: {source}");
                    errors.push((
                        url.clone(),
                        SubmitError::Codec {
                            url,
                            source,
                        },
                    ));
                }
            },
            Err(err) => {
                log::warn!("calendar {url} failed: {err}");
                errors.push((url, SubmitError::Network(err)));
            }
        }
    }

    if merged.is_empty() {
        return Ok(SubmitOutcome {
            timestamp: None,
            errors,
        });
    }

    let mut hash_tree = Tree::new();
    hash_tree.incorporate(Op::Sha256, merged);
    let mut root = Tree::new();
    root.incorporate(Op::Append(fudge), hash_tree);

    let timestamp = Timestamp {
        version: codec::CURRENT_VERSION,
        file_hash: FileHash::new(algorithm, value.to_vec())?,
        tree: root,
    };

    Ok(SubmitOutcome {
        timestamp: Some(timestamp),
        errors,
    })
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::leaf::Leaf;

    struct StubClient {
        responses: Vec<Result<Vec<u8>, NetworkError>>,
    }

    #[async_trait]
    impl CalendarClient for StubClient {
        async fn post_digest(
            &self,
            base_url: &str,
            _seed: &[u8],
            _timeout: Duration,
        ) -> Result<Vec<u8>, NetworkError> {
            let idx: usize = base_url.chars().last().unwrap().to_digit(10).unwrap() as usize;
            self.responses[idx].clone()
        }

        async fn get_timestamp(
            &self,
            _base_url: &str,
            _msg: &[u8],
            _timeout: Duration,
        ) -> Result<Vec<u8>, NetworkError> {
            unreachable!("submit never calls get_timestamp")
        }
    }

    impl Clone for NetworkError {
        fn clone(&self) -> Self {
            match self {
                NetworkError::HttpStatus { url, status, body } => NetworkError::HttpStatus {
                    url: url.clone(),
                    status: *status,
                    body: body.clone(),
                },
                NetworkError::Timeout { url, timeout_secs } => NetworkError::Timeout {
                    url: url.clone(),
                    timeout_secs: *timeout_secs,
                },
                NetworkError::Transport { url, .. } => NetworkError::HttpStatus {
                    url: url.clone(),
                    status: 0,
                    body: "transport error".into(),
                },
            }
        }
    }

    #[tokio::test]
    async fn merges_successful_calendars_and_records_failures() {
        let mut pending_tree = Tree::new();
        pending_tree.leaves.insert(Leaf::Pending {
            url: "https://calendar0".into(),
        });
        let ok_body = codec::write_bare_tree(&pending_tree);

        let client = StubClient {
            responses: vec![
                Ok(ok_body),
                Err(NetworkError::HttpStatus {
                    url: "https://calendar1".into(),
                    status: 500,
                    body: "oops".into(),
                }),
            ],
        };

        let options = SubmitOptions {
            calendar_urls: vec!["https://calendar0".into(), "https://calendar1".into()],
            fudge: Some(vec![0xAB; 16]),
            timeout: Duration::from_secs(1),
        };

        let outcome = submit(&client, HashAlgorithm::Sha1, &[0u8; 20], options)
            .await
            .unwrap();

        let ts = outcome.timestamp.unwrap();
        assert_eq!(outcome.errors.len(), 1);
        let append_subtree = ts.tree.edges.get(&Op::Append(vec![0xAB; 16])).unwrap();
        let hash_subtree = append_subtree.edges.get(&Op::Sha256).unwrap();
        assert!(hash_subtree.leaves.contains(&Leaf::Pending {
            url: "https://calendar0".into()
        }));
    }

    #[tokio::test]
    async fn all_calendars_failing_yields_no_timestamp() {
        let client = StubClient {
            responses: vec![Err(NetworkError::HttpStatus {
                url: "https://calendar0".into(),
                status: 500,
                body: "oops".into(),
            })],
        };
        let options = SubmitOptions {
            calendar_urls: vec!["https://calendar0".into()],
            fudge: Some(vec![0xAB; 16]),
            timeout: Duration::from_secs(1),
        };
        let outcome = submit(&client, HashAlgorithm::Sha1, &[0u8; 20], options)
            .await
            .unwrap();
        assert!(outcome.timestamp.is_none());
        assert_eq!(outcome.errors.len(), 1);
    }

    #[tokio::test]
    async fn commitment_hash_is_always_sha256_regardless_of_file_algorithm() {
        // Mirrors spec §8 scenario 5 literally: submit('sha1', 01..14,
        // 0102030c177b) must yield root edges append(fudge) then sha256,
        // never sha1. Calendars only ever see a SHA256 commitment.
        let value: Vec<u8> = (1..=20u8).collect();
        let fudge = vec![0x01, 0x02, 0x03, 0x0c, 0x17, 0x7b];

        let mut pending_tree = Tree::new();
        pending_tree.leaves.insert(Leaf::Pending {
            url: "https://calendar0".into(),
        });
        let client = StubClient {
            responses: vec![Ok(codec::write_bare_tree(&pending_tree))],
        };
        let options = SubmitOptions {
            calendar_urls: vec!["https://calendar0".into()],
            fudge: Some(fudge.clone()),
            timeout: Duration::from_secs(1),
        };

        let outcome = submit(&client, HashAlgorithm::Sha1, &value, options)
            .await
            .unwrap();
        let ts = outcome.timestamp.unwrap();

        let append_subtree = ts.tree.edges.get(&Op::Append(fudge)).unwrap();
        assert!(append_subtree.edges.contains_key(&Op::Sha256));
        assert!(!append_subtree.edges.contains_key(&Op::Sha1));
    }
}
