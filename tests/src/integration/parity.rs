//! # Blocking / Suspending Parity
//!
//! Both services must produce byte-identical results for every operation,
//! so a record created by one is always verifiable by the other.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use sha_infinity::{
        AsyncIntegrityApi, AsyncIntegrityService, ChainConfig, Digest, EngineConfig, FixedClock, IntegrityApi,
        IntegrityService, Sha256Backend,
    };
    use shared_crypto::sha256;

    fn services() -> (Arc<dyn IntegrityApi>, Arc<dyn AsyncIntegrityApi>) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let backend = Arc::new(Sha256Backend);
        (
            Arc::new(IntegrityService::with_clock(backend.clone(), EngineConfig::default(), clock.clone()).unwrap()),
            Arc::new(AsyncIntegrityService::with_clock(backend, EngineConfig::default(), clock).unwrap()),
        )
    }

    fn states() -> Vec<Value> {
        vec![
            json!(null),
            json!({}),
            json!([]),
            json!({"b": 1, "a": [true, false, null, 1.5, -3]}),
            json!({"nested": {"deep": {"deeper": ["x", {"y": "\u{00e9}\n"}]}}}),
        ]
    }

    #[tokio::test]
    async fn test_chain_hash_parity() {
        let (blocking, suspending) = services();
        for depth in [1, 2, 7, 16, 17, 33, 256] {
            for (salt, binding) in [(true, true), (true, false), (false, true), (false, false)] {
                let mut config = ChainConfig::default().with_depth(depth).with_depth_binding(binding);
                if !salt {
                    config = config.without_salt();
                }
                assert_eq!(
                    blocking.chain_hash(b"parity", &config).unwrap(),
                    suspending.chain_hash(b"parity", &config).await.unwrap(),
                    "depth {} salt {} binding {}",
                    depth,
                    salt,
                    binding
                );
            }
        }
    }

    #[tokio::test]
    async fn test_records_cross_verify() {
        let (blocking, suspending) = services();
        for state in states() {
            let from_blocking = blocking.create_integrity(&state, None).unwrap();
            let from_suspending = suspending.create_integrity(&state, None).await.unwrap();
            assert_eq!(from_blocking, from_suspending);

            assert!(suspending.verify_integrity(&state, &from_blocking).await.unwrap().valid);
            assert!(blocking.verify_integrity(&state, &from_suspending).unwrap().valid);
        }
    }

    #[tokio::test]
    async fn test_merkle_parity() {
        let (blocking, suspending) = services();
        for n in 0..9u8 {
            let leaves: Vec<Digest> = (0..n).map(|i| sha256(&[i])).collect();
            assert_eq!(
                blocking.merkle_root(&leaves, Some(5)).unwrap(),
                suspending.merkle_root(&leaves, Some(5)).await.unwrap(),
                "{} leaves",
                n
            );
        }
    }

    #[tokio::test]
    async fn test_pow_and_link_parity() {
        let (blocking, suspending) = services();

        assert_eq!(
            blocking.proof_of_work(b"block", Some(2), Some(3)).unwrap(),
            suspending.proof_of_work(b"block", Some(2), Some(3)).await.unwrap()
        );

        let previous = sha256(b"genesis");
        assert_eq!(
            blocking.chain_link(&previous, b"event", None).unwrap(),
            suspending.chain_link(&previous, b"event", None).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_concurrent_tasks_share_service() {
        let (blocking, suspending) = services();

        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let service = Arc::clone(&suspending);
                tokio::spawn(async move {
                    let state = json!({"task": i % 4});
                    service.create_integrity(&state, None).await
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let record = handle.await.unwrap().unwrap();
            let expected = blocking
                .create_integrity(&json!({"task": i as u32 % 4}), None)
                .unwrap();
            assert_eq!(record, expected);
        }
    }

    #[tokio::test]
    async fn test_abandoned_search_returns_control() {
        let (_, suspending) = services();
        // Difficulty 64 is never met within the default budget
        let search = suspending.proof_of_work(b"block", Some(64), Some(1));
        assert!(timeout(Duration::from_millis(50), search).await.is_err());

        // The service is still usable afterwards
        let record = suspending.create_integrity(&json!({"ok": true}), None).await.unwrap();
        assert!(suspending
            .verify_integrity(&json!({"ok": true}), &record)
            .await
            .unwrap()
            .valid);
    }
}
