//! # Integrity Flows
//!
//! End-to-end usage of the blocking service:
//!
//! 1. **Seal and verify**: a state document carries its own record
//! 2. **Tamper detection**: any content change fails verification
//! 3. **Audit trail**: links re-derive from their stored timestamps
//! 4. **Cache transparency**: cached and uncached services agree

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;

    use sha_infinity::{
        DepthViolation, Digest, DocumentVerification, EngineConfig, FixedClock, IntegrityApi, IntegrityError,
        IntegrityMetrics, IntegrityService, Sha256Backend,
    };
    use shared_crypto::sha256;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn board() -> Value {
        json!({
            "columns": ["backlog", "doing", "done"],
            "cards": [
                {"id": 1, "title": "Wire cache", "column": "done"},
                {"id": 2, "title": "Audit trail", "column": "doing", "tags": ["ops", "café"]}
            ],
            "metadata": {"owner": "ops", "revision": 12}
        })
    }

    fn fixed_service(config: EngineConfig) -> IntegrityService<Sha256Backend, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        IntegrityService::with_clock(Arc::new(Sha256Backend), config, clock).unwrap()
    }

    // =============================================================================
    // SEAL / VERIFY
    // =============================================================================

    #[test]
    fn test_seal_round_trip_through_text() {
        let service = fixed_service(EngineConfig::default());
        let (sealed, record) = service.seal_document(&board(), Some(12)).unwrap();

        // Persist and reload the way a state file would be
        let text = serde_json::to_string_pretty(&sealed).unwrap();
        let reloaded: Value = serde_json::from_str(&text).unwrap();

        match service.verify_document(&reloaded).unwrap() {
            DocumentVerification::Checked { record: embedded, report } => {
                assert_eq!(embedded, record);
                assert!(report.valid);
                assert!(report.algorithm_recognized);
                assert_eq!(report.original_timestamp, record.created_at);
            }
            other => panic!("expected a checked document, got {:?}", other),
        }
    }

    #[test]
    fn test_resealing_replaces_record() {
        let service = fixed_service(EngineConfig::default());
        let (sealed, first) = service.seal_document(&board(), None).unwrap();
        let (resealed, second) = service.seal_document(&sealed, None).unwrap();

        assert_eq!(first, second);
        assert_eq!(sealed, resealed);
    }

    #[test]
    fn test_tampering_detected() {
        let service = fixed_service(EngineConfig::default());
        let record = service.create_integrity(&board(), None).unwrap();

        let edits: Vec<fn(&mut Value)> = vec![
            |v: &mut Value| v["cards"][0]["column"] = json!("doing"),
            |v: &mut Value| v["columns"].as_array_mut().unwrap().reverse(),
            |v: &mut Value| v["metadata"]["revision"] = json!(13),
            |v: &mut Value| v["cards"][1]["tags"][1] = json!("cafe"),
            |v: &mut Value| v["extra"] = json!(null),
        ];

        for edit in edits {
            let mut tampered = board();
            edit(&mut tampered);
            let report = service.verify_integrity(&tampered, &record).unwrap();
            assert!(!report.valid);
            assert!(!report.sha256_valid);
            assert!(!report.sha_infinity_valid);
        }
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let service = fixed_service(EngineConfig::default());
        let reordered: Value = serde_json::from_str(
            r#"{"metadata":{"revision":12,"owner":"ops"},
                "cards":[{"column":"done","title":"Wire cache","id":1},
                         {"tags":["ops","café"],"column":"doing","title":"Audit trail","id":2}],
                "columns":["backlog","doing","done"]}"#,
        )
        .unwrap();

        let record = service.create_integrity(&board(), None).unwrap();
        assert!(service.verify_integrity(&reordered, &record).unwrap().valid);
    }

    #[test]
    fn test_record_verified_by_differently_configured_service() {
        // Verification uses the depth stored on the record, not the service default
        let sealing = fixed_service(EngineConfig::default());
        let record = sealing.create_integrity(&board(), Some(31)).unwrap();

        let checking = fixed_service(EngineConfig::default().with_cache_capacity(0));
        assert!(checking.verify_integrity(&board(), &record).unwrap().valid);
    }

    #[test]
    fn test_invalid_depths_rejected_before_hashing() {
        let metrics = Arc::new(IntegrityMetrics::new());
        let service = fixed_service(EngineConfig::default()).with_metrics(metrics.clone());

        for (depth, expected) in [(0, DepthViolation::TooLow), (257, DepthViolation::TooHigh)] {
            match service.create_integrity(&board(), Some(depth)) {
                Err(IntegrityError::InvalidDepth { violation, .. }) => assert_eq!(violation, expected),
                other => panic!("expected InvalidDepth, got {:?}", other),
            }
        }
        assert_eq!(metrics.snapshot().digest_applications, 0);

        assert!(service.create_integrity(&board(), Some(1)).is_ok());
        assert!(service.create_integrity(&board(), Some(256)).is_ok());
    }

    // =============================================================================
    // AUDIT TRAIL
    // =============================================================================

    #[test]
    fn test_audit_trail_re_derives() {
        let service = fixed_service(EngineConfig::default());
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let events = ["card 1 created", "card 1 moved to doing", "card 1 moved to done"];

        let mut previous: Digest = sha256(b"genesis");
        let mut trail = Vec::new();
        for (i, event) in events.iter().enumerate() {
            let at = start + Duration::minutes(i as i64);
            let link = service
                .chain_link_at(&previous, event.as_bytes(), None, at)
                .unwrap();
            previous = link.hash;
            trail.push(link);
        }

        for (link, event) in trail.iter().zip(events) {
            assert!(service.verify_chain_link(link, event.as_bytes(), None).unwrap());
        }
        for pair in trail.windows(2) {
            assert_eq!(pair[1].previous, pair[0].hash);
        }

        // Rewriting history breaks the link
        assert!(!service
            .verify_chain_link(&trail[1], b"card 1 moved to backlog", None)
            .unwrap());
    }

    #[test]
    fn test_chain_link_uses_clock() {
        let service = fixed_service(EngineConfig::default());
        let previous = sha256(b"genesis");

        let link = service.chain_link(&previous, b"event", None).unwrap();
        assert_eq!(link.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        assert_eq!(
            link,
            service.chain_link_at(&previous, b"event", None, link.timestamp).unwrap()
        );
    }

    // =============================================================================
    // MERKLE
    // =============================================================================

    #[test]
    fn test_merkle_proofs_for_every_leaf() {
        let service = fixed_service(EngineConfig::default());
        let leaves: Vec<Digest> = (0..7u8).map(|i| sha256(&[i])).collect();
        let root = service.merkle_root(&leaves, Some(3)).unwrap();

        for index in 0..leaves.len() {
            let proof = service.merkle_proof(&leaves, index, Some(3)).unwrap();
            assert_eq!(proof.root, root);
            assert!(service.verify_merkle_proof(&proof, Some(3)).unwrap());

            let mut forged = proof.clone();
            forged.leaf = sha256(b"forged");
            assert!(!service.verify_merkle_proof(&forged, Some(3)).unwrap());
        }

        assert!(matches!(
            service.merkle_proof(&leaves, 7, Some(3)),
            Err(IntegrityError::LeafIndexOutOfRange { index: 7, len: 7 })
        ));
    }

    #[test]
    fn test_merkle_root_of_records() {
        let service = fixed_service(EngineConfig::default());
        let records: Vec<_> = (0..4)
            .map(|i| service.create_integrity(&json!({"shard": i}), None).unwrap())
            .collect();
        let hashes: Vec<String> = records.iter().map(|r| r.chained_digest.to_hex()).collect();

        let from_hex = service.merkle_root_hex(&hashes, None).unwrap();
        let leaves: Vec<Digest> = records.iter().map(|r| r.chained_digest).collect();
        assert_eq!(from_hex, service.merkle_root(&leaves, None).unwrap());

        let mut swapped = leaves.clone();
        swapped.swap(0, 1);
        assert_ne!(from_hex, service.merkle_root(&swapped, None).unwrap());
    }

    // =============================================================================
    // CACHE
    // =============================================================================

    #[test]
    fn test_cache_transparency() {
        let cached = fixed_service(EngineConfig::default());
        let uncached = fixed_service(EngineConfig::default().with_cache_capacity(0));
        assert!(uncached.cache_stats().is_none());

        for _ in 0..2 {
            for depth in [1, 7, 64] {
                assert_eq!(
                    cached.chain_hash_at(b"payload", Some(depth)).unwrap(),
                    uncached.chain_hash_at(b"payload", Some(depth)).unwrap()
                );
            }
        }

        let stats = cached.cache_stats().unwrap();
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.hits, 3);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let service = fixed_service(EngineConfig::default().with_cache_capacity(2));

        service.chain_hash_at(b"a", None).unwrap();
        service.chain_hash_at(b"b", None).unwrap();
        service.chain_hash_at(b"a", None).unwrap();
        service.chain_hash_at(b"c", None).unwrap(); // evicts b

        let stats = service.cache_stats().unwrap();
        assert_eq!(stats.len, 2);
        assert_eq!(stats.evictions, 1);

        service.chain_hash_at(b"a", None).unwrap();
        service.chain_hash_at(b"b", None).unwrap();
        let stats = service.cache_stats().unwrap();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 4);
    }

    #[test]
    fn test_pow_does_not_fill_cache() {
        let service = fixed_service(EngineConfig::default());
        let result = service.proof_of_work(b"block", Some(1), Some(2)).unwrap();
        assert!(result.verified);
        assert!(service
            .verify_proof_of_work(b"block", result.nonce, 1, Some(2))
            .unwrap());
        assert_eq!(service.cache_stats().unwrap().len, 0);
    }
}
