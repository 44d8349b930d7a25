//! # Property Tests
//!
//! Invariants that must hold for arbitrary state, not just the fixtures.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    use sha_infinity::{EngineConfig, IntegrityApi, IntegrityService, Sha256Backend};
    use shared_crypto::sha256;

    fn service() -> IntegrityService<Sha256Backend> {
        IntegrityService::sha256(EngineConfig::default().with_cache_capacity(0)).unwrap()
    }

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            prop::num::f64::NORMAL.prop_map(Value::from),
            "[ -~é\n]{0,12}".prop_map(Value::String),
        ]
    }

    fn arb_state() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    /// Same object with keys inserted in reverse order
    fn reinsert_reversed(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut reversed = Map::new();
                for (key, child) in map.iter().rev() {
                    reversed.insert(key.clone(), reinsert_reversed(child));
                }
                Value::Object(reversed)
            }
            Value::Array(items) => Value::Array(items.iter().map(reinsert_reversed).collect()),
            other => other.clone(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_record_round_trip(state in arb_state()) {
            let service = service();
            let record = service.create_integrity(&state, None).unwrap();
            let report = service.verify_integrity(&state, &record).unwrap();
            prop_assert!(report.valid);
            prop_assert_eq!(report.valid, report.sha256_valid && report.sha_infinity_valid);
        }

        #[test]
        fn prop_key_order_independent(state in arb_state()) {
            let service = service();
            let a = service.create_integrity(&state, None).unwrap();
            let b = service.create_integrity(&reinsert_reversed(&state), None).unwrap();
            prop_assert_eq!(a.plain_digest, b.plain_digest);
            prop_assert_eq!(a.chained_digest, b.chained_digest);
        }

        #[test]
        fn prop_wrapping_changes_digest(state in arb_state()) {
            let service = service();
            let record = service.create_integrity(&state, None).unwrap();
            let wrapped = json!({"wrapped": state});
            prop_assert!(!service.verify_integrity(&wrapped, &record).unwrap().valid);
        }

        #[test]
        fn prop_depth_sensitive(data in prop::collection::vec(any::<u8>(), 0..64), depth in 1u32..256) {
            let service = service();
            prop_assert_ne!(
                service.chain_hash_at(&data, Some(depth)).unwrap(),
                service.chain_hash_at(&data, Some(depth + 1)).unwrap()
            );
        }

        #[test]
        fn prop_singleton_merkle_root(seed in any::<u64>(), depth in 1u32..=8) {
            let leaf = sha256(&seed.to_le_bytes());
            prop_assert_eq!(service().merkle_root(&[leaf], Some(depth)).unwrap(), leaf);
        }

        #[test]
        fn prop_merkle_proof_round_trip(n in 1usize..12, pick in any::<prop::sample::Index>()) {
            let service = service();
            let leaves: Vec<_> = (0..n as u64).map(|i| sha256(&i.to_le_bytes())).collect();
            let index = pick.index(n);
            let proof = service.merkle_proof(&leaves, index, Some(2)).unwrap();
            prop_assert_eq!(proof.root, service.merkle_root(&leaves, Some(2)).unwrap());
            prop_assert!(service.verify_merkle_proof(&proof, Some(2)).unwrap());
        }
    }
}
