//! # Fixed Vectors
//!
//! Digests that stored records depend on. Any change here breaks every
//! record created by an earlier build.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sha_infinity::{ChainConfig, Digest, EngineConfig, IntegrityApi, IntegrityService};
    use shared_crypto::{sha256, sha256_hex};

    fn service() -> IntegrityService<sha_infinity::Sha256Backend> {
        IntegrityService::sha256(EngineConfig::default()).unwrap()
    }

    fn digest(hex: &str) -> Digest {
        hex.parse().unwrap()
    }

    fn unsalted(depth: u32) -> ChainConfig {
        ChainConfig::default()
            .with_depth(depth)
            .without_salt()
            .with_depth_binding(false)
    }

    #[test]
    fn test_hello_depth_one_is_plain_sha256() {
        let hash = service().chain_hash(b"hello", &unsalted(1)).unwrap();
        assert_eq!(
            hash.to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(hash, sha256(b"hello"));
    }

    #[test]
    fn test_hello_depth_three_applies_digest_to_hex_text() {
        let once = sha256_hex(b"hello");
        let twice = sha256_hex(once.as_bytes());
        let thrice = sha256(twice.as_bytes());

        let hash = service().chain_hash(b"hello", &unsalted(3)).unwrap();
        assert_eq!(hash, thrice);
        assert_eq!(
            hash.to_hex(),
            "ecd26292b7f02970ca6909abb23e1aedd0dd57d0ee9ff40bf3f30c325e3e453a"
        );
    }

    #[test]
    fn test_default_chain_of_hello() {
        let service = service();
        assert_eq!(
            service.chain_hash_at(b"hello", None).unwrap(),
            digest("156fb0a24218d62146d8f8d823865b2e36ad8a0b5d3481ba6819a2569a4e4fe4")
        );
        assert_eq!(
            service.chain_hash_at(b"hello", Some(8)).unwrap(),
            digest("b086ac5010e6cdbeaf93d3e7f195bcc4eef606dbb51159bfdf7ce218fb513aa1")
        );
    }

    #[test]
    fn test_record_of_small_state() {
        let record = service()
            .create_integrity(&json!({"b": [1, 2], "a": 1}), None)
            .unwrap();
        assert_eq!(
            record.plain_digest,
            digest("8baa73198470c7bb4c3ce142a8fd651affc0310d878bb9bd159e37a573fb4874")
        );
        assert_eq!(
            record.chained_digest,
            digest("3ee8cd5f3d8ee85a57f33a05573980a37f5737b8912c581e109c0b967fe9820c")
        );
        assert_eq!(record.chain_depth, 7);
        assert_eq!(record.format_version, "1.0.0");
        assert_eq!(record.algorithm_id, "sha-infinity-v1");
    }

    #[test]
    fn test_record_of_float_state() {
        let state = json!({"y": [0.5, 1e16], "x": 1e-5});
        assert_eq!(
            sha_infinity::to_canonical_json(&state).unwrap(),
            r#"{"x":1e-05,"y":[0.5,1e+16]}"#
        );

        let record = service().create_integrity(&state, None).unwrap();
        assert_eq!(
            record.plain_digest,
            digest("4c028d77f29158318980ea545253eb7459ef2aa3fbabaf012ed86ea2478f62dc")
        );
        assert_eq!(
            record.chained_digest,
            digest("8856f6870fab99fdf48a54096d7b3d1bb130f856e66dd59df95a4340126b46ae")
        );
    }

    #[test]
    fn test_empty_merkle_sentinel() {
        assert_eq!(
            service().merkle_root(&[], None).unwrap(),
            digest("fc9995b5a1dd0d6e3b6452721d94940561c79bd463597bc6d9d1fc7820b63eef")
        );
    }

    #[test]
    fn test_merkle_roots() {
        let service = service();
        let a = sha256(b"a");
        let b = sha256(b"b");
        let c = sha256(b"c");

        assert_eq!(
            service.merkle_root(&[a, b], None).unwrap(),
            digest("b35151f89dfe68b3c38b7099c02076e1965ebfe55255c3daa4602ef95f2ddc5d")
        );
        // Odd level: c is paired with itself
        assert_eq!(
            service.merkle_root(&[a, b, c], None).unwrap(),
            digest("396feef5267358f23f60d3bed486ee2fcc66a2a73204aa862234057abcf9b7bd")
        );
    }

    #[test]
    fn test_pow_finds_first_nonce() {
        let service = service();

        let result = service.proof_of_work(b"block", Some(2), Some(1)).unwrap();
        assert!(result.verified);
        assert_eq!(result.nonce, 209);
        assert_eq!(result.attempts, 210);
        assert_eq!(
            result.hash,
            digest("00910617b68cbf24aa2344d84ea4690031167948c409d1d30ea34ef13272b24c")
        );

        let result = service.proof_of_work(b"state", Some(3), None).unwrap();
        assert_eq!(result.nonce, 1074);
        assert!(result.hash.to_hex().starts_with("000"));
    }
}
