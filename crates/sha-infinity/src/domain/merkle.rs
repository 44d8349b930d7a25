//! # Merkle Aggregation
//!
//! Folds an ordered sequence of digests into a single root using
//! SHA-Infinity for every pair.
//!
//! # Algorithm
//!
//! - Empty input: `chain_hash("empty")`
//! - One leaf: the leaf itself, not re-hashed
//! - Otherwise pair left to right, duplicating the last digest of an odd
//!   level, combine each pair as `chain_hash(hex(left) ++ hex(right))` with
//!   the depth binding switched off, and repeat until one digest remains.
//!
//! # Time Complexity: O(n) chain hashes
//! # Proof Size: O(log n)

use serde::{Deserialize, Serialize};
use shared_crypto::Digest;

use crate::config::ChainConfig;
use crate::domain::chain::ChainHasher;
use crate::error::IntegrityError;

/// Input hashed to produce the root of an empty sequence
pub const EMPTY_TREE_SENTINEL: &[u8] = b"empty";

/// Which side the sibling sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Sibling is the left operand
    Left,
    /// Sibling is the right operand
    Right,
}

/// One step of an inclusion proof
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    pub hash: Digest,
    pub position: Position,
}

/// Inclusion proof for a single leaf
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf: Digest,
    pub index: usize,
    pub path: Vec<ProofNode>,
    pub root: Digest,
}

/// Config used to combine pairs: same chain, no depth binding
pub fn pair_config(config: &ChainConfig) -> ChainConfig {
    config.clone().with_depth_binding(false)
}

/// Pair input: the two hex strings concatenated
pub fn pair_input(left: &Digest, right: &Digest) -> Vec<u8> {
    let mut input = left.to_hex().into_bytes();
    input.extend_from_slice(right.to_hex().as_bytes());
    input
}

/// Pair inputs of one level, duplicating the last digest when odd
pub fn level_inputs(level: &[Digest]) -> Vec<Vec<u8>> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            pair_input(left, right)
        })
        .collect()
}

/// Parse hex strings into digests, failing on the first malformed entry
pub fn parse_digests<S: AsRef<str>>(hashes: &[S]) -> Result<Vec<Digest>, IntegrityError> {
    hashes
        .iter()
        .map(|h| Digest::from_hex(h.as_ref()).map_err(IntegrityError::from))
        .collect()
}

/// Sibling of the node at `position` within one level
pub fn sibling_node(level: &[Digest], position: usize) -> ProofNode {
    if position % 2 == 0 {
        // Unpaired last element is combined with itself
        let sibling = level.get(position + 1).unwrap_or(&level[position]);
        ProofNode {
            hash: *sibling,
            position: Position::Right,
        }
    } else {
        ProofNode {
            hash: level[position - 1],
            position: Position::Left,
        }
    }
}

fn combine_level<H>(hasher: &H, level: &[Digest], config: &ChainConfig) -> Result<Vec<Digest>, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    level_inputs(level)
        .iter()
        .map(|input| hasher.chain_hash(input, config))
        .collect()
}

/// Compute the Merkle root of `leaves`
pub fn merkle_root<H>(hasher: &H, leaves: &[Digest], config: &ChainConfig) -> Result<Digest, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    config.validate()?;

    match leaves {
        [] => hasher.chain_hash(EMPTY_TREE_SENTINEL, config),
        [single] => Ok(*single),
        _ => {
            let pair_config = pair_config(config);
            let mut level = leaves.to_vec();
            while level.len() > 1 {
                level = combine_level(hasher, &level, &pair_config)?;
            }
            Ok(level[0])
        }
    }
}

/// Build an inclusion proof for the leaf at `index`
pub fn merkle_proof<H>(
    hasher: &H,
    leaves: &[Digest],
    index: usize,
    config: &ChainConfig,
) -> Result<MerkleProof, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    config.validate()?;

    if index >= leaves.len() {
        return Err(IntegrityError::LeafIndexOutOfRange {
            index,
            len: leaves.len(),
        });
    }

    let pair_config = pair_config(config);
    let mut path = Vec::new();
    let mut level = leaves.to_vec();
    let mut position = index;

    while level.len() > 1 {
        path.push(sibling_node(&level, position));

        level = combine_level(hasher, &level, &pair_config)?;
        position /= 2;
    }

    Ok(MerkleProof {
        leaf: leaves[index],
        index,
        path,
        root: level[0],
    })
}

/// Check an inclusion proof against `root`
pub fn verify_merkle_proof<H>(
    hasher: &H,
    leaf: &Digest,
    path: &[ProofNode],
    root: &Digest,
    config: &ChainConfig,
) -> Result<bool, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    config.validate()?;

    let pair_config = pair_config(config);
    let mut current = *leaf;

    for node in path {
        let input = match node.position {
            Position::Left => pair_input(&node.hash, &current),
            Position::Right => pair_input(&current, &node.hash),
        };
        current = hasher.chain_hash(&input, &pair_config)?;
    }

    Ok(current == *root)
}
