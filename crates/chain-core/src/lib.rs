pub mod chain;
pub mod constants;
pub mod error;
pub mod validate;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use error::{BlockFault, ChainError};

pub type Result<T> = std::result::Result<T, ChainError>;

/// Caller-supplied fields for a new block.
///
/// Missing object fields deserialize to empty strings so that they are
/// rejected by [`Block::next`] rather than by the JSON layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "metainfo", default, skip_serializing_if = "String::is_empty")]
    pub meta_info: String,
    #[serde(rename = "objecta", default)]
    pub object_a: String,
    #[serde(rename = "objectb", default)]
    pub object_b: String,
    #[serde(rename = "objectc", default)]
    pub object_c: String,
}

impl Payload {
    pub fn new(
        object_a: impl Into<String>,
        object_b: impl Into<String>,
        object_c: impl Into<String>,
    ) -> Self {
        Self {
            meta_info: String::new(),
            object_a: object_a.into(),
            object_b: object_b.into(),
            object_c: object_c.into(),
        }
    }

    pub fn with_meta_info(mut self, meta_info: impl Into<String>) -> Self {
        self.meta_info = meta_info.into();
        self
    }

    fn has_empty_object(&self) -> bool {
        self.object_a.is_empty() || self.object_b.is_empty() || self.object_c.is_empty()
    }
}

/// One record of the chain. Fields are read-only once the block is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    #[serde(rename = "metainfo", default)]
    meta_info: String,
    #[serde(rename = "objecta")]
    object_a: String,
    #[serde(rename = "objectb")]
    object_b: String,
    #[serde(rename = "objectc")]
    object_c: String,
    timestamp: String,
    hash: String,
    #[serde(rename = "prevhash")]
    prev_hash: String,
}

impl Block {
    /// The genesis block stamped with the current time.
    pub fn genesis() -> Self {
        Self::genesis_at(now())
    }

    pub fn genesis_at(timestamp: impl Into<String>) -> Self {
        Self::seal(
            0,
            constants::GENESIS_META_INFO.to_string(),
            constants::GENESIS_OBJECT_A.to_string(),
            constants::GENESIS_OBJECT_B.to_string(),
            constants::GENESIS_OBJECT_C.to_string(),
            timestamp.into(),
            String::new(),
        )
    }

    /// Derive the successor of `tip` from `payload`, stamped with the current time.
    pub fn next(tip: &Block, payload: &Payload) -> Result<Self> {
        Self::next_at(tip, payload, now())
    }

    pub fn next_at(tip: &Block, payload: &Payload, timestamp: impl Into<String>) -> Result<Self> {
        if payload.has_empty_object() {
            return Err(ChainError::Validation);
        }
        Ok(Self::seal(
            tip.index.saturating_add(1),
            payload.meta_info.clone(),
            payload.object_a.clone(),
            payload.object_b.clone(),
            payload.object_c.clone(),
            timestamp.into(),
            tip.hash.clone(),
        ))
    }

    fn seal(
        index: u64,
        meta_info: String,
        object_a: String,
        object_b: String,
        object_c: String,
        timestamp: String,
        prev_hash: String,
    ) -> Self {
        let mut block = Self {
            index,
            meta_info,
            object_a,
            object_b,
            object_c,
            timestamp,
            hash: String::new(),
            prev_hash,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the content hash from this block's own fields.
    pub fn compute_hash(&self) -> String {
        calculate_hash(
            self.index,
            &self.timestamp,
            &self.object_a,
            &self.object_b,
            &self.object_c,
            &self.prev_hash,
        )
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn meta_info(&self) -> &str {
        &self.meta_info
    }

    pub fn object_a(&self) -> &str {
        &self.object_a
    }

    pub fn object_b(&self) -> &str {
        &self.object_b
    }

    pub fn object_c(&self) -> &str {
        &self.object_c
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }
}

/// Hex SHA-256 over `index ‖ timestamp ‖ object_a ‖ object_b ‖ object_c ‖ prev_hash`.
///
/// The index is rendered in decimal and the parts are joined with no
/// separator. `meta_info` is not covered. Other implementations of the chain
/// rely on this exact layout, so it must not change.
pub fn calculate_hash(
    index: u64,
    timestamp: &str,
    object_a: &str,
    object_b: &str,
    object_c: &str,
    prev_hash: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string());
    hasher.update(timestamp);
    hasher.update(object_a);
    hasher.update(object_b);
    hasher.update(object_c);
    hasher.update(prev_hash);
    hex::encode(hasher.finalize())
}

fn now() -> String {
    Utc::now().format(constants::TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-05-01 09:30:00.000000000 +0000 UTC";
    const GENESIS_HASH: &str = "80c25fffabc8ba27f8f185fd2251ff3424b01c22de2d7da863028b309064f792";

    fn payload() -> Payload {
        Payload::new("A", "B", "C")
    }

    #[test]
    fn genesis_block_example() {
        let genesis = Block::genesis_at(TS);
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.meta_info(), "Genesis");
        assert_eq!(genesis.object_a(), "A");
        assert_eq!(genesis.object_b(), "B");
        assert_eq!(genesis.object_c(), "C");
        assert_eq!(genesis.prev_hash(), "");
        assert_eq!(genesis.hash(), GENESIS_HASH);
    }

    #[test]
    fn block_hash_example() {
        let genesis = Block::genesis_at(TS);
        let block = Block::next_at(&genesis, &payload(), TS).unwrap();
        assert_eq!(
            block.hash(),
            "9caa4c96144384428c7b3d2489c063242298d50062934f3167e2239726e52f23"
        );
    }

    #[test]
    fn hash_is_plain_concatenation() {
        let joined = format!("1{TS}invoice-42shipment-7warehouse-3{GENESIS_HASH}");
        let expected = hex::encode(Sha256::digest(joined.as_bytes()));
        let actual = calculate_hash(
            1,
            TS,
            "invoice-42",
            "shipment-7",
            "warehouse-3",
            GENESIS_HASH,
        );
        assert_eq!(actual, expected);
        assert_eq!(
            actual,
            "450345a25703744e47d04b18c653a9091a06cf9aca5331e36e14cd99c61493ee"
        );
        assert_eq!(actual.len(), constants::HASH_HEX_SIZE);
    }

    #[test]
    fn meta_info_is_not_hashed() {
        let genesis = Block::genesis_at(TS);
        let plain = Block::next_at(&genesis, &payload(), TS).unwrap();
        let annotated =
            Block::next_at(&genesis, &payload().with_meta_info("note"), TS).unwrap();
        assert_eq!(plain.hash(), annotated.hash());
        assert_eq!(annotated.meta_info(), "note");
    }

    #[test]
    fn next_links_to_tip() {
        let genesis = Block::genesis_at(TS);
        let block = Block::next(&genesis, &payload()).unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.prev_hash(), genesis.hash());
        assert_eq!(block.hash(), block.compute_hash());
        assert!(!block.timestamp().is_empty());
    }

    #[test]
    fn next_rejects_each_empty_object() {
        let genesis = Block::genesis_at(TS);
        for p in [
            Payload::new("", "x", "y"),
            Payload::new("x", "", "y"),
            Payload::new("x", "y", ""),
        ] {
            assert!(matches!(
                Block::next(&genesis, &p),
                Err(ChainError::Validation)
            ));
        }
    }

    #[test]
    fn hash_changes_with_any_hashed_field() {
        let base = calculate_hash(1, TS, "A", "B", "C", GENESIS_HASH);
        assert_ne!(base, calculate_hash(2, TS, "A", "B", "C", GENESIS_HASH));
        assert_ne!(base, calculate_hash(1, "later", "A", "B", "C", GENESIS_HASH));
        assert_ne!(base, calculate_hash(1, TS, "a", "B", "C", GENESIS_HASH));
        assert_ne!(base, calculate_hash(1, TS, "A", "b", "C", GENESIS_HASH));
        assert_ne!(base, calculate_hash(1, TS, "A", "B", "c", GENESIS_HASH));
        assert_ne!(base, calculate_hash(1, TS, "A", "B", "C", ""));
    }

    #[test]
    fn block_serialization_uses_lowercase_keys() {
        let block = Block::genesis_at(TS);
        let value = serde_json::to_value(&block).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "hash",
                "index",
                "metainfo",
                "objecta",
                "objectb",
                "objectc",
                "prevhash",
                "timestamp"
            ]
        );
        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn payload_missing_objects_deserialize_empty() {
        let p: Payload = serde_json::from_str(r#"{"objecta":"A"}"#).unwrap();
        assert_eq!(p.object_a, "A");
        assert!(p.object_b.is_empty());
        assert!(p.has_empty_object());
    }

    #[test]
    fn timestamp_is_human_readable() {
        let ts = now();
        assert!(ts.ends_with("+0000 UTC"), "unexpected timestamp {ts}");
    }
}
