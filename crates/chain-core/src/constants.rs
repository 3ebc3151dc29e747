pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;

/// Placeholder payload carried by the genesis block.
pub const GENESIS_META_INFO: &str = "Genesis";
pub const GENESIS_OBJECT_A: &str = "A";
pub const GENESIS_OBJECT_B: &str = "B";
pub const GENESIS_OBJECT_C: &str = "C";

/// `2024-05-01 09:30:00.123456789 +0000 UTC`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z %Z";
