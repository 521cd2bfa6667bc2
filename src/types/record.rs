use num_bigint::BigUint;

use crate::types::Address;

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: [u8; 32] = [
    0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68,
    0xfc, 0x37, 0x8d, 0xaa, 0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16,
    0x28, 0xf5, 0x5a, 0x4d, 0xf5, 0x23, 0xb3, 0xef,
];

/// Which upstream list a record was normalized from. Both variants share
/// the same shape; nothing downstream of the provider branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    NativeList,
    TokenList,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
}

/// A normalized transaction line. Amounts stay in integer base units until
/// the display boundary.
#[derive(Debug, Clone)]
pub struct RawTransactionRecord {
    pub hash: String,
    pub from: Address,
    pub to: Option<Address>,
    pub value_wei: BigUint,
    pub gas_used: Option<BigUint>,
    pub gas_price_wei: Option<BigUint>,
    pub timestamp: Option<i64>,
    pub source: RecordSource,
    pub logs: Vec<LogEntry>,
}

#[test]
fn test_transfer_topic_matches_event_signature() {
    use sha3::{Digest, Keccak256};

    let mut hasher = Keccak256::new();
    hasher.update(b"Transfer(address,address,uint256)");
    let digest: [u8; 32] = hasher.finalize().into();
    assert_eq!(digest, TRANSFER_TOPIC);
}
