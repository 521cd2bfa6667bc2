use serde_json::json;

use crate::{
    error::Error,
    provider::HTTP,
    types::{Address, RpcBody},
};

// Function selectors of the naming-system contracts (ENS registry and
// resolver interfaces, shared by BaseNames and the .op name service).
pub const SELECTOR_RESOLVER: [u8; 4] = [0x01, 0x78, 0xb8, 0xbf];
pub const SELECTOR_ADDR: [u8; 4] = [0x3b, 0x3b, 0x57, 0xde];
pub const SELECTOR_NAME: [u8; 4] = [0x69, 0x1f, 0x34, 0x31];
pub const SELECTOR_TEXT: [u8; 4] = [0x59, 0xd1, 0xd4, 0x3c];

/// Read-only `eth_call` against a contract, returning the raw ABI output.
pub async fn eth_call(
    http: &HTTP,
    rpc_url: &str,
    to: &Address,
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_call",
        "params": [
            {
                "to": to.to_string(),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest",
        ],
    });

    let body = http
        .client()
        .post(rpc_url)
        .json(&payload)
        .send()
        .await?
        .json::<RpcBody>()
        .await?;

    if let Some(error) = body.error {
        return Err(Error::UpstreamUnavailable(format!(
            "rpc error {}: {}",
            error.code, error.message
        )));
    }

    let result = body.result.unwrap_or_default();
    Ok(hex::decode(result.trim_start_matches("0x"))?)
}

/// `selector(bytes32)` calldata: resolver/addr/name lookups.
pub fn call_with_node(selector: [u8; 4], node: [u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&node);
    data
}

/// `text(bytes32,string)` calldata; the key is ABI-encoded as a dynamic
/// string at offset 0x40.
pub fn call_text(node: [u8; 32], key: &str) -> Vec<u8> {
    let key_bytes = key.as_bytes();
    let padded_len = key_bytes.len().div_ceil(32) * 32;

    let mut data = Vec::with_capacity(4 + 96 + padded_len);
    data.extend_from_slice(&SELECTOR_TEXT);
    data.extend_from_slice(&node);

    let mut offset = [0u8; 32];
    offset[31] = 0x40;
    data.extend_from_slice(&offset);

    let mut length = [0u8; 32];
    length[24..].copy_from_slice(&(key_bytes.len() as u64).to_be_bytes());
    data.extend_from_slice(&length);

    data.extend_from_slice(key_bytes);
    data.resize(data.len() + (padded_len - key_bytes.len()), 0);
    data
}

/// Decode a single `address` return value.
pub fn decode_address_word(output: &[u8]) -> Option<Address> {
    if output.len() < 32 {
        return None;
    }
    Address::from_word(&output[..32])
}

/// Decode a single dynamic `string` return value.
pub fn decode_string(output: &[u8]) -> Option<String> {
    if output.len() < 64 {
        return None;
    }

    let offset = u64::from_be_bytes(output[24..32].try_into().ok()?) as usize;
    let length_end = offset.checked_add(32)?;
    if output.len() < length_end {
        return None;
    }

    let length =
        u64::from_be_bytes(output[offset + 24..length_end].try_into().ok()?)
            as usize;
    let data_end = length_end.checked_add(length)?;
    if output.len() < data_end {
        return None;
    }

    let value = String::from_utf8(output[length_end..data_end].to_vec()).ok()?;
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[test]
fn test_call_with_node_layout() {
    let node = [0xab; 32];
    let data = call_with_node(SELECTOR_ADDR, node);
    assert_eq!(data.len(), 36);
    assert_eq!(&data[..4], &SELECTOR_ADDR);
    assert_eq!(&data[4..], &node);
}

#[test]
fn test_call_text_layout() {
    let data = call_text([0u8; 32], "avatar");
    // selector + node + offset + length + one padded word
    assert_eq!(data.len(), 4 + 32 + 32 + 32 + 32);
    assert_eq!(data[4 + 32 + 31], 0x40);
    assert_eq!(data[4 + 64 + 31], 6);
    assert_eq!(&data[4 + 96..4 + 96 + 6], b"avatar");
}

#[test]
fn test_decode_string() {
    let mut output = vec![0u8; 96];
    output[31] = 0x20; // offset
    output[63] = 5; // length
    output[64..69].copy_from_slice(b"hello");
    assert_eq!(decode_string(&output).as_deref(), Some("hello"));

    // empty strings collapse to None
    let mut empty = vec![0u8; 64];
    empty[31] = 0x20;
    assert_eq!(decode_string(&empty), None);

    assert_eq!(decode_string(&[0u8; 16]), None);
}

#[test]
fn test_decode_address_word() {
    let mut output = [0u8; 32];
    output[12..].copy_from_slice(&[0x22; 20]);
    let address = decode_address_word(&output).unwrap();
    assert_eq!(address.as_bytes(), &[0x22; 20]);
    assert_eq!(decode_address_word(&[0u8; 8]), None);
}
