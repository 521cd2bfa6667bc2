use std::{fmt, str::FromStr};

use sha3::{Digest, Keccak256};

use crate::error::Error;

/// A 20-byte EVM account address. Equality is over raw bytes, so two
/// addresses that differ only in hex casing compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Address {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Extract an address from the tail of a 32-byte ABI word (topics,
    /// return values).
    pub fn from_word(word: &[u8]) -> Option<Address> {
        if word.len() < 20 {
            return None;
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[word.len() - 20..]);
        Some(Address(bytes))
    }

    pub fn lowercase_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// EIP-55 mixed-case form, without the `0x` prefix.
    fn checksummed(&self) -> String {
        let lower = hex::encode(self.0);
        let mut hasher = Keccak256::new();
        hasher.update(lower.as_bytes());
        let digest = hasher.finalize();

        let mut out = String::with_capacity(40);
        for (index, c) in lower.chars().enumerate() {
            let shift = if index % 2 == 0 { 4 } else { 0 };
            let nibble = (digest[index / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.checksummed())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(value: &str) -> Result<Address, Error> {
        let hex_part = value.strip_prefix("0x").ok_or_else(|| {
            Error::InvalidIdentity(format!(
                "{} is not a valid 20-byte hex address",
                value
            ))
        })?;

        if hex_part.len() != 40
            || !hex_part.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidIdentity(format!(
                "{} is not a valid 20-byte hex address",
                value
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part.to_lowercase(), &mut bytes)?;
        let address = Address(bytes);

        // All-lower and all-upper inputs carry no checksum; mixed case must
        // match EIP-55 exactly.
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower && address.checksummed() != hex_part {
            return Err(Error::InvalidIdentity(format!(
                "{} has an invalid checksum",
                value
            )));
        }

        Ok(address)
    }
}

#[test]
fn test_checksummed_display() {
    let address: Address =
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
    assert_eq!(
        address.to_string(),
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
    );

    let address: Address =
        "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359".parse().unwrap();
    assert_eq!(
        address.to_string(),
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
    );
}

#[test]
fn test_parse_validation() {
    // valid checksummed input round-trips
    let address: Address =
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
    assert_eq!(
        address.to_string(),
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
    );

    // zero address is format-valid
    let zero: Address =
        "0x0000000000000000000000000000000000000000".parse().unwrap();
    assert!(zero.is_zero());

    // mixed case with a wrong checksum is rejected
    assert!("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        .parse::<Address>()
        .is_err());

    assert!("not-an-address".parse::<Address>().is_err());
    assert!("0x1234".parse::<Address>().is_err());
}

#[test]
fn test_from_word() {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&[0x11; 20]);
    let address = Address::from_word(&word).unwrap();
    assert_eq!(address.as_bytes(), &[0x11; 20]);

    assert_eq!(Address::from_word(&[0u8; 4]), None);
}
