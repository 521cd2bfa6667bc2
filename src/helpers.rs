use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigUint;
use std::str::FromStr;

use crate::{error::Error, types::Address};

/// Render an integer base-unit amount as a decimal string. Trailing zeros
/// are trimmed but at least one fractional digit is kept, matching the
/// ethers `formatEther` convention ("6.0", "0.0").
pub fn format_units(value: &BigUint, decimals: u32) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;

    let (integer, fraction) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_owned(), digits[split..].to_owned())
    } else {
        (String::from("0"), format!("{:0>width$}", digits, width = decimals))
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", integer)
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Parse a base-10 integer amount as reported by the scan APIs.
pub fn parse_units(value: &str) -> Option<BigUint> {
    BigUint::parse_bytes(value.as_bytes(), 10)
}

/// `amount * price`, rounded half-up to exactly two places. Only used at
/// the display boundary; all sums stay integral before this point.
pub fn to_usd_string(amount: &str, price: f64) -> Result<String, Error> {
    let amount = BigDecimal::from_str(amount)?;
    let price = BigDecimal::try_from(price)?;
    let value = amount * price;
    Ok(value.with_scale_round(2, RoundingMode::HalfUp).to_string())
}

pub fn hex_to_u64(value: &str) -> Result<u64, Error> {
    let digits = value.trim_start_matches("0x");
    Ok(u64::from_str_radix(digits, 16)?)
}

/// Left-pad an address into a 32-byte ABI word.
pub fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Right-align an amount into a 32-byte ABI word.
pub fn amount_word(amount: &BigUint) -> [u8; 32] {
    let bytes = amount.to_bytes_be();
    let mut word = [0u8; 32];
    if bytes.len() >= 32 {
        word.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        word[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    word
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[test]
fn test_format_units() {
    let six_eth = BigUint::parse_bytes(b"6000000000000000000", 10).unwrap();
    assert_eq!(format_units(&six_eth, 18), "6.0");

    let zero = BigUint::default();
    assert_eq!(format_units(&zero, 18), "0.0");

    let dust = BigUint::parse_bytes(b"1", 10).unwrap();
    assert_eq!(format_units(&dust, 18), "0.000000000000000001");

    let usdc = BigUint::parse_bytes(b"12500000", 10).unwrap();
    assert_eq!(format_units(&usdc, 6), "12.5");

    let wei_only = BigUint::parse_bytes(b"42", 10).unwrap();
    assert_eq!(format_units(&wei_only, 0), "42.0");
}

#[test]
fn test_to_usd_string() {
    assert_eq!(to_usd_string("6.0", 2000.0).unwrap(), "12000.00");
    assert_eq!(to_usd_string("0.0", 2000.0).unwrap(), "0.00");
    assert_eq!(to_usd_string("1.005", 1.0).unwrap(), "1.01");
}

#[test]
fn test_amount_word_round_trip() {
    let amount = BigUint::parse_bytes(b"123456789", 10).unwrap();
    let word = amount_word(&amount);
    assert_eq!(BigUint::from_bytes_be(&word), amount);
}

#[test]
fn test_hex_to_u64() {
    assert_eq!(hex_to_u64("0x0").unwrap(), 0);
    assert_eq!(hex_to_u64("0x1a").unwrap(), 26);
    assert!(hex_to_u64("0xzz").is_err());
}
