use std::collections::HashSet;

use num_bigint::BigUint;

use crate::{
    helpers::format_units,
    model::VolumeStats,
    types::{Address, RawTransactionRecord},
};

const NATIVE_DECIMALS: u32 = 18;

/// Sum volumes and gas over a merged history. Pure and deterministic; all
/// arithmetic stays in integer base units, conversion to decimal strings
/// happens once on exit.
///
/// The merged input may carry the same transaction hash in both the native
/// and the token list. Gas and the outgoing counter are therefore tallied
/// once per unique hash, while token transfer amounts are summed per log
/// entry (one transaction can legitimately carry several transfers).
pub fn aggregate(
    records: &[RawTransactionRecord],
    owner: &Address,
    usdc_contract: &Address,
    usdc_decimals: u32,
) -> VolumeStats {
    let mut eth_in = BigUint::default();
    let mut eth_out = BigUint::default();
    let mut usdc_in = BigUint::default();
    let mut usdc_out = BigUint::default();
    let mut gas_wei = BigUint::default();
    let mut outgoing_count: u64 = 0;

    let mut counted_outgoing: HashSet<&str> = HashSet::new();
    let mut counted_gas: HashSet<&str> = HashSet::new();

    for record in records {
        if record.from == *owner {
            eth_out += &record.value_wei;

            if counted_outgoing.insert(record.hash.as_str()) {
                outgoing_count += 1;
            }

            if let (Some(gas_used), Some(gas_price)) =
                (&record.gas_used, &record.gas_price_wei)
            {
                if counted_gas.insert(record.hash.as_str()) {
                    gas_wei += gas_used * gas_price;
                }
            }
        }

        if let Some(to) = &record.to {
            if to == owner {
                eth_in += &record.value_wei;
            }
        }

        for log in &record.logs {
            if log.address != *usdc_contract || log.topics.len() < 3 {
                continue;
            }
            let from = Address::from_word(&log.topics[1]);
            let to = Address::from_word(&log.topics[2]);
            let amount = BigUint::from_bytes_be(&log.data);

            if to.as_ref() == Some(owner) {
                usdc_in += &amount;
            }
            if from.as_ref() == Some(owner) {
                usdc_out += &amount;
            }
        }
    }

    VolumeStats {
        eth_in: format_units(&eth_in, NATIVE_DECIMALS),
        eth_out: format_units(&eth_out, NATIVE_DECIMALS),
        usdc_in: format_units(&usdc_in, usdc_decimals),
        usdc_out: format_units(&usdc_out, usdc_decimals),
        gas_native: format_units(&gas_wei, NATIVE_DECIMALS),
        gas_wei,
        outgoing_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        helpers::{address_word, amount_word},
        types::{LogEntry, RecordSource, TRANSFER_TOPIC},
    };

    const OWNER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const PEER: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
    const USDC: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";

    fn eth(amount: u64) -> BigUint {
        BigUint::from(amount) * BigUint::from(10u64).pow(18)
    }

    fn native(
        hash: &str,
        from: &str,
        to: &str,
        value: BigUint,
    ) -> RawTransactionRecord {
        RawTransactionRecord {
            hash: hash.to_owned(),
            from: from.parse().unwrap(),
            to: Some(to.parse().unwrap()),
            value_wei: value,
            gas_used: Some(BigUint::from(21000u32)),
            gas_price_wei: Some(BigUint::from(1_000_000_000u64)),
            timestamp: Some(1704067200),
            source: RecordSource::NativeList,
            logs: Vec::new(),
        }
    }

    fn token(
        hash: &str,
        from: &str,
        to: &str,
        amount: u64,
    ) -> RawTransactionRecord {
        let from: Address = from.parse().unwrap();
        let to: Address = to.parse().unwrap();
        let amount = BigUint::from(amount);
        RawTransactionRecord {
            hash: hash.to_owned(),
            from,
            to: Some(to),
            value_wei: BigUint::default(),
            gas_used: Some(BigUint::from(60000u32)),
            gas_price_wei: Some(BigUint::from(1_000_000_000u64)),
            timestamp: Some(1704067200),
            source: RecordSource::TokenList,
            logs: vec![LogEntry {
                address: USDC.parse().unwrap(),
                topics: vec![
                    TRANSFER_TOPIC,
                    address_word(&from),
                    address_word(&to),
                ],
                data: amount_word(&amount).to_vec(),
            }],
        }
    }

    fn run(records: &[RawTransactionRecord]) -> VolumeStats {
        aggregate(
            records,
            &OWNER.parse().unwrap(),
            &USDC.parse().unwrap(),
            6,
        )
    }

    #[test]
    fn test_aggregate_is_pure() {
        let records = vec![
            native("0x1", OWNER, PEER, eth(1)),
            token("0x2", PEER, OWNER, 5_000_000),
        ];
        assert_eq!(run(&records), run(&records));
    }

    #[test]
    fn test_outgoing_volumes() {
        let records = vec![
            native("0x1", OWNER, PEER, eth(1)),
            native("0x2", OWNER, PEER, eth(2)),
            native("0x3", OWNER, PEER, eth(3)),
        ];
        let stats = run(&records);
        assert_eq!(stats.eth_out, "6.0");
        assert_eq!(stats.eth_in, "0.0");
        assert_eq!(stats.outgoing_count, 3);
        // 3 * 21000 * 1 gwei
        assert_eq!(stats.gas_wei, BigUint::from(63_000_000_000_000u64));
        assert_eq!(stats.gas_native, "0.000063");
    }

    #[test]
    fn test_self_transfer_counts_both_ways() {
        let records = vec![native("0x1", OWNER, OWNER, eth(4))];
        let stats = run(&records);
        assert_eq!(stats.eth_in, "4.0");
        assert_eq!(stats.eth_out, "4.0");
        assert_eq!(stats.outgoing_count, 1);
    }

    #[test]
    fn test_gas_counted_once_per_hash() {
        // the same transaction surfaces in both upstream lists
        let records = vec![
            native("0x1", OWNER, PEER, BigUint::default()),
            token("0x1", OWNER, PEER, 1_000_000),
        ];
        let stats = run(&records);
        assert_eq!(stats.outgoing_count, 1);
        assert_eq!(stats.gas_wei, BigUint::from(21_000_000_000_000u64));
        assert_eq!(stats.usdc_out, "1.0");
    }

    #[test]
    fn test_token_flows() {
        let records = vec![
            token("0x1", PEER, OWNER, 5_000_000),
            token("0x2", OWNER, PEER, 1_500_000),
        ];
        let stats = run(&records);
        assert_eq!(stats.usdc_in, "5.0");
        assert_eq!(stats.usdc_out, "1.5");
        assert_eq!(stats.eth_in, "0.0");
    }

    #[test]
    fn test_foreign_token_logs_ignored() {
        let mut record = token("0x1", PEER, OWNER, 5_000_000);
        record.logs[0].address = PEER.parse().unwrap();
        let stats = run(&[record]);
        assert_eq!(stats.usdc_in, "0.0");
    }
}
