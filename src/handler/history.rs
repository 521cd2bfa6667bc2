use std::collections::HashSet;

use tracing::warn;

use crate::{
    provider::{scan, HTTP},
    types::{Address, ChainSpec, RawTransactionRecord},
};

/// Merge the native and token lists into one unordered history. A failed
/// sub-request degrades to its sibling; both failing yields an empty vec.
pub async fn fetch_history(
    http: &HTTP,
    spec: &ChainSpec,
    address: &Address,
) -> Vec<RawTransactionRecord> {
    let (native, token) = tokio::join!(
        scan::native_transactions(http, spec, address),
        scan::token_transactions(http, spec, address),
    );

    let mut records = Vec::new();
    match native {
        Ok(mut items) => records.append(&mut items),
        Err(err) => {
            warn!("native transaction list failed for {}: {}", spec.chain, err)
        }
    }
    match token {
        Ok(mut items) => records.append(&mut items),
        Err(err) => {
            warn!("token transaction list failed for {}: {}", spec.chain, err)
        }
    }
    records
}

/// Distinct transaction hashes across the merged history. The same hash may
/// appear in both upstream lists.
pub fn unique_transaction_count(records: &[RawTransactionRecord]) -> u64 {
    records
        .iter()
        .map(|record| record.hash.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::types::RecordSource;

    fn record(hash: &str, source: RecordSource) -> RawTransactionRecord {
        RawTransactionRecord {
            hash: hash.to_owned(),
            from: Address::ZERO,
            to: None,
            value_wei: BigUint::default(),
            gas_used: None,
            gas_price_wei: None,
            timestamp: None,
            source,
            logs: Vec::new(),
        }
    }

    #[test]
    fn test_unique_transaction_count() {
        let records = vec![
            record("0x1", RecordSource::NativeList),
            record("0x2", RecordSource::NativeList),
            record("0x1", RecordSource::TokenList),
        ];
        assert_eq!(unique_transaction_count(&records), 2);
        assert_eq!(unique_transaction_count(&[]), 0);
    }
}
