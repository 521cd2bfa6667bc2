use std::collections::{HashMap, HashSet};

use crate::{
    model::ProtocolInteraction,
    types::{Address, RawTransactionRecord},
};

const TOP_COUNT: usize = 3;

/// The wallet's most-called counterparties: count outgoing transactions per
/// `to` address, descending, top three. The merged history can carry the
/// same hash in both upstream lists, so each hash counts once. Ties resolve
/// to the lower address for a deterministic ordering.
pub fn top_protocols(
    records: &[RawTransactionRecord],
    owner: &Address,
) -> Vec<ProtocolInteraction> {
    let mut counts: HashMap<Address, u64> = HashMap::new();
    let mut counted: HashSet<&str> = HashSet::new();

    for record in records {
        if record.from != *owner {
            continue;
        }
        let Some(to) = record.to else {
            continue;
        };
        if !counted.insert(record.hash.as_str()) {
            continue;
        }
        *counts.entry(to).or_insert(0) += 1;
    }

    let mut ranked: Vec<(Address, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1).then_with(|| a.0.as_bytes().cmp(b.0.as_bytes()))
    });
    ranked.truncate(TOP_COUNT);

    ranked
        .into_iter()
        .map(|(address, count)| ProtocolInteraction {
            address: address.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::types::RecordSource;

    const OWNER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

    fn outgoing(hash: &str, to: &str) -> RawTransactionRecord {
        RawTransactionRecord {
            hash: hash.to_owned(),
            from: OWNER.parse().unwrap(),
            to: Some(to.parse().unwrap()),
            value_wei: BigUint::default(),
            gas_used: None,
            gas_price_wei: None,
            timestamp: None,
            source: RecordSource::NativeList,
            logs: Vec::new(),
        }
    }

    #[test]
    fn test_top_protocols_ranking() {
        let a = "0x1111111111111111111111111111111111111111";
        let b = "0x2222222222222222222222222222222222222222";
        let c = "0x3333333333333333333333333333333333333333";
        let d = "0x4444444444444444444444444444444444444444";

        let records = vec![
            outgoing("0x1", a),
            outgoing("0x2", a),
            outgoing("0x3", a),
            outgoing("0x4", b),
            outgoing("0x5", b),
            outgoing("0x6", c),
            outgoing("0x7", d),
        ];

        let top = top_protocols(&records, &OWNER.parse().unwrap());
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].count, 3);
        assert_eq!(top[0].address.to_lowercase(), a);
        assert_eq!(top[1].count, 2);
        assert_eq!(top[1].address.to_lowercase(), b);
        // c and d both have one call; the lower address wins
        assert_eq!(top[2].address.to_lowercase(), c);
    }

    #[test]
    fn test_counts_once_per_hash() {
        let peer = "0x2222222222222222222222222222222222222222";
        let mut duplicate = outgoing("0x1", peer);
        duplicate.source = RecordSource::TokenList;

        let records = vec![outgoing("0x1", peer), duplicate];
        let top = top_protocols(&records, &OWNER.parse().unwrap());
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 1);
    }

    #[test]
    fn test_incoming_records_do_not_count() {
        let peer = "0x2222222222222222222222222222222222222222";
        let mut incoming = outgoing("0x1", OWNER);
        incoming.from = peer.parse().unwrap();

        assert!(top_protocols(&[incoming], &OWNER.parse().unwrap()).is_empty());
        assert!(top_protocols(&[], &OWNER.parse().unwrap()).is_empty());
    }
}
