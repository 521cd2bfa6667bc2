use crate::types::ChainId;

struct RankTier {
    min: u64,
    max: u64,
    name: &'static str,
}

const BASE_TIERS: &[RankTier] = &[
    RankTier { min: 0, max: 9, name: "Base Newborn" },
    RankTier { min: 10, max: 49, name: "Base Explorer" },
    RankTier { min: 50, max: 99, name: "Base Builder" },
    RankTier { min: 100, max: 499, name: "Base Veteran" },
    RankTier { min: 500, max: u64::MAX, name: "Base Legend" },
];

// Ethereum thresholds are shifted up to reflect higher typical activity.
const ETHEREUM_TIERS: &[RankTier] = &[
    RankTier { min: 0, max: 19, name: "Ethereum Newcomer" },
    RankTier { min: 20, max: 99, name: "Ethereum Regular" },
    RankTier { min: 100, max: 499, name: "Ethereum Power User" },
    RankTier { min: 500, max: 999, name: "Ethereum Veteran" },
    RankTier { min: 1000, max: u64::MAX, name: "Ethereum OG" },
];

const OPTIMISM_TIERS: &[RankTier] = &[
    RankTier { min: 0, max: 9, name: "Optimism Rookie" },
    RankTier { min: 10, max: 49, name: "Optimism Adventurer" },
    RankTier { min: 50, max: 99, name: "Optimism Optimist" },
    RankTier { min: 100, max: 499, name: "Optimism Veteran" },
    RankTier { min: 500, max: u64::MAX, name: "Optimism Legend" },
];

/// First tier whose `[min, max]` range contains the count. The tables are
/// ascending and cover `[0, u64::MAX]` with no gaps, so a match always
/// exists.
pub fn classify(chain: ChainId, transaction_count: u64) -> &'static str {
    let tiers = match chain {
        ChainId::Base => BASE_TIERS,
        ChainId::Ethereum => ETHEREUM_TIERS,
        ChainId::Optimism => OPTIMISM_TIERS,
    };

    tiers
        .iter()
        .find(|tier| tier.min <= transaction_count && transaction_count <= tier.max)
        .map(|tier| tier.name)
        .unwrap_or("Unranked")
}

#[test]
fn test_base_tier_boundaries() {
    assert_eq!(classify(ChainId::Base, 0), "Base Newborn");
    assert_eq!(classify(ChainId::Base, 9), "Base Newborn");
    assert_eq!(classify(ChainId::Base, 10), "Base Explorer");
    assert_eq!(classify(ChainId::Base, 49), "Base Explorer");
    assert_eq!(classify(ChainId::Base, 50), "Base Builder");
    assert_eq!(classify(ChainId::Base, 100), "Base Veteran");
    assert_eq!(classify(ChainId::Base, 500), "Base Legend");
    assert_eq!(classify(ChainId::Base, u64::MAX), "Base Legend");
}

#[test]
fn test_ethereum_tiers_are_shifted() {
    assert_eq!(classify(ChainId::Ethereum, 10), "Ethereum Newcomer");
    assert_eq!(classify(ChainId::Ethereum, 20), "Ethereum Regular");
    assert_eq!(classify(ChainId::Ethereum, 999), "Ethereum Veteran");
    assert_eq!(classify(ChainId::Ethereum, 1000), "Ethereum OG");
}

#[test]
fn test_optimism_tiers() {
    assert_eq!(classify(ChainId::Optimism, 0), "Optimism Rookie");
    assert_eq!(classify(ChainId::Optimism, 75), "Optimism Optimist");
    assert_eq!(classify(ChainId::Optimism, 600), "Optimism Legend");
}
