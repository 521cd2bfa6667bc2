use std::{fmt, str::FromStr};

use crate::{error::Error, types::Address};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
    Base,
    Ethereum,
    Optimism,
}

impl ChainId {
    pub const ALL: [ChainId; 3] =
        [ChainId::Base, ChainId::Ethereum, ChainId::Optimism];

    pub fn env_prefix(&self) -> &'static str {
        match self {
            ChainId::Base => "BASE",
            ChainId::Ethereum => "ETHEREUM",
            ChainId::Optimism => "OPTIMISM",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Base => write!(f, "base"),
            ChainId::Ethereum => write!(f, "ethereum"),
            ChainId::Optimism => write!(f, "optimism"),
        }
    }
}

impl FromStr for ChainId {
    type Err = Error;

    fn from_str(value: &str) -> Result<ChainId, Error> {
        match value.to_lowercase().as_str() {
            "base" => Ok(ChainId::Base),
            "ethereum" | "eth" | "mainnet" => Ok(ChainId::Ethereum),
            "optimism" | "op" => Ok(ChainId::Optimism),
            "solana" => Err(Error::NotSupportedChain(String::from(
                "solana support is not available yet",
            ))),
            other => Err(Error::NotSupportedChain(other.to_owned())),
        }
    }
}

/// One etherscan-style API endpoint. Endpoints are tried in the configured
/// order, so the first entry is the primary data source.
#[derive(Debug, Clone)]
pub struct ScanEndpoint {
    pub base_url: String,
    pub api_key: String,
}

/// Per-chain wiring resolved once at startup and passed down the pipeline.
#[derive(Debug, Clone)]
pub struct ChainSpec {
    pub chain: ChainId,
    pub scan_endpoints: Vec<ScanEndpoint>,
    pub rpc_url: String,
    pub registry: Option<Address>,
    pub usdc_contract: Address,
    pub usdc_decimals: u32,
    pub native_symbol: String,
    pub native_coin_id: String,
    pub usdc_coin_id: String,
}

#[test]
fn test_chain_from_str() {
    assert_eq!("base".parse::<ChainId>().unwrap(), ChainId::Base);
    assert_eq!("ETH".parse::<ChainId>().unwrap(), ChainId::Ethereum);
    assert_eq!("op".parse::<ChainId>().unwrap(), ChainId::Optimism);
    assert!("solana".parse::<ChainId>().is_err());
    assert!("dogecoin".parse::<ChainId>().is_err());
}
