use num_bigint::BigUint;

/// Derived volume and gas totals for one wallet. Amount strings are already
/// converted to decimal display form; `gas_wei` stays integral for the
/// `weiAmount` field of the final result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeStats {
    pub eth_in: String,
    pub eth_out: String,
    pub usdc_in: String,
    pub usdc_out: String,
    pub gas_wei: BigUint,
    pub gas_native: String,
    pub outgoing_count: u64,
}
