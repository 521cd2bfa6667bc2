use tracing::{info, warn};

use crate::{
    configuration::State,
    error::Error,
    handler::{activity, history, identity, protocols, rank, volume},
    helpers::to_usd_string,
    model::{
        GasSpent, MonthlyActivity, ProtocolInteraction, VolumeStats,
        WalletAnalytics, WalletAnalyticsResult,
    },
    provider::scan,
    types::{ChainId, ChainSpec},
};

/// The full analytics pipeline for one wallet. Infallible by contract:
/// every internal error collapses into the `success: false` branch with
/// the raw input echoed back.
pub async fn get_wallet_analytics(
    state: &State,
    raw_input: &str,
    chain: ChainId,
) -> WalletAnalyticsResult {
    match run(state, raw_input, chain).await {
        Ok(result) => result,
        Err(err) => {
            warn!("analytics failed for {} on {}: {}", raw_input, chain, err);
            WalletAnalyticsResult::failure(raw_input, err)
        }
    }
}

async fn run(
    state: &State,
    raw_input: &str,
    chain: ChainId,
) -> Result<WalletAnalyticsResult, Error> {
    let spec = state.config.chain_spec(chain)?;
    let mut identity = identity::resolve(state, spec, raw_input).await?;
    let address = identity.address;

    // a zero nonce means no outgoing activity at all, skip the heavy fetch;
    // a failed probe is inconclusive and the pipeline continues
    match scan::transaction_count(&state.http, spec, &address).await {
        Ok(0) => {
            info!("{} has no transactions on {}", address, chain);
            identity::enrich(&state.http, spec, &mut identity).await;
            let prices = fetch_prices(state, spec).await;
            return Ok(zero_result(chain, &identity, prices));
        }
        Ok(_) => {}
        Err(err) => warn!("transaction count probe failed: {}", err),
    }

    let (prices, records, ()) = futures::join!(
        fetch_prices(state, spec),
        history::fetch_history(&state.http, spec, &address),
        identity::enrich(&state.http, spec, &mut identity),
    );

    if records.is_empty() {
        return Ok(zero_result(chain, &identity, prices));
    }

    let stats = volume::aggregate(
        &records,
        &address,
        &spec.usdc_contract,
        spec.usdc_decimals,
    );
    let monthly = activity::bucket_by_month(&records);
    let top_protocols = protocols::top_protocols(&records, &address);
    let transaction_count = history::unique_transaction_count(&records);

    assemble(
        chain,
        &identity,
        stats,
        monthly,
        top_protocols,
        transaction_count,
        prices,
    )
}

async fn fetch_prices(state: &State, spec: &ChainSpec) -> (f64, f64) {
    futures::join!(
        state.prices.usd_price(
            &state.http,
            &spec.native_coin_id,
            state.config.default_native_price,
        ),
        state.prices.usd_price(
            &state.http,
            &spec.usdc_coin_id,
            state.config.default_usdc_price,
        ),
    )
}

fn assemble(
    chain: ChainId,
    identity: &identity::ResolvedIdentity,
    stats: VolumeStats,
    monthly_activity: MonthlyActivity,
    top_protocols: Vec<ProtocolInteraction>,
    transaction_count: u64,
    (eth_price, usdc_price): (f64, f64),
) -> Result<WalletAnalyticsResult, Error> {
    let eth_volume_in_usd = to_usd_string(&stats.eth_in, eth_price)?;
    let eth_volume_out_usd = to_usd_string(&stats.eth_out, eth_price)?;
    let usdc_volume_in_usd = to_usd_string(&stats.usdc_in, usdc_price)?;
    let usdc_volume_out_usd = to_usd_string(&stats.usdc_out, usdc_price)?;
    let gas_usd = to_usd_string(&stats.gas_native, eth_price)?;

    Ok(WalletAnalyticsResult::Success(Box::new(WalletAnalytics {
        success: true,
        address: identity.address.to_string(),
        display_name: identity.display_name.clone(),
        transaction_count,
        outgoing_transactions: stats.outgoing_count,
        eth_volume_in: stats.eth_in,
        eth_volume_out: stats.eth_out,
        eth_volume_in_usd,
        eth_volume_out_usd,
        usdc_volume_in: stats.usdc_in,
        usdc_volume_out: stats.usdc_out,
        usdc_volume_in_usd,
        usdc_volume_out_usd,
        gas_spent: GasSpent {
            eth_amount: stats.gas_native,
            wei_amount: stats.gas_wei.to_string(),
            usd_amount: gas_usd,
        },
        eth_price,
        usdc_price,
        rank: rank::classify(chain, transaction_count).to_owned(),
        monthly_activity,
        top_protocols,
        avatar_url: identity.avatar_url.clone(),
        profile_name: identity.profile_name.clone(),
    })))
}

/// A fully populated result for a wallet with no history.
fn zero_result(
    chain: ChainId,
    identity: &identity::ResolvedIdentity,
    (eth_price, usdc_price): (f64, f64),
) -> WalletAnalyticsResult {
    let zero = || String::from("0");
    let zero_usd = || String::from("0.00");

    WalletAnalyticsResult::Success(Box::new(WalletAnalytics {
        success: true,
        address: identity.address.to_string(),
        display_name: identity.display_name.clone(),
        transaction_count: 0,
        outgoing_transactions: 0,
        eth_volume_in: zero(),
        eth_volume_out: zero(),
        eth_volume_in_usd: zero_usd(),
        eth_volume_out_usd: zero_usd(),
        usdc_volume_in: zero(),
        usdc_volume_out: zero(),
        usdc_volume_in_usd: zero_usd(),
        usdc_volume_out_usd: zero_usd(),
        gas_spent: GasSpent {
            eth_amount: zero(),
            wei_amount: zero(),
            usd_amount: zero_usd(),
        },
        eth_price,
        usdc_price,
        rank: rank::classify(chain, 0).to_owned(),
        monthly_activity: activity::bucket_by_month(&[]),
        top_protocols: Vec::new(),
        avatar_url: identity.avatar_url.clone(),
        profile_name: identity.profile_name.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn test_identity() -> identity::ResolvedIdentity {
        identity::ResolvedIdentity {
            address: "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
                .parse()
                .unwrap(),
            display_name: Some(String::from("tester.base.eth")),
            avatar_url: None,
            profile_name: None,
        }
    }

    #[test]
    fn test_zero_result_is_fully_populated() {
        let result = zero_result(ChainId::Base, &test_identity(), (2000.0, 1.0));
        let data = result.as_success().unwrap();

        assert!(data.success);
        assert_eq!(
            data.address,
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(data.transaction_count, 0);
        assert_eq!(data.eth_volume_in, "0");
        assert_eq!(data.eth_volume_in_usd, "0.00");
        assert_eq!(data.gas_spent.usd_amount, "0.00");
        assert_eq!(data.eth_price, 2000.0);
        assert_eq!(data.rank, "Base Newborn");
        assert_eq!(data.monthly_activity.busiest_month_count, 0);
        assert!(data.top_protocols.is_empty());
    }

    #[test]
    fn test_assemble_converts_to_usd() {
        let stats = VolumeStats {
            eth_in: String::from("1.5"),
            eth_out: String::from("6.0"),
            usdc_in: String::from("100.0"),
            usdc_out: String::from("0.0"),
            gas_wei: BigUint::from(63_000_000_000_000u64),
            gas_native: String::from("0.000063"),
            outgoing_count: 12,
        };
        let monthly = activity::bucket_by_month(&[]);
        let top_protocols = vec![ProtocolInteraction {
            address: String::from(
                "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            ),
            count: 7,
        }];

        let result = assemble(
            ChainId::Base,
            &test_identity(),
            stats,
            monthly,
            top_protocols,
            15,
            (2000.0, 1.0),
        )
        .unwrap();
        let data = result.as_success().unwrap();

        assert_eq!(data.top_protocols.len(), 1);
        assert_eq!(data.top_protocols[0].count, 7);
        assert_eq!(data.eth_volume_out_usd, "12000.00");
        assert_eq!(data.eth_volume_in_usd, "3000.00");
        assert_eq!(data.usdc_volume_in_usd, "100.00");
        assert_eq!(data.gas_spent.wei_amount, "63000000000000");
        assert_eq!(data.gas_spent.usd_amount, "0.13");
        assert_eq!(data.rank, "Base Explorer");
        assert_eq!(
            data.display_name.as_deref(),
            Some("tester.base.eth")
        );
    }
}
