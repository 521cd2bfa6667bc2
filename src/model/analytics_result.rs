use serde::Serialize;

use crate::model::MonthlyActivity;

/// The request-scoped aggregate returned to callers. Serializes to the
/// camelCase JSON contract consumed by the dashboard; failures carry only
/// the echoed input and a human-readable message.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WalletAnalyticsResult {
    Success(Box<WalletAnalytics>),
    Failure(WalletAnalyticsFailure),
}

impl WalletAnalyticsResult {
    pub fn failure(
        address: impl Into<String>,
        error: impl ToString,
    ) -> WalletAnalyticsResult {
        WalletAnalyticsResult::Failure(WalletAnalyticsFailure {
            success: false,
            address: address.into(),
            error: error.to_string(),
        })
    }

    pub fn as_success(&self) -> Option<&WalletAnalytics> {
        match self {
            WalletAnalyticsResult::Success(data) => Some(data),
            WalletAnalyticsResult::Failure(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAnalytics {
    pub success: bool,
    pub address: String,
    pub display_name: Option<String>,
    pub transaction_count: u64,
    pub outgoing_transactions: u64,
    pub eth_volume_in: String,
    pub eth_volume_out: String,
    pub eth_volume_in_usd: String,
    pub eth_volume_out_usd: String,
    pub usdc_volume_in: String,
    pub usdc_volume_out: String,
    pub usdc_volume_in_usd: String,
    pub usdc_volume_out_usd: String,
    pub gas_spent: GasSpent,
    pub eth_price: f64,
    pub usdc_price: f64,
    pub rank: String,
    pub monthly_activity: MonthlyActivity,
    pub top_protocols: Vec<ProtocolInteraction>,
    pub avatar_url: Option<String>,
    pub profile_name: Option<String>,
}

/// One frequently-called counterparty address and how often the wallet
/// sent transactions to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInteraction {
    pub address: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSpent {
    pub eth_amount: String,
    pub wei_amount: String,
    pub usd_amount: String,
}

#[derive(Debug, Serialize)]
pub struct WalletAnalyticsFailure {
    pub success: bool,
    pub address: String,
    pub error: String,
}
