use serde::Deserialize;
use serde_json::Value;

/// Envelope shared by all `module=account` responses. `result` is a list on
/// success but a plain string on rejection (rate limits, bad keys), so it is
/// kept opaque here and decoded by the provider.
#[derive(Debug, Deserialize)]
pub struct ScanResponseBody {
    pub status: String,
    pub message: String,
    pub result: Value,
}

/// `module=proxy` responses are JSON-RPC shaped.
#[derive(Debug, Deserialize)]
pub struct ScanProxyBody {
    pub jsonrpc: Option<String>,
    pub id: Option<i64>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTx {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas_used: Option<String>,
    pub gas_price: Option<String>,
    pub time_stamp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTokenTx {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub contract_address: String,
    pub token_decimal: Option<String>,
    pub gas_used: Option<String>,
    pub gas_price: Option<String>,
    pub time_stamp: String,
}
