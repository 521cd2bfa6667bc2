use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RpcBody {
    pub jsonrpc: String,
    pub id: i64,
    pub result: Option<String>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}
