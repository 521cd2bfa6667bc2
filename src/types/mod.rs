pub use self::{
    address::Address,
    chain::{ChainId, ChainSpec, ScanEndpoint},
    coin_gecko_price::CoinGeckoPrice,
    record::{LogEntry, RawTransactionRecord, RecordSource, TRANSFER_TOPIC},
    rpc_response::{RpcBody, RpcErrorBody},
    scan_response::{ScanProxyBody, ScanResponseBody, ScanTokenTx, ScanTx},
};

mod address;
mod chain;
mod coin_gecko_price;
mod record;
mod rpc_response;
mod scan_response;
