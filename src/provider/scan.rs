use num_bigint::BigUint;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::Error,
    helpers::{address_word, amount_word, hex_to_u64, parse_units},
    provider::HTTP,
    types::{
        Address, ChainSpec, LogEntry, RawTransactionRecord, RecordSource,
        ScanEndpoint, ScanProxyBody, ScanResponseBody, ScanTokenTx, ScanTx,
        TRANSFER_TOPIC,
    },
};

/// Native transaction list for the full block range, normalized.
/// Individually unparsable rows are skipped, never fatal.
pub async fn native_transactions(
    http: &HTTP,
    spec: &ChainSpec,
    address: &Address,
) -> Result<Vec<RawTransactionRecord>, Error> {
    let items: Vec<ScanTx> =
        account_list(http, spec, "txlist", address, None).await?;
    Ok(items.into_iter().filter_map(from_native).collect())
}

/// ERC-20 transfer list filtered to the chain's stablecoin contract,
/// normalized into the shared record shape.
pub async fn token_transactions(
    http: &HTTP,
    spec: &ChainSpec,
    address: &Address,
) -> Result<Vec<RawTransactionRecord>, Error> {
    let items: Vec<ScanTokenTx> = account_list(
        http,
        spec,
        "tokentx",
        address,
        Some(&spec.usdc_contract),
    )
    .await?;
    Ok(items.into_iter().filter_map(from_token).collect())
}

/// Nonce-style probe used to short-circuit empty wallets.
pub async fn transaction_count(
    http: &HTTP,
    spec: &ChainSpec,
    address: &Address,
) -> Result<u64, Error> {
    let endpoint = primary_endpoint(spec)?;
    let mut url = Url::parse(&endpoint.base_url)?;
    url.query_pairs_mut()
        .append_pair("module", "proxy")
        .append_pair("action", "eth_getTransactionCount")
        .append_pair("address", &format!("0x{}", address.lowercase_hex()))
        .append_pair("tag", "latest")
        .append_pair("apikey", &endpoint.api_key);

    let body = http
        .client()
        .get(url)
        .send()
        .await?
        .json::<ScanProxyBody>()
        .await?;

    let count = body.result.ok_or_else(|| {
        Error::UpstreamUnavailable(String::from(
            "transaction count probe returned no result",
        ))
    })?;
    hex_to_u64(&count)
}

/// Walk the endpoint fallback list; if every endpoint fails outright,
/// retry the primary once with a reduced window. Valid-but-empty responses
/// are empty results and never retried.
async fn account_list<T: DeserializeOwned>(
    http: &HTTP,
    spec: &ChainSpec,
    action: &str,
    address: &Address,
    contract: Option<&Address>,
) -> Result<Vec<T>, Error> {
    let mut last_error = None;

    for endpoint in &spec.scan_endpoints {
        match request(http, endpoint, action, address, contract, None).await {
            Ok(items) => return Ok(items),
            Err(err) => {
                warn!(
                    "{} request against {} failed: {}",
                    action, endpoint.base_url, err
                );
                last_error = Some(err);
            }
        }
    }

    let offset = http.config.scan_retry_offset;
    let endpoint = primary_endpoint(spec)?;
    debug!("retrying {} with a reduced window of {} rows", action, offset);
    request(http, endpoint, action, address, contract, Some(offset))
        .await
        .map_err(|err| last_error.unwrap_or(err))
}

async fn request<T: DeserializeOwned>(
    http: &HTTP,
    endpoint: &ScanEndpoint,
    action: &str,
    address: &Address,
    contract: Option<&Address>,
    offset: Option<u32>,
) -> Result<Vec<T>, Error> {
    let mut url = Url::parse(&endpoint.base_url)?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("module", "account")
            .append_pair("action", action)
            .append_pair("address", &format!("0x{}", address.lowercase_hex()))
            .append_pair("startblock", "0")
            .append_pair("endblock", "99999999")
            .append_pair("sort", "asc")
            .append_pair("apikey", &endpoint.api_key);
        if let Some(contract) = contract {
            query.append_pair(
                "contractaddress",
                &format!("0x{}", contract.lowercase_hex()),
            );
        }
        if let Some(offset) = offset {
            query
                .append_pair("page", "1")
                .append_pair("offset", &offset.to_string());
        }
    }

    let body = http
        .client()
        .get(url)
        .send()
        .await?
        .json::<ScanResponseBody>()
        .await?;
    scan_result(body)
}

fn scan_result<T: DeserializeOwned>(
    body: ScanResponseBody,
) -> Result<Vec<T>, Error> {
    if body.status == "1" {
        return Ok(serde_json::from_value(body.result)?);
    }
    // status "0" covers both "no rows" and hard rejections; the former still
    // carries an empty result array
    if body
        .result
        .as_array()
        .map(|items| items.is_empty())
        .unwrap_or(false)
    {
        return Ok(Vec::new());
    }
    if body.message.to_lowercase().contains("no transactions found") {
        return Ok(Vec::new());
    }
    Err(Error::UpstreamUnavailable(format!(
        "scan api rejected request: {}",
        body.message
    )))
}

fn primary_endpoint(spec: &ChainSpec) -> Result<&ScanEndpoint, Error> {
    spec.scan_endpoints.first().ok_or_else(|| {
        Error::ConfigurationError(format!(
            "no scan endpoints configured for {}",
            spec.chain
        ))
    })
}

fn from_native(tx: ScanTx) -> Option<RawTransactionRecord> {
    let from: Address = tx.from.parse().ok()?;
    let to: Option<Address> = tx.to.parse().ok();

    Some(RawTransactionRecord {
        hash: tx.hash,
        from,
        to,
        value_wei: parse_units(&tx.value)?,
        gas_used: tx.gas_used.as_deref().and_then(parse_units),
        gas_price_wei: tx.gas_price.as_deref().and_then(parse_units),
        timestamp: tx.time_stamp.parse().ok(),
        source: RecordSource::NativeList,
        logs: Vec::new(),
    })
}

/// A token row becomes a record with zero native value and one synthetic
/// Transfer log, so the aggregator scans one unified shape.
fn from_token(tx: ScanTokenTx) -> Option<RawTransactionRecord> {
    let contract: Address = tx.contract_address.parse().ok()?;
    let from: Address = tx.from.parse().ok()?;
    let to: Address = tx.to.parse().ok()?;
    let amount = parse_units(&tx.value)?;

    let log = LogEntry {
        address: contract,
        topics: vec![TRANSFER_TOPIC, address_word(&from), address_word(&to)],
        data: amount_word(&amount).to_vec(),
    };

    Some(RawTransactionRecord {
        hash: tx.hash,
        from,
        to: Some(to),
        value_wei: BigUint::default(),
        gas_used: tx.gas_used.as_deref().and_then(parse_units),
        gas_price_wei: tx.gas_price.as_deref().and_then(parse_units),
        timestamp: tx.time_stamp.parse().ok(),
        source: RecordSource::TokenList,
        logs: vec![log],
    })
}

#[cfg(test)]
fn scan_body(status: &str, message: &str, result: serde_json::Value) -> ScanResponseBody {
    ScanResponseBody {
        status: status.to_owned(),
        message: message.to_owned(),
        result,
    }
}

#[test]
fn test_scan_result_decoding() {
    use serde_json::json;

    let rows: Vec<ScanTx> = scan_result(scan_body(
        "1",
        "OK",
        json!([{
            "hash": "0xabc",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "to": "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
            "value": "1000000000000000000",
            "gasUsed": "21000",
            "gasPrice": "1000000000",
            "timeStamp": "1704067200",
        }]),
    ))
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, "1000000000000000000");

    // an empty result set is valid, not an upstream failure
    let rows: Vec<ScanTx> = scan_result(scan_body(
        "0",
        "No transactions found",
        json!([]),
    ))
    .unwrap();
    assert!(rows.is_empty());

    let err = scan_result::<ScanTx>(scan_body(
        "0",
        "NOTOK",
        json!("Max rate limit reached"),
    ))
    .unwrap_err();
    assert!(err.to_string().contains("Max rate limit reached") || err.to_string().contains("NOTOK"));
}

#[test]
fn test_native_normalization() {
    let record = from_native(ScanTx {
        hash: String::from("0xabc"),
        from: String::from("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
        to: String::from(""),
        value: String::from("42"),
        gas_used: Some(String::from("21000")),
        gas_price: Some(String::from("7")),
        time_stamp: String::from("1704067200"),
    })
    .unwrap();

    assert_eq!(record.source, RecordSource::NativeList);
    assert_eq!(record.to, None); // contract creation
    assert_eq!(record.value_wei, BigUint::from(42u32));
    assert_eq!(record.timestamp, Some(1704067200));
    assert!(record.logs.is_empty());
}

#[test]
fn test_token_normalization() {
    let usdc = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";
    let record = from_token(ScanTokenTx {
        hash: String::from("0xdef"),
        from: String::from("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
        to: String::from("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359"),
        value: String::from("2500000"),
        contract_address: usdc.to_owned(),
        token_decimal: Some(String::from("6")),
        gas_used: None,
        gas_price: None,
        time_stamp: String::from("1704067200"),
    })
    .unwrap();

    assert_eq!(record.source, RecordSource::TokenList);
    assert_eq!(record.value_wei, BigUint::default());
    assert_eq!(record.logs.len(), 1);

    let log = &record.logs[0];
    assert_eq!(log.address, usdc.parse().unwrap());
    assert_eq!(log.topics[0], TRANSFER_TOPIC);
    assert_eq!(
        Address::from_word(&log.topics[1]).unwrap(),
        record.from
    );
    assert_eq!(BigUint::from_bytes_be(&log.data), BigUint::from(2500000u32));
}
