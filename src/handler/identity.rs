use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::{
    configuration::State,
    error::Error,
    provider::{rpc, HTTP},
    types::{Address, ChainId, ChainSpec},
};

/// A wallet identity after name resolution. `display_name` is the resolved
/// input name (or the reverse-record primary name found during enrichment);
/// `profile_name` and `avatar_url` come from resolver text records.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub address: Address,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_name: Option<String>,
}

impl ResolvedIdentity {
    fn bare(address: Address) -> ResolvedIdentity {
        ResolvedIdentity {
            address,
            display_name: None,
            avatar_url: None,
            profile_name: None,
        }
    }
}

/// Resolve user input into an address. Accepts a hex address (checksum
/// validated when mixed-case) or a naming-system name matching the chain's
/// suffix. Anything else is rejected.
pub async fn resolve(
    state: &State,
    spec: &ChainSpec,
    raw_input: &str,
) -> Result<ResolvedIdentity, Error> {
    let input = raw_input.trim();

    if is_hex_address(input) {
        return Ok(ResolvedIdentity::bare(input.parse()?));
    }

    let name = input.to_lowercase();
    if !matches_name(spec.chain, &name) {
        return Err(Error::InvalidIdentity(format!(
            "{} must be a non-empty string matching a supported address or name format",
            raw_input
        )));
    }

    // .op lookups hit a slow public resolver, so successful ones are cached
    let address = if spec.chain == ChainId::Optimism {
        match state.opnames.get(&name).await {
            Some(address) => address,
            None => {
                let address = resolve_name(&state.http, spec, &name).await?;
                state.opnames.set(&name, address).await;
                address
            }
        }
    } else {
        resolve_name(&state.http, spec, &name).await?
    };

    let mut identity = ResolvedIdentity::bare(address);
    identity.display_name = Some(name);
    Ok(identity)
}

/// Best-effort profile enrichment: reverse record, avatar and display text
/// records. Failures leave the fields as `None` and never surface.
pub async fn enrich(
    http: &HTTP,
    spec: &ChainSpec,
    identity: &mut ResolvedIdentity,
) {
    let Some(registry) = spec.registry else {
        return;
    };

    let reverse =
        format!("{}.addr.reverse", identity.address.lowercase_hex());
    let reverse_node = namehash(&reverse);
    if let Some(resolver) =
        lookup_resolver(http, spec, &registry, reverse_node).await
    {
        let output = rpc::eth_call(
            http,
            &spec.rpc_url,
            &resolver,
            &rpc::call_with_node(rpc::SELECTOR_NAME, reverse_node),
        )
        .await;
        if let Some(name) = output.ok().as_deref().and_then(rpc::decode_string)
        {
            if identity.display_name.is_none() {
                identity.display_name = Some(name.clone());
            }
            identity.profile_name = Some(name);
        }
    }

    // text records hang off the forward name's resolver
    let Some(forward) = identity
        .profile_name
        .clone()
        .or_else(|| identity.display_name.clone())
    else {
        return;
    };
    let node = namehash(&forward);
    let Some(resolver) = lookup_resolver(http, spec, &registry, node).await
    else {
        debug!("no resolver for {}, skipping text records", forward);
        return;
    };
    identity.avatar_url =
        text_record(http, spec, &resolver, node, "avatar").await;
    if let Some(display) =
        text_record(http, spec, &resolver, node, "display").await
    {
        identity.profile_name = Some(display);
    }
}

pub fn is_hex_address(input: &str) -> bool {
    input
        .strip_prefix("0x")
        .map(|hex_part| {
            hex_part.len() == 40
                && hex_part.chars().all(|c| c.is_ascii_hexdigit())
        })
        .unwrap_or(false)
}

/// The ENS namehash: fold keccak over the labels, rightmost first.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.split('.').rev() {
        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(Keccak256::digest(label.as_bytes()));
        node = hasher.finalize().into();
    }
    node
}

fn matches_name(chain: ChainId, name: &str) -> bool {
    match chain {
        ChainId::Base => name
            .strip_suffix(".base.eth")
            .map(|stem| valid_stem(stem, 1))
            .unwrap_or(false),
        ChainId::Ethereum => name
            .strip_suffix(".eth")
            .map(|stem| valid_stem(stem, 1))
            .unwrap_or(false),
        ChainId::Optimism => name
            .strip_suffix(".op")
            .map(|stem| valid_stem(stem, 3))
            .unwrap_or(false),
    }
}

fn valid_stem(stem: &str, min_len: usize) -> bool {
    stem.len() >= min_len
        && stem.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        })
}

async fn resolve_name(
    http: &HTTP,
    spec: &ChainSpec,
    name: &str,
) -> Result<Address, Error> {
    let registry = spec.registry.ok_or_else(|| {
        Error::ConfigurationError(format!(
            "no name registry configured for {}",
            spec.chain
        ))
    })?;

    let node = namehash(name);
    let resolver = lookup_resolver(http, spec, &registry, node)
        .await
        .ok_or_else(|| not_registered(name))?;

    let output = rpc::eth_call(
        http,
        &spec.rpc_url,
        &resolver,
        &rpc::call_with_node(rpc::SELECTOR_ADDR, node),
    )
    .await?;

    rpc::decode_address_word(&output)
        .filter(|address| !address.is_zero())
        .ok_or_else(|| not_registered(name))
}

async fn lookup_resolver(
    http: &HTTP,
    spec: &ChainSpec,
    registry: &Address,
    node: [u8; 32],
) -> Option<Address> {
    let output = rpc::eth_call(
        http,
        &spec.rpc_url,
        registry,
        &rpc::call_with_node(rpc::SELECTOR_RESOLVER, node),
    )
    .await
    .ok()?;
    rpc::decode_address_word(&output).filter(|address| !address.is_zero())
}

async fn text_record(
    http: &HTTP,
    spec: &ChainSpec,
    resolver: &Address,
    node: [u8; 32],
    key: &str,
) -> Option<String> {
    let output = rpc::eth_call(
        http,
        &spec.rpc_url,
        resolver,
        &rpc::call_text(node, key),
    )
    .await
    .ok()?;
    rpc::decode_string(&output)
}

fn not_registered(name: &str) -> Error {
    Error::InvalidIdentity(format!(
        "{} is not registered or has no address record",
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namehash_vectors() {
        assert_eq!(namehash(""), [0u8; 32]);
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hex::encode(namehash("foo.eth")),
            "de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn test_hex_address_detection() {
        assert!(is_hex_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_hex_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_hex_address("0x1234"));
        assert!(!is_hex_address("vitalik.eth"));
    }

    #[test]
    fn test_name_patterns_per_chain() {
        assert!(matches_name(ChainId::Base, "jesse.base.eth"));
        assert!(!matches_name(ChainId::Base, "jesse.eth"));

        assert!(matches_name(ChainId::Ethereum, "vitalik.eth"));
        assert!(matches_name(ChainId::Ethereum, "sub.vitalik.eth"));
        assert!(!matches_name(ChainId::Ethereum, "vitalik.op"));
        assert!(!matches_name(ChainId::Ethereum, ".eth"));

        assert!(matches_name(ChainId::Optimism, "abc.op"));
        assert!(matches_name(ChainId::Optimism, "my-name42.op"));
        assert!(!matches_name(ChainId::Optimism, "ab.op"));
        assert!(!matches_name(ChainId::Optimism, "Has Spaces.op"));
    }
}
