use std::{
    collections::HashMap,
    env, fs,
    ops::Deref,
    str::FromStr,
    sync::Arc,
};

use crate::{
    cache::TimedCache,
    error::Error,
    provider::{PriceOracle, HTTP},
    types::{Address, ChainId, ChainSpec, ScanEndpoint},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub http: HTTP,
    pub prices: PriceOracle,
    pub opnames: TimedCache<Address>,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let http = HTTP::new(config.clone())?;
        Ok(State {
            prices: PriceOracle::new(config.price_cache_ttl),
            opnames: TimedCache::new(config.opname_cache_ttl),
            http,
            config,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub timeout: u64,
    pub price_api_host: String,
    pub price_cache_ttl: u64,
    pub opname_cache_ttl: u64,
    pub default_native_price: f64,
    pub default_usdc_price: f64,
    pub scan_retry_offset: u32,
    pub chains: HashMap<ChainId, ChainSpec>,
}

impl Config {
    pub fn get_coingecko_prices_url(&self, ids: &[&str]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.price_api_host,
            ids.join(",")
        )
    }

    pub fn chain_spec(&self, chain: ChainId) -> Result<&ChainSpec, Error> {
        self.chains
            .get(&chain)
            .ok_or_else(|| Error::NotSupportedChain(chain.to_string()))
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|origin| origin.trim().to_owned())
        .filter(|origin| !origin.is_empty())
        .collect();
    let static_dir = env::var("STATIC_DIRECTORY")
        .unwrap_or_else(|_| String::from("./static/"));
    let timeout = env::var("TIMEOUT")?.parse()?;

    let price_api_host = env::var("PRICE_API_HOST")?;
    let price_cache_ttl = env::var("PRICE_CACHE_TTL_IN_SEC")?.parse()?;
    let opname_cache_ttl = env::var("OPNAME_CACHE_TTL_IN_SEC")?.parse()?;
    let default_native_price: f64 = env::var("DEFAULT_ETH_PRICE")?.parse()?;
    let default_usdc_price: f64 = env::var("DEFAULT_USDC_PRICE")?.parse()?;
    let scan_retry_offset: u32 = env::var("SCAN_RETRY_OFFSET")?.parse()?;

    let chains = get_chain_specs()?;

    let config = Config {
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        price_api_host,
        price_cache_ttl,
        opname_cache_ttl,
        default_native_price,
        default_usdc_price,
        scan_retry_offset,
        chains,
    };

    Ok(config)
}

fn get_chain_specs() -> Result<HashMap<ChainId, ChainSpec>, Error> {
    let mut chains = HashMap::new();

    for item in env::var("CHAINS")?.split(',') {
        let chain = ChainId::from_str(item.trim())?;
        let prefix = chain.env_prefix();

        let api_key =
            env::var(format!("{}_SCAN_API_KEY", prefix)).unwrap_or_default();
        let mut scan_endpoints = vec![ScanEndpoint {
            base_url: env::var(format!("{}_SCAN_URL", prefix))?,
            api_key: api_key.clone(),
        }];
        if let Ok(fallback) = env::var(format!("{}_SCAN_FALLBACK_URL", prefix))
        {
            if !fallback.is_empty() {
                scan_endpoints.push(ScanEndpoint {
                    base_url: fallback,
                    api_key,
                });
            }
        }

        let rpc_url = env::var(format!("{}_RPC_URL", prefix))?;

        let registry = match env::var(format!("{}_NAME_REGISTRY", prefix)) {
            Ok(value) if !value.is_empty() => {
                Some(value.parse().map_err(|_| {
                    Error::ConfigurationError(format!(
                        "{}_NAME_REGISTRY is not a valid address",
                        prefix
                    ))
                })?)
            }
            _ => None,
        };

        let usdc_contract: Address = env::var(format!(
            "{}_USDC_CONTRACT",
            prefix
        ))?
        .parse()
        .map_err(|_| {
            Error::ConfigurationError(format!(
                "{}_USDC_CONTRACT is not a valid address",
                prefix
            ))
        })?;
        let usdc_decimals = match env::var(format!("{}_USDC_DECIMALS", prefix))
        {
            Ok(value) => value.parse()?,
            Err(_) => 6,
        };

        chains.insert(
            chain,
            ChainSpec {
                chain,
                scan_endpoints,
                rpc_url,
                registry,
                usdc_contract,
                usdc_decimals,
                native_symbol: String::from("ETH"),
                native_coin_id: String::from("ethereum"),
                usdc_coin_id: String::from("usd-coin"),
            },
        );
    }

    Ok(chains)
}

pub fn set_configuration() -> Result<(), Error> {
    let env_file: &str = ".env";
    let app_config_file: &str = "wrapped.conf";

    let directory = env!("CARGO_MANIFEST_DIR");
    let app_config_path = format!("{}/{}", directory, app_config_file);
    let env_path = format!("{}/{}", directory, env_file);

    let app_config_string = fs::read_to_string(app_config_path)?;
    parse_config_string(app_config_string)?;

    // local overrides
    if let Ok(config_string) = fs::read_to_string(env_path) {
        parse_config_string(config_string)?;
    }

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        env::set_var(key.trim(), value.trim());
    }

    Ok(())
}

#[test]
fn test_parse_config_string() {
    parse_config_string(String::from(
        "# comment line\nTEST_CONFIG_KEY=some=value\n\nTEST_CONFIG_OTHER= spaced \n",
    ))
    .unwrap();
    assert_eq!(env::var("TEST_CONFIG_KEY").unwrap(), "some=value");
    assert_eq!(env::var("TEST_CONFIG_OTHER").unwrap(), "spaced");
}
