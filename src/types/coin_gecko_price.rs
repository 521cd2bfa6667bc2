use std::collections::HashMap;

/// `/simple/price` response: coin id -> { "usd" -> price }.
pub type CoinGeckoPrice = HashMap<String, HashMap<String, f64>>;
