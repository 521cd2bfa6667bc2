use std::time::Duration;

use reqwest::Client;

use crate::{configuration::Config, error::Error, types::CoinGeckoPrice};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    client: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(HTTP { config, client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn get_coingecko_prices(
        &self,
        ids: &[&str],
    ) -> Result<CoinGeckoPrice, Error> {
        let url = self.config.get_coingecko_prices_url(ids);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .json::<CoinGeckoPrice>()
            .await?;
        Ok(json)
    }
}
