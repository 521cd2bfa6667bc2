use std::str::FromStr;

use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::ChainId,
};

#[get("/prices")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let chain = ChainId::from_str(data.chain.as_deref().unwrap_or("base"))?;
    let spec = state.config.chain_spec(chain)?;

    let (eth_price, usdc_price) = futures::join!(
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
    );

    Ok(web::Json(Response {
        eth_price,
        usdc_price,
    }))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    chain: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub eth_price: f64,
    pub usdc_price: f64,
}
